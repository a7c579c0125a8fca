//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "load a stack" or "initialize a project".

pub mod init_service;
pub mod module_service;
pub mod prompt_resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use init_service::{InitOptions, InitOutcome, InitService};
pub use module_service::{DEFAULT_MAX_CONCURRENT_FETCHES, DuplicatePolicy, ModuleService};
pub use prompt_resolver::PromptResolver;
