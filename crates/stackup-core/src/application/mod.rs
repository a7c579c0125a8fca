//! Application layer for Stackup.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (InitService, ModuleService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    DEFAULT_MAX_CONCURRENT_FETCHES, DuplicatePolicy, InitOptions, InitOutcome, InitService,
    ModuleService, PromptResolver,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CredentialStore, Filesystem, IdentityVerifier, ModuleLoader, Prompter, RenderedFile,
    TemplateRenderer,
};

pub use error::ApplicationError;
