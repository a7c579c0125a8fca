//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stackup-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ModuleLoader`: Module fetch and descriptor parsing
//!   - `Prompter`: Interactive questions
//!   - `CredentialStore`: Per-project credential persistence
//!   - `IdentityVerifier`: Cloud account lookup
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Project file rendering

pub mod output;

pub use output::{
    CredentialStore, Filesystem, IdentityVerifier, ModuleLoader, Prompter, RenderedFile,
    TemplateRenderer,
};

#[cfg(test)]
pub use output::{
    MockCredentialStore, MockFilesystem, MockIdentityVerifier, MockPrompter,
    MockTemplateRenderer,
};
