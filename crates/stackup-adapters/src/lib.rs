//! Infrastructure adapters for Stackup.
//!
//! This crate implements the ports defined in `stackup_core::application::ports`.
//! It contains all external dependencies and I/O operations: the module
//! cache, credential persistence, the AWS identity lookup and file output.

pub mod credential_store;
pub mod filesystem;
pub mod identity;
pub mod module_loader;
pub mod renderer;

// Re-export commonly used adapters
pub use credential_store::{FileCredentialStore, MemoryCredentialStore};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
#[cfg(feature = "aws")]
pub use identity::AwsStsVerifier;
pub use identity::UnavailableVerifier;
pub use module_loader::{CachingModuleLoader, DESCRIPTOR_FILE};
pub use renderer::SimpleRenderer;
