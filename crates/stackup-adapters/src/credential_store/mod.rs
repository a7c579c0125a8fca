//! Credential store adapters.

mod file;
mod memory;

pub use file::{CredentialsFile, FileCredentialStore};
pub use memory::MemoryCredentialStore;
