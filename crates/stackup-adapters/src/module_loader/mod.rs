//! Module loader adapters.

mod caching;
pub mod manifest;

pub use caching::{CachingModuleLoader, DESCRIPTOR_FILE};
pub use manifest::ModuleManifest;
