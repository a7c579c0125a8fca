//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stackup-adapters` crate provides most implementations; the terminal
//! prompters live in `stackup-cli`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{
    AwsCredentials, ModuleConfig, ModuleSource, ProjectConfig, ProjectCredential, RenderContext,
    ValidationRejected,
};
use crate::error::StackupResult;

/// Port for module retrieval.
///
/// Implemented by:
/// - `stackup_adapters::module_loader::CachingModuleLoader` (git + local copy)
///
/// `fetch` runs concurrently for distinct sources, one task each, so
/// implementations must keep per-source state disjoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Retrieve the module into its local cache location.
    async fn fetch(&self, source: &ModuleSource) -> StackupResult<()>;

    /// Read and validate the descriptor of an already fetched module.
    fn parse(&self, source: &ModuleSource) -> StackupResult<ModuleConfig>;
}

/// Port for interactive input.
///
/// Implemented by:
/// - `stackup_cli::prompt::DialoguerPrompter` (terminal)
/// - `stackup_cli::prompt::LinePrompter` (piped stdin)
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// Ask a free-form question. An empty answer means `default`.
    fn ask(&self, label: &str, default: &str) -> StackupResult<String>;

    /// Pick one of `options`, returning its index.
    fn select(&self, label: &str, options: &[String]) -> StackupResult<usize>;

    /// Tell the user why the last answer was refused.
    fn reject(&self, rejection: &ValidationRejected);
}

/// Port for credential persistence, keyed by project name.
///
/// Implemented by:
/// - `stackup_adapters::credential_store::FileCredentialStore` (production)
/// - `stackup_adapters::credential_store::MemoryCredentialStore` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Stored credentials for `project`, or an empty record.
    fn load(&self, project: &str) -> StackupResult<ProjectCredential>;

    /// Insert or replace the record for `credential.project_name`.
    fn save(&self, credential: &ProjectCredential) -> StackupResult<()>;
}

/// Port for cloud identity lookup.
///
/// Implemented by:
/// - `stackup_adapters::identity::AwsStsVerifier`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve the account id the credentials belong to.
    async fn account_id(&self, credentials: &AwsCredentials, region: &str)
    -> StackupResult<String>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stackup_adapters::filesystem::LocalFilesystem` (production)
/// - `stackup_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StackupResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> StackupResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StackupResult<()>;
}

/// A file produced by a [`TemplateRenderer`], relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

impl RenderedFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Port for turning a project configuration into files.
///
/// Implemented by:
/// - `stackup_adapters::renderer::SimpleRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        config: &ProjectConfig,
        context: &RenderContext,
    ) -> StackupResult<Vec<RenderedFile>>;
}
