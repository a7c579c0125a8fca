//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the ports the
//! application drives. Business rule violations are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Target project directory is already present.
    #[error("Directory {path} already exists")]
    DirectoryExists { path: PathBuf },

    /// A module could not be downloaded.
    #[error("Unable to fetch module {location}: {reason}")]
    ModuleFetch { location: String, reason: String },

    /// A fetched module's descriptor is missing or malformed.
    #[error("Unable to load module {location}: {reason}")]
    ModuleParse { location: String, reason: String },

    /// Two sources declared the same module name.
    #[error("Module name '{name}' is declared by both {first} and {second}")]
    DuplicateModule {
        name: String,
        first: String,
        second: String,
    },

    /// Interactive input failed (stream closed, terminal error...).
    #[error("Prompt failed: {reason}")]
    Prompt { reason: String },

    /// A cloud provider other than AWS was chosen.
    #[error("Only the AWS provider is available at this time (selected: {provider})")]
    UnsupportedProvider { provider: String },

    /// Account identity lookup failed.
    #[error("Credential verification failed{}: {message}", code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    CredentialVerification {
        code: Option<String>,
        message: String,
    },

    /// Persisted credentials could not be read or written.
    #[error("Credential store error: {reason}")]
    CredentialStore { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Boilerplate rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// A background task panicked or was aborted.
    #[error("Background task failed: {reason}")]
    TaskFailed { reason: String },

    /// Shared state lock was poisoned.
    #[error("Internal lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DirectoryExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                "Or run from a different directory with --dir".into(),
            ],
            Self::ModuleFetch { location, .. } => vec![
                format!("Could not download {}", location),
                "Check your network connection and that git is installed".into(),
                "Transient failures usually clear up on a second run".into(),
            ],
            Self::ModuleParse { location, .. } => vec![
                format!("The module at {} has no valid stackup-module.toml", location),
                "Check the module source points at a stackup module".into(),
            ],
            Self::DuplicateModule { name, .. } => vec![
                format!("Two modules in this stack are both named '{}'", name),
                "Remove one source from the stack".into(),
                "Or set modules.duplicate_policy = \"last-wins\" in your config".into(),
            ],
            Self::Prompt { .. } => vec![
                "Input was interrupted before all questions were answered".into(),
                "Run the command again from an interactive terminal".into(),
            ],
            Self::UnsupportedProvider { .. } => vec![
                "Select \"Amazon AWS\" as the cloud provider".into(),
            ],
            Self::CredentialVerification { .. } => vec![
                "Check the AWS access key id and secret".into(),
                "Ensure the aws CLI is installed and on your PATH".into(),
            ],
            Self::CredentialStore { .. } => vec![
                "Check permissions on your credentials file".into(),
                "Try: stackup config path".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DirectoryExists { .. } | Self::DuplicateModule { .. } => {
                ErrorCategory::Validation
            }
            Self::ModuleFetch { .. } | Self::ModuleParse { .. } => ErrorCategory::NotFound,
            Self::Prompt { .. } => ErrorCategory::Validation,
            Self::UnsupportedProvider { .. } => ErrorCategory::Validation,
            Self::CredentialVerification { .. } => ErrorCategory::Validation,
            Self::CredentialStore { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. }
            | Self::RenderingFailed { .. }
            | Self::TaskFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
