//! CLI error handling.
//!
//! Every failure reaching `main` becomes a [`CliError`], which knows its
//! suggestions, its exit code, and how to print itself with or without color.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use stackup_core::error::{ErrorCategory as CoreCategory, StackupError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration file could not be read or has an invalid shape.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// Raised by `stacks show` and similar lookups.
    #[error("Stack not found: {name}")]
    StackNotFound {
        name: String,
        available: Vec<String>,
    },

    /// An error propagated from the pipeline.
    #[error("{0}")]
    Core(#[from] StackupError),

    #[error("Failed to serialize output: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization {
            message: err.to_string(),
            source: Box::new(err),
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Environment overrides use STACKUP_<SECTION>__<KEY>".into(),
            ],

            Self::StackNotFound { available, .. } => {
                let mut suggestions = vec!["Available stacks:".to_string()];
                for name in available {
                    suggestions.push(format!("  • {name}"));
                }
                suggestions.push("List them with: stackup stacks list".into());
                suggestions
            }

            Self::Core(core) => {
                let mut suggestions = core.suggestions();
                if core.is_retryable() {
                    suggestions.push("This failure may be temporary; re-run the command".into());
                }
                suggestions
            }

            Self::Serialization { .. } => vec![
                "Retry with --output-format plain".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::StackNotFound { .. } => ErrorCategory::NotFound,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::Serialization { .. } | Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// [`Self::format_colored`] without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Drives exit codes and message styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    use stackup_core::{application::ApplicationError, domain::DomainError};

    fn core(err: impl Into<StackupError>) -> CliError {
        CliError::Core(err.into())
    }

    #[test]
    fn directory_exists_is_a_user_error() {
        let err = core(ApplicationError::DirectoryExists {
            path: PathBuf::from("/tmp/demo"),
        });
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn fetch_failure_suggests_rerun() {
        let err = core(ApplicationError::ModuleFetch {
            location: "github.com/acme/infra".into(),
            reason: "timed out".into(),
        });
        assert_eq!(err.exit_code(), 3);
        assert!(err.suggestions().iter().any(|s| s.contains("re-run")));
    }

    #[test]
    fn parse_failure_does_not_suggest_rerun() {
        let err = core(ApplicationError::ModuleParse {
            location: "./infra".into(),
            reason: "missing [module]".into(),
        });
        assert!(!err.suggestions().iter().any(|s| s.contains("re-run")));
    }

    #[test]
    fn unknown_stack_is_not_found() {
        let err = core(DomainError::UnknownStack {
            name: "Serverless".into(),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn stack_not_found_lists_available() {
        let err = CliError::StackNotFound {
            name: "Serverless".into(),
            available: vec!["EKS + Go + React".into(), "Custom".into()],
        };
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("EKS + Go + React")));
        assert!(suggestions.iter().any(|s| s.contains("Custom")));
    }

    #[test]
    fn exit_code_configuration() {
        let err = CliError::ConfigError {
            message: "bad".into(),
            source: None,
        };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn exit_code_internal() {
        let err: CliError = io::Error::other("disk full").into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn format_plain_contains_header_and_suggestions() {
        let err = core(ApplicationError::UnsupportedProvider {
            provider: "Google GCP".into(),
        });
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::ConfigError {
            message: "bad".into(),
            source: Some(Box::new(io::Error::other("permission denied"))),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: permission denied"));
        assert!(!s.contains("--verbose"));
    }
}
