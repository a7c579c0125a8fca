// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside `StackupError`)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid module '{module}': {reason}")]
    InvalidModule { module: String, reason: String },

    #[error("Module '{module}' declares parameter '{field}' more than once")]
    DuplicateParameter { module: String, field: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid stack definition: {0}")]
    InvalidStack(String),

    #[error("Stack '{name}' is defined more than once")]
    DuplicateStack { name: String },

    // ========================================================================
    // Prompt graph violations
    // ========================================================================
    #[error("Prompt '{field}' is declared more than once in the same sequence")]
    DuplicatePrompt { field: String },

    #[error("Prompt '{field}' depends on '{key}', which no earlier prompt answers")]
    UnresolvedDependency { field: String, key: String },

    #[error("An answer for '{field}' has already been recorded")]
    AnswerAlreadyRecorded { field: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Unknown stack: {name}")]
    UnknownStack { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidModule { module, reason } => vec![
                format!("Module '{}' has an invalid descriptor: {}", module, reason),
                "Check the module's stackup-module.toml".into(),
            ],
            Self::DuplicateParameter { module, field } => vec![
                format!("Remove the duplicate '{}' entry from '{}'", field, module),
                "Parameter fields must be unique within a module".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-project, my_app, project123".into(),
            ],
            Self::DuplicateStack { name } => vec![
                format!("Stack '{}' appears twice in your configuration", name),
                "Rename or remove one of the [[stacks]] entries".into(),
            ],
            Self::UnknownStack { name } => vec![
                format!("No stack named '{}' is configured", name),
                "Try: stackup stacks list".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidModule { .. }
            | Self::DuplicateParameter { .. }
            | Self::InvalidProjectName { .. }
            | Self::InvalidStack(_)
            | Self::DuplicateStack { .. } => ErrorCategory::Validation,
            Self::UnknownStack { .. } => ErrorCategory::NotFound,
            Self::DuplicatePrompt { .. }
            | Self::UnresolvedDependency { .. }
            | Self::AnswerAlreadyRecorded { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
