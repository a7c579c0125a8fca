// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stackup.
//!
//! This module contains pure business logic: module descriptors, the prompt
//! graph, credential vendor schemas, and parameter fan-out. All I/O
//! (fetching, prompting, persistence) is reached through ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or terminal calls
//! - **Immutable entities**: Loaded modules and stacks are read-only
//! - **Data-driven tables**: Stacks and vendor schemas are registries, not
//!   scattered literal maps
//!
// Public API - what the world sees
pub mod credentials;
pub mod error;
pub mod module;
pub mod parameters;
pub mod project_config;
pub mod prompt;
pub mod render;
pub mod stack;

// Re-exports for convenience
pub use credentials::{
    AwsCredentials, CircleCiCredentials, GithubCredentials, ProjectCredential, VENDOR_REGISTRY,
    VendorDef, find_vendor, prompts_for_vendor, required_vendors,
};
pub use error::{DomainError, ErrorCategory};
pub use module::{ModuleConfig, ModuleSource, Parameter, SourceKind};
pub use parameters::{
    ModuleParameters, Modules, ParameterValues, assign_module_parameters,
};
pub use project_config::{AwsInfrastructure, Infrastructure, ProjectConfig, ProjectModule};
pub use prompt::{Condition, PromptHandler, PromptSequence, Validation, ValidationRejected};
pub use render::RenderContext;
pub use stack::{Stack, StackRegistry};

/// Validate a project name before anything is created on disk.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.trim().is_empty() {
        Some("name cannot be empty")
    } else if name.starts_with('.') {
        Some("name cannot start with '.'")
    } else if name.contains('/') || name.contains('\\') {
        Some("name cannot contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}
