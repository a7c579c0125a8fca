//! Stackup Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Stackup, a tool
//! that assembles a new project from a stack of reusable modules.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stackup-cli (CLI)             │
//! │   (Prompter, config, command dispatch)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (InitService, ModuleService, Resolver)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (ModuleLoader, Prompter, CredentialStore│
//! │  IdentityVerifier, Filesystem, Render)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stackup-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ModuleConfig, PromptHandler, vendors,  │
//! │  assign_module_parameters)              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stackup_core::domain::{ModuleConfig, Modules, ParameterValues, assign_module_parameters};
//!
//! let mut modules = Modules::new();
//! modules.insert("backend".into(), ModuleConfig::new("backend"));
//! let answers: ParameterValues = [("region", "us-east-1")].into_iter().collect();
//! let assigned = assign_module_parameters(&modules, &answers);
//! assert!(assigned["backend"].is_empty());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DuplicatePolicy, InitOptions, InitOutcome, InitService, ModuleService, PromptResolver,
        ports::{
            CredentialStore, Filesystem, IdentityVerifier, ModuleLoader, Prompter,
            TemplateRenderer,
        },
    };
    pub use crate::domain::{
        ModuleConfig, ModuleSource, Modules, ParameterValues, ProjectConfig, ProjectCredential,
        PromptHandler, RenderContext, Stack, StackRegistry,
    };
    pub use crate::error::{StackupError, StackupResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
