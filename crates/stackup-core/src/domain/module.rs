//! Module descriptors: where a module comes from and what it declares.
//!
//! A module is a self-contained template unit (backend, frontend, infra...)
//! identified by a [`ModuleSource`] and described by a [`ModuleConfig`] once
//! its descriptor has been fetched and parsed.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::error::DomainError;

// ── ModuleSource ──────────────────────────────────────────────────────────────

/// Opaque reference to a fetchable module location.
///
/// Either a local path (`./modules/backend`, `/abs/path`, `file://...`) or a
/// remote git repository (`github.com/org/repo`, `https://...`, `git@...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleSource(String);

/// Where a [`ModuleSource`] points to, after interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A directory on the local machine.
    Local(PathBuf),
    /// A git remote, normalised to a clonable URL.
    Remote(String),
}

impl ModuleSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the source string.
    pub fn kind(&self) -> SourceKind {
        let s = self.0.as_str();

        if let Some(path) = s.strip_prefix("file://") {
            return SourceKind::Local(PathBuf::from(path));
        }
        if s.starts_with('/') || s.starts_with("./") || s.starts_with("../") {
            return SourceKind::Local(PathBuf::from(s));
        }
        if s.contains("://") || s.starts_with("git@") {
            return SourceKind::Remote(s.to_string());
        }

        let repo = s.trim_end_matches('/').trim_end_matches(".git");
        SourceKind::Remote(format!("https://{repo}.git"))
    }

    /// Directory name for this source inside a module cache.
    ///
    /// The readable prefix is sanitised; the hash suffix keeps two sources
    /// that sanitise identically (`a/b` and `a_b`) in disjoint directories.
    pub fn cache_key(&self) -> String {
        let readable: String = self
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let digest = Sha256::digest(self.0.as_bytes());
        format!("{}-{}", readable.trim_matches('_'), hex::encode(&digest[..8]))
    }
}

impl fmt::Display for ModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleSource {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ModuleSource {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ── Parameter ─────────────────────────────────────────────────────────────────

/// One value a module asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Unique key within a module; also the key answers are recorded under.
    pub field: String,
    /// Human prompt text.
    pub label: String,
    /// Pre-filled answer.
    pub default: String,
}

impl Parameter {
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            default: default.into(),
        }
    }
}

// ── ModuleConfig ──────────────────────────────────────────────────────────────

/// Parsed module descriptor. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleConfig {
    pub name: String,
    pub output_dir: String,
    pub required_credentials: BTreeSet<String>,
    pub parameters: Vec<Parameter>,
}

impl ModuleConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output_dir: String::new(),
            required_credentials: BTreeSet::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_credential(mut self, vendor: impl Into<String>) -> Self {
        self.required_credentials.insert(vendor.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Whether this module declares a parameter with exactly this field name.
    pub fn declares(&self, field: &str) -> bool {
        self.parameters.iter().any(|p| p.field == field)
    }

    /// Declared fields, for O(1) membership checks.
    pub fn parameter_fields(&self) -> HashSet<&str> {
        self.parameters.iter().map(|p| p.field.as_str()).collect()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidModule {
                module: self.name.clone(),
                reason: "module name cannot be empty".into(),
            });
        }

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            if parameter.field.trim().is_empty() {
                return Err(DomainError::InvalidModule {
                    module: self.name.clone(),
                    reason: "parameter field cannot be empty".into(),
                });
            }
            if !seen.insert(parameter.field.as_str()) {
                return Err(DomainError::DuplicateParameter {
                    module: self.name.clone(),
                    field: parameter.field.clone(),
                });
            }
        }

        if self.required_credentials.iter().any(|v| v.trim().is_empty()) {
            return Err(DomainError::InvalidModule {
                module: self.name.clone(),
                reason: "credential vendor names cannot be empty".into(),
            });
        }

        Ok(())
    }
}
