//! `stackup-module.toml` manifest types.
//!
//! ```toml
//! [module]
//! name                 = "backend"
//! output_dir           = "backend-service"   # optional, defaults to name
//! required_credentials = ["aws", "github"]   # optional
//!
//! [[parameters]]
//! field   = "region"
//! label   = "AWS region"
//! default = "us-east-1"                      # optional
//! ```

use serde::Deserialize;

use stackup_core::domain::{ModuleConfig, Parameter};

/// Deserialised representation of a `stackup-module.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct ModuleManifest {
    pub module: ModuleSection,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
}

/// `[module]` section.
#[derive(Debug, Deserialize, Clone)]
pub struct ModuleSection {
    pub name: String,
    pub output_dir: Option<String>,
    #[serde(default)]
    pub required_credentials: Vec<String>,
}

/// One entry under `[[parameters]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct ParameterEntry {
    pub field: String,
    pub label: String,
    #[serde(default)]
    pub default: String,
}

impl ModuleManifest {
    /// Convert into a domain config. Validation is left to the caller.
    pub fn into_config(self) -> ModuleConfig {
        let output_dir = self
            .module
            .output_dir
            .unwrap_or_else(|| self.module.name.clone());

        let config = ModuleConfig::new(self.module.name).with_output_dir(output_dir);
        let config = self
            .module
            .required_credentials
            .into_iter()
            .fold(config, ModuleConfig::with_credential);

        self.parameters.into_iter().fold(config, |config, p| {
            config.with_parameter(Parameter::new(p.field, p.label, p.default))
        })
    }
}
