//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The core
//! crate never sees it; commands translate it into service settings.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site)
//! 2. `STACKUP_*` environment variables, `__` between nested keys
//!    (`STACKUP_MODULES__MAX_CONCURRENT_FETCHES=4`)
//! 3. Config file (`--config FILE`, or [`AppConfig::config_path`])
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use stackup_core::{
    application::{DEFAULT_MAX_CONCURRENT_FETCHES, DuplicatePolicy},
    domain::{Stack, StackRegistry, stack::default_stacks},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub modules: ModulesConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Offered by `stackup init`, in this order.
    #[serde(default = "default_stacks")]
    pub stacks: Vec<Stack>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Where fetched modules are kept. Defaults to the user cache dir.
    pub cache_dir: Option<PathBuf>,
    pub max_concurrent_fetches: usize,
    pub duplicate_policy: DuplicatePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Credentials file. Defaults to `credentials.toml` in the config dir.
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            modules: ModulesConfig::default(),
            credentials: CredentialsConfig::default(),
            stacks: default_stacks(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// A file passed with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };
        Self::load_from(file)
    }

    fn load_from(file: File<config::FileSourceFile, config::FileFormat>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix("STACKUP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Configuration has an invalid shape")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.stackup.toml` in the
    /// current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stackup", "stackup")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stackup.toml"))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.modules.cache_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("dev", "stackup", "stackup")
                .map(|d| d.cache_dir().join("modules"))
                .unwrap_or_else(|| PathBuf::from(".stackup/modules"))
        })
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.credentials.path.clone().unwrap_or_else(|| {
            Self::config_path()
                .parent()
                .map(|dir| dir.join("credentials.toml"))
                .unwrap_or_else(|| Path::new(".stackup").join("credentials.toml"))
        })
    }

    /// The configured stacks as a validated registry.
    pub fn registry(&self) -> Result<StackRegistry, stackup_core::domain::DomainError> {
        StackRegistry::new(self.stacks.clone())
    }
}
