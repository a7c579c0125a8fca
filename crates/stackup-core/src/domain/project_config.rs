//! The materialised project configuration.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::parameters::ModuleParameters;

/// Everything the pipeline decided for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub should_push_repositories: bool,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub infrastructure: Infrastructure,
    /// Project-level answers (push, org, repository names...).
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub modules: BTreeMap<String, ProjectModule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infrastructure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsInfrastructure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsInfrastructure {
    pub region: String,
    /// Filled in by identity verification; empty when it failed.
    #[serde(default)]
    pub account_id: String,
}

/// One module as it will be materialised in this project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModule {
    pub repo_name: String,
    /// Absent when repositories are not pushed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub parameters: ModuleParameters,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            should_push_repositories: true,
            generated_at: Utc::now(),
            infrastructure: Infrastructure::default(),
            parameters: BTreeMap::new(),
            modules: BTreeMap::new(),
        }
    }
}

impl ProjectModule {
    /// Build a module entry; the url is `<org>/<repo>` when an org is known.
    pub fn new(parameters: ModuleParameters, repo_name: impl Into<String>, org: Option<&str>) -> Self {
        let repo_name = repo_name.into();
        let repo_url = org.map(|org| format!("{}/{}", org.trim_end_matches('/'), repo_name));
        Self {
            repo_name,
            repo_url,
            parameters,
        }
    }
}
