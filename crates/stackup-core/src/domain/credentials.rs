//! Credential vendors and their prompt schemas.
//!
//! Every vendor a module may require is described exactly once in
//! [`VENDOR_REGISTRY`]. Prompt generation, pre-filling from stored
//! credentials and writing answers back all derive from that table.
//!
//! # Adding a New Vendor
//!
//! 1. Add a credentials struct and a field on [`ProjectCredential`]
//! 2. Add one [`VendorDef`] entry to [`VENDOR_REGISTRY`]
//! 3. Map its fields in `ProjectCredential::slot` / `slot_mut`

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    module::{ModuleConfig, Parameter},
    parameters::ParameterValues,
    prompt::PromptHandler,
};

// ── Stored credentials ────────────────────────────────────────────────────────

/// Secrets for one project, grouped by vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCredential {
    pub project_name: String,
    #[serde(default)]
    pub aws: AwsCredentials,
    #[serde(default)]
    pub github: GithubCredentials,
    #[serde(default)]
    pub circleci: CircleCiCredentials,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsCredentials {
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubCredentials {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleCiCredentials {
    #[serde(default)]
    pub api_key: String,
}

impl ProjectCredential {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Self::default()
        }
    }

    /// Stored value for a vendor field, if the pair is known.
    pub fn get(&self, vendor: &str, field: &str) -> Option<&str> {
        self.slot(vendor, field)
    }

    /// Write the answers for one vendor's fields back into this credential.
    ///
    /// Only the named vendor is touched; fields without an answer keep their
    /// stored value. Returns the number of fields updated.
    pub fn apply_answers(&mut self, vendor: &str, answers: &ParameterValues) -> usize {
        let Some(def) = find_vendor(vendor) else {
            return 0;
        };

        let mut updated = 0;
        for field in def.fields {
            if let (Some(value), Some(slot)) = (answers.get(field.field), self.slot_mut(vendor, field.field)) {
                *slot = value.to_string();
                updated += 1;
            }
        }
        updated
    }

    fn slot(&self, vendor: &str, field: &str) -> Option<&str> {
        let value = match (vendor, field) {
            ("aws", "accessKeyId") => &self.aws.access_key_id,
            ("aws", "secretAccessKey") => &self.aws.secret_access_key,
            ("github", "accessToken") => &self.github.access_token,
            ("circleci", "apiKey") => &self.circleci.api_key,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn slot_mut(&mut self, vendor: &str, field: &str) -> Option<&mut String> {
        match (vendor, field) {
            ("aws", "accessKeyId") => Some(&mut self.aws.access_key_id),
            ("aws", "secretAccessKey") => Some(&mut self.aws.secret_access_key),
            ("github", "accessToken") => Some(&mut self.github.access_token),
            ("circleci", "apiKey") => Some(&mut self.circleci.api_key),
            _ => None,
        }
    }
}

// ── Vendor registry ───────────────────────────────────────────────────────────

/// One credential value a vendor needs.
#[derive(Debug, Clone, Copy)]
pub struct CredentialFieldDef {
    pub field: &'static str,
    pub label: &'static str,
}

/// Prompt schema for one vendor.
#[derive(Debug, Clone, Copy)]
pub struct VendorDef {
    pub name: &'static str,
    pub fields: &'static [CredentialFieldDef],
}

/// Single source of truth for credential vendors.
pub static VENDOR_REGISTRY: &[VendorDef] = &[
    VendorDef {
        name: "aws",
        fields: &[
            CredentialFieldDef {
                field: "accessKeyId",
                label: "AWS Access Key ID",
            },
            CredentialFieldDef {
                field: "secretAccessKey",
                label: "AWS Secret access key",
            },
        ],
    },
    VendorDef {
        name: "github",
        fields: &[CredentialFieldDef {
            field: "accessToken",
            label: "Github Personal Access Token with access to the above organization",
        }],
    },
    VendorDef {
        name: "circleci",
        fields: &[CredentialFieldDef {
            field: "apiKey",
            label: "Circleci api key for CI/CD",
        }],
    },
];

pub fn find_vendor(name: &str) -> Option<&'static VendorDef> {
    VENDOR_REGISTRY.iter().find(|def| def.name == name)
}

/// Union of every module's required vendors, each once.
pub fn required_vendors<'a>(modules: impl IntoIterator<Item = &'a ModuleConfig>) -> BTreeSet<String> {
    modules
        .into_iter()
        .flat_map(|m| m.required_credentials.iter().cloned())
        .collect()
}

/// Prompts for one vendor, pre-filled from stored credentials.
///
/// Unknown vendors yield no prompts.
pub fn prompts_for_vendor(stored: &ProjectCredential, vendor: &str) -> Vec<PromptHandler> {
    let Some(def) = find_vendor(vendor) else {
        tracing::debug!(vendor, "No prompt schema for vendor, skipping");
        return Vec::new();
    };

    def.fields
        .iter()
        .map(|f| {
            let default = stored.get(vendor, f.field).unwrap_or_default();
            PromptHandler::new(Parameter::new(f.field, f.label, default))
        })
        .collect()
}
