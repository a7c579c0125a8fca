//! Stacks: named, curated lists of module sources.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, module::ModuleSource};

/// One selectable scaffolding option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub name: String,
    #[serde(default)]
    pub modules: Vec<String>,
}

impl Stack {
    pub fn new<I, S>(name: impl Into<String>, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sources(&self) -> Vec<ModuleSource> {
        self.modules.iter().map(ModuleSource::new).collect()
    }
}

/// Immutable table of stacks, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRegistry {
    stacks: Vec<Stack>,
}

impl StackRegistry {
    /// Build a registry, rejecting empty or duplicate stack names.
    pub fn new(stacks: Vec<Stack>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for stack in &stacks {
            if stack.name.trim().is_empty() {
                return Err(DomainError::InvalidStack("stack name cannot be empty".into()));
            }
            if !seen.insert(stack.name.as_str()) {
                return Err(DomainError::DuplicateStack {
                    name: stack.name.clone(),
                });
            }
        }
        Ok(Self { stacks })
    }

    /// The stacks shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            stacks: default_stacks(),
        }
    }

    /// Labels to offer in a selection prompt.
    pub fn labels(&self) -> Vec<String> {
        self.stacks.iter().map(|s| s.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&Stack, DomainError> {
        self.stacks
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DomainError::UnknownStack { name: name.into() })
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

/// Default stack table, used when the configuration does not define one.
pub fn default_stacks() -> Vec<Stack> {
    vec![
        Stack::new(
            "EKS + Go + React",
            [
                "github.com/commitdev/zero-aws-eks-stack",
                "github.com/commitdev/zero-deployable-backend",
                "github.com/commitdev/zero-deployable-react-frontend",
            ],
        ),
        Stack::new("Custom", Vec::<String>::new()),
    ]
}
