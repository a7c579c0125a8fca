//! In-memory credential store for testing.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use stackup_core::{
    application::{ApplicationError, ports::CredentialStore},
    domain::ProjectCredential,
    error::StackupResult,
};

/// Credential store that never touches disk. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    records: Arc<RwLock<HashMap<String, ProjectCredential>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a record.
    pub fn with(self, credential: ProjectCredential) -> Self {
        if let Ok(mut records) = self.records.write() {
            records.insert(credential.project_name.clone(), credential);
        }
        self
    }

    /// Stored record, if any (testing helper).
    pub fn get(&self, project: &str) -> Option<ProjectCredential> {
        self.records.read().ok()?.get(project).cloned()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, project: &str) -> StackupResult<ProjectCredential> {
        let records = self
            .records
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(records
            .get(project)
            .cloned()
            .unwrap_or_else(|| ProjectCredential::new(project)))
    }

    fn save(&self, credential: &ProjectCredential) -> StackupResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        records.insert(credential.project_name.clone(), credential.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepopulated_record_is_loaded() {
        let mut creds = ProjectCredential::new("demo");
        creds.github.access_token = "ghp".into();
        let store = MemoryCredentialStore::new().with(creds.clone());

        assert_eq!(store.load("demo").unwrap(), creds);
        assert_eq!(store.load("other").unwrap(), ProjectCredential::new("other"));
    }

    #[test]
    fn clones_share_saved_records() {
        let store = MemoryCredentialStore::new();
        let handle = store.clone();

        store.save(&ProjectCredential::new("demo")).unwrap();
        assert!(handle.get("demo").is_some());
    }
}
