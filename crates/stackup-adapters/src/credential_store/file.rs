//! Credentials persisted to a TOML file.
//!
//! ```toml
//! [projects.demo]
//! project_name = "demo"
//!
//! [projects.demo.github]
//! access_token = "ghp_..."
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use stackup_core::{
    application::{ApplicationError, ports::CredentialStore},
    domain::ProjectCredential,
    error::{StackupError, StackupResult},
};

/// On-disk document: one credential record per project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsFile {
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectCredential>,
}

/// Credential store backed by a single file, readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StackupResult<CredentialsFile> {
        if !self.path.exists() {
            return Ok(CredentialsFile::default());
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| store_error(format!("failed to read {}: {e}", self.path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| store_error(format!("failed to parse {}: {e}", self.path.display())))
    }

    fn write(&self, document: &CredentialsFile) -> StackupResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                store_error(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let content = toml::to_string_pretty(document)
            .map_err(|e| store_error(format!("failed to serialize credentials: {e}")))?;

        let mut file = open_private(&self.path)
            .map_err(|e| store_error(format!("failed to open {}: {e}", self.path.display())))?;
        file.write_all(content.as_bytes())
            .map_err(|e| store_error(format!("failed to write {}: {e}", self.path.display())))
    }
}

impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self, project: &str) -> StackupResult<ProjectCredential> {
        let document = self.read()?;
        let found = document.projects.get(project).cloned();
        debug!(found = found.is_some(), "Loaded stored credentials");

        Ok(found.unwrap_or_else(|| ProjectCredential::new(project)))
    }

    #[instrument(skip_all, fields(path = %self.path.display(), project = %credential.project_name))]
    fn save(&self, credential: &ProjectCredential) -> StackupResult<()> {
        let mut document = self.read()?;
        document
            .projects
            .insert(credential.project_name.clone(), credential.clone());
        self.write(&document)?;

        debug!(projects = document.projects.len(), "Credentials saved");
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

fn store_error(reason: String) -> StackupError {
    ApplicationError::CredentialStore { reason }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unknown_project_loads_empty_record() {
        let temp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp.path().join("credentials.toml"));

        let creds = store.load("demo").unwrap();
        assert_eq!(creds, ProjectCredential::new("demo"));
    }

    #[test]
    fn saved_credentials_round_trip_per_project() {
        let temp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp.path().join("nested/credentials.toml"));

        let mut demo = ProjectCredential::new("demo");
        demo.github.access_token = "ghp_demo".into();
        let mut other = ProjectCredential::new("other");
        other.aws.access_key_id = "AKIA".into();

        store.save(&demo).unwrap();
        store.save(&other).unwrap();

        assert_eq!(store.load("demo").unwrap(), demo);
        assert_eq!(store.load("other").unwrap(), other);
    }

    #[test]
    fn saving_replaces_existing_record() {
        let temp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp.path().join("credentials.toml"));

        let mut creds = ProjectCredential::new("demo");
        creds.circleci.api_key = "one".into();
        store.save(&creds).unwrap();
        creds.circleci.api_key = "two".into();
        store.save(&creds).unwrap();

        assert_eq!(store.load("demo").unwrap().circleci.api_key, "two");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("credentials.toml");
        fs::write(&path, "projects = [").unwrap();

        let err = FileCredentialStore::new(&path).load("demo").unwrap_err();
        assert!(matches!(
            err,
            StackupError::Application(ApplicationError::CredentialStore { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("credentials.toml");
        FileCredentialStore::new(&path)
            .save(&ProjectCredential::new("demo"))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
