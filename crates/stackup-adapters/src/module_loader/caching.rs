//! Module loader backed by a local cache directory.
//!
//! # Cache layout
//!
//! ```text
//! <cache_dir>/
//! ├── github.com_commitdev_zero-deployable-backend-3f9c.../   ← one per source
//! │   └── stackup-module.toml
//! └── backend-8a41....partial-<uuid>/                        ← fetch in progress
//! ```
//!
//! Every fetch materialises into a uniquely named staging directory first and
//! is renamed into place only once complete, so a failed fetch leaves the
//! previous copy (if any) untouched. Fetches of the same source through one
//! loader take turns; a stack may list a source more than once.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use stackup_core::{
    application::{ApplicationError, ports::ModuleLoader},
    domain::{ModuleConfig, ModuleSource, SourceKind},
    error::{StackupError, StackupResult},
};

use super::manifest::ModuleManifest;

/// Conventional descriptor path, relative to the module root.
pub const DESCRIPTOR_FILE: &str = "stackup-module.toml";

/// Fetches modules with `git clone` or a local copy, then parses them from
/// the cache.
#[derive(Debug, Clone)]
pub struct CachingModuleLoader {
    cache_dir: PathBuf,
    git: PathBuf,
    /// One lock per cache key, shared by clones.
    fetch_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl CachingModuleLoader {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            git: PathBuf::from("git"),
            fetch_locks: Arc::default(),
        }
    }

    /// Use a specific git executable.
    pub fn with_git(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = git.into();
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Where `source` lives once fetched.
    pub fn module_path(&self, source: &ModuleSource) -> PathBuf {
        self.cache_dir.join(source.cache_key())
    }

    fn sibling(&self, source: &ModuleSource, tag: &str) -> PathBuf {
        self.cache_dir.join(format!(
            "{}.{}-{}",
            source.cache_key(),
            tag,
            Uuid::new_v4().simple()
        ))
    }

    async fn fetch_lock(&self, source: &ModuleSource) -> Arc<Mutex<()>> {
        let mut locks = self.fetch_locks.lock().await;
        Arc::clone(locks.entry(source.cache_key()).or_default())
    }

    async fn clone_repo(&self, url: &str, into: &Path) -> Result<(), String> {
        debug!(url, "Cloning module repository");
        let output = Command::new(&self.git)
            .args(["clone", "--depth", "1", "--quiet", url])
            .arg(into)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {e}", self.git.display()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("git clone failed: {}", stderr.trim()))
        }
    }

    /// Replace `dest` with the finished staging directory.
    async fn swap_in(&self, source: &ModuleSource, staging: &Path, dest: &Path) -> Result<(), String> {
        let retired = if tokio::fs::try_exists(dest).await.unwrap_or(false) {
            let retired = self.sibling(source, "old");
            match tokio::fs::rename(dest, &retired).await {
                Ok(()) => Some(retired),
                // Retired by another process in the meantime.
                Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                Err(e) => return Err(format!("failed to retire previous copy: {e}")),
            }
        } else {
            None
        };

        if let Err(e) = tokio::fs::rename(staging, dest).await {
            // Another fetch of the same source finished first.
            if tokio::fs::try_exists(dest).await.unwrap_or(false) {
                discard(staging).await;
            } else {
                return Err(format!("failed to move module into cache: {e}"));
            }
        }

        if let Some(retired) = retired {
            discard(&retired).await;
        }
        Ok(())
    }
}

#[async_trait]
impl ModuleLoader for CachingModuleLoader {
    #[instrument(skip_all, fields(source = %source))]
    async fn fetch(&self, source: &ModuleSource) -> StackupResult<()> {
        let lock = self.fetch_lock(source).await;
        let _turn = lock.lock().await;

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| fetch_error(source, format!("failed to create cache directory: {e}")))?;

        let staging = self.sibling(source, "partial");
        let materialized = match source.kind() {
            SourceKind::Remote(url) => self.clone_repo(&url, &staging).await,
            SourceKind::Local(path) => copy_local(path, staging.clone()).await,
        };

        if let Err(reason) = materialized {
            discard(&staging).await;
            return Err(fetch_error(source, reason));
        }

        let dest = self.module_path(source);
        self.swap_in(source, &staging, &dest)
            .await
            .map_err(|reason| fetch_error(source, reason))?;

        debug!(path = %dest.display(), "Module cached");
        Ok(())
    }

    #[instrument(skip_all, fields(source = %source))]
    fn parse(&self, source: &ModuleSource) -> StackupResult<ModuleConfig> {
        let path = self.module_path(source).join(DESCRIPTOR_FILE);

        let raw = fs::read_to_string(&path).map_err(|e| {
            parse_error(source, format!("failed to read '{}': {e}", path.display()))
        })?;

        let manifest: ModuleManifest = toml::from_str(&raw).map_err(|e| {
            parse_error(source, format!("failed to parse '{}': {e}", path.display()))
        })?;

        let config = manifest.into_config();
        config
            .validate()
            .map_err(|e| parse_error(source, e.to_string()))?;

        debug!(module = %config.name, parameters = config.parameters.len(), "Descriptor parsed");
        Ok(config)
    }
}

async fn copy_local(from: PathBuf, to: PathBuf) -> Result<(), String> {
    tokio::task::spawn_blocking(move || copy_dir(&from, &to))
        .await
        .map_err(|e| format!("copy task failed: {e}"))?
        .map_err(|e| format!("failed to copy module: {e}"))
}

/// Recursively copy `src` into `dst`, skipping any `.git` directory.
fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", src.display()),
        ));
    }
    fs::create_dir_all(dst)?;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to clean up cache entry");
        }
    }
}

fn fetch_error(source: &ModuleSource, reason: String) -> StackupError {
    ApplicationError::ModuleFetch {
        location: source.to_string(),
        reason,
    }
    .into()
}

fn parse_error(source: &ModuleSource, reason: String) -> StackupError {
    ApplicationError::ModuleParse {
        location: source.to_string(),
        reason,
    }
    .into()
}
