//! Module Service - concurrent fetch, then ordered parse.
//!
//! Fetching is the only concurrent stage of the whole pipeline:
//! 1. Spawn one fetch task per source, bounded by a semaphore
//! 2. Wait for every task (barrier)
//! 3. Abort on the first failed fetch, in input order
//! 4. Parse each source sequentially and index by declared module name

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::ModuleLoader},
    domain::{ModuleSource, Modules},
    error::{StackupError, StackupResult},
};

/// Default bound on in-flight fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// What to do when two sources declare the same module name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail the load with `DuplicateModule`.
    #[default]
    Reject,
    /// Keep the module from the later source in input order.
    LastWins,
}

/// Loads every module of a stack.
pub struct ModuleService {
    loader: Arc<dyn ModuleLoader>,
    max_concurrent_fetches: usize,
    duplicate_policy: DuplicatePolicy,
}

impl ModuleService {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Bound concurrent fetches. Zero is treated as one.
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Fetch all sources concurrently, then parse them in input order.
    ///
    /// Either every module loads or the whole operation fails; there is no
    /// partial result.
    #[instrument(skip_all, fields(sources = sources.len(), policy = ?self.duplicate_policy))]
    pub async fn load_all_modules(&self, sources: &[ModuleSource]) -> StackupResult<Modules> {
        let results = self.fetch_all(sources).await?;

        if let Some((source, err)) = sources
            .iter()
            .zip(results)
            .find_map(|(source, result)| result.err().map(|e| (source, e)))
        {
            return Err(as_fetch_error(source, err));
        }

        let mut modules = Modules::new();
        let mut origins: HashMap<String, &ModuleSource> = HashMap::new();

        for source in sources {
            let config = self.loader.parse(source)?;
            debug!(module = %config.name, %source, "Parsed module");

            if let Some(previous) = origins.insert(config.name.clone(), source) {
                match self.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(ApplicationError::DuplicateModule {
                            name: config.name,
                            first: previous.to_string(),
                            second: source.to_string(),
                        }
                        .into());
                    }
                    DuplicatePolicy::LastWins => warn!(
                        module = %config.name,
                        replaced = %previous,
                        by = %source,
                        "Duplicate module name, keeping the later source"
                    ),
                }
            }
            modules.insert(config.name.clone(), config);
        }

        info!(modules = modules.len(), "Modules loaded");
        Ok(modules)
    }

    /// Run every fetch and collect the results by input index.
    async fn fetch_all(&self, sources: &[ModuleSource]) -> StackupResult<Vec<StackupResult<()>>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let mut tasks = JoinSet::new();

        for (index, source) in sources.iter().cloned().enumerate() {
            let loader = Arc::clone(&self.loader);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => loader.fetch(&source).await,
                    Err(e) => Err(ApplicationError::TaskFailed {
                        reason: e.to_string(),
                    }
                    .into()),
                };
                if let Err(e) = &result {
                    warn!(%source, error = %e, "Module fetch failed");
                }
                (index, result)
            });
        }

        let mut results: Vec<StackupResult<()>> = vec![Ok(()); sources.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| ApplicationError::TaskFailed {
                reason: e.to_string(),
            })?;
            results[index] = result;
        }
        Ok(results)
    }
}

/// Make sure a fetch failure names its source.
fn as_fetch_error(source: &ModuleSource, err: StackupError) -> StackupError {
    match err {
        StackupError::Application(ApplicationError::ModuleFetch { .. }) => err,
        other => ApplicationError::ModuleFetch {
            location: source.to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}
