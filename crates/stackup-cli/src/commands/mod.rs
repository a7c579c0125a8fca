//! Command handlers. Each translates arguments into service calls and prints
//! the result; no pipeline logic lives here.

use std::sync::Arc;

use stackup_adapters::CachingModuleLoader;
use stackup_core::application::ModuleService;
use tracing::debug;

use crate::config::AppConfig;

pub mod completions;
pub mod config;
pub mod init;
pub mod stacks;

/// Module loading as configured: cache location, fetch bound, duplicate policy.
fn module_service(config: &AppConfig) -> ModuleService {
    let cache_dir = config.cache_dir();
    debug!(cache_dir = %cache_dir.display(), "Module cache");

    ModuleService::new(Arc::new(CachingModuleLoader::new(cache_dir)))
        .with_max_concurrent_fetches(config.modules.max_concurrent_fetches)
        .with_duplicate_policy(config.modules.duplicate_policy)
}
