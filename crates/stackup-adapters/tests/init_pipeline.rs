//! End-to-end init over real adapters: local modules copied through the
//! cache, in-memory output and credentials.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use stackup_adapters::{
    CachingModuleLoader, DESCRIPTOR_FILE, MemoryCredentialStore, MemoryFilesystem,
    SimpleRenderer, renderer::PROJECT_CONFIG_FILE,
};
use stackup_core::{
    application::{
        ApplicationError, DuplicatePolicy, Filesystem, InitService, ModuleService,
        ports::{IdentityVerifier, Prompter},
    },
    domain::{AwsCredentials, ProjectConfig, ProjectCredential, Stack, StackRegistry, ValidationRejected},
    error::StackupResult,
};

struct Script {
    answers: Mutex<VecDeque<String>>,
    selections: Mutex<VecDeque<usize>>,
}

impl Script {
    fn new(answers: &[&str], selections: &[usize]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
            selections: Mutex::new(selections.iter().copied().collect()),
        }
    }
}

impl Prompter for Script {
    fn ask(&self, _label: &str, default: &str) -> StackupResult<String> {
        match self.answers.lock().unwrap().pop_front() {
            Some(a) if a.is_empty() => Ok(default.to_string()),
            Some(a) => Ok(a),
            None => Err(ApplicationError::Prompt {
                reason: "script exhausted".into(),
            }
            .into()),
        }
    }

    fn select(&self, _label: &str, _options: &[String]) -> StackupResult<usize> {
        self.selections.lock().unwrap().pop_front().ok_or_else(|| {
            ApplicationError::Prompt {
                reason: "script exhausted".into(),
            }
            .into()
        })
    }

    fn reject(&self, _rejection: &ValidationRejected) {}
}

struct FixedAccount;

#[async_trait]
impl IdentityVerifier for FixedAccount {
    async fn account_id(&self, _credentials: &AwsCredentials, _region: &str) -> StackupResult<String> {
        Ok("210987654321".into())
    }
}

fn write_module(dir: &Path, descriptor: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(DESCRIPTOR_FILE), descriptor).unwrap();
}

#[tokio::test]
async fn init_builds_project_from_local_modules() {
    let modules = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    write_module(
        &modules.path().join("infra"),
        r#"
[module]
name = "infra"
output_dir = "infrastructure"
required_credentials = ["aws"]

[[parameters]]
field = "region"
label = "Region"
default = "us-east-1"
"#,
    );
    write_module(
        &modules.path().join("backend"),
        r#"
[module]
name = "backend"
required_credentials = ["github"]

[[parameters]]
field = "region"
label = "Region"
default = "eu-west-1"

[[parameters]]
field = "appName"
label = "App name"
default = "api"
"#,
    );

    let registry = StackRegistry::new(vec![Stack::new(
        "local",
        [
            modules.path().join("infra").display().to_string(),
            modules.path().join("backend").display().to_string(),
        ],
    )])
    .unwrap();

    // name, push, org, backend repo, infra repo, aws key, aws secret,
    // github token, aws region, backend region, appName
    let prompter = Script::new(
        &[
            "demo",
            "y",
            "github.com/acme",
            "",
            "",
            "AKIA",
            "secret",
            "ghp",
            "",
            "us-west-2",
            "",
        ],
        &[0, 0],
    );

    let filesystem = MemoryFilesystem::new();
    let credentials = MemoryCredentialStore::new();
    let service = InitService::new(
        ModuleService::new(Arc::new(CachingModuleLoader::new(cache.path()))),
        Arc::new(prompter),
        Box::new(credentials.clone()),
        Box::new(FixedAccount),
        Box::new(filesystem.clone()),
        Box::new(SimpleRenderer::new()),
    );

    let outcome = service.init(&registry, Path::new("/out")).await.unwrap();

    let config = &outcome.config;
    assert_eq!(config.modules["infra"].repo_name, "infrastructure");
    assert_eq!(
        config.modules["backend"].repo_url.as_deref(),
        Some("github.com/acme/backend")
    );
    assert_eq!(config.modules["infra"].parameters["region"], "us-west-2");
    assert_eq!(config.modules["backend"].parameters["region"], "us-west-2");
    assert!(!config.modules["infra"].parameters.contains_key("appName"));
    assert_eq!(
        config.infrastructure.aws.as_ref().unwrap().account_id,
        "210987654321"
    );

    let stored: ProjectCredential = credentials.get("demo").unwrap();
    assert_eq!(stored.aws.access_key_id, "AKIA");
    assert_eq!(stored.github.access_token, "ghp");

    let written = filesystem
        .read_file(&Path::new("/out/demo").join(PROJECT_CONFIG_FILE))
        .unwrap();
    let parsed: ProjectConfig = toml::from_str(&written).unwrap();
    assert_eq!(&parsed, config);
    assert!(filesystem.exists(Path::new("/out/demo/.gitignore")));
}

#[tokio::test]
async fn failed_load_removes_project_directory() {
    let cache = TempDir::new().unwrap();
    let registry =
        StackRegistry::new(vec![Stack::new("broken", ["/definitely/not/a/module"])]).unwrap();

    let filesystem = MemoryFilesystem::new();
    let service = InitService::new(
        ModuleService::new(Arc::new(CachingModuleLoader::new(cache.path()))),
        Arc::new(Script::new(&["demo"], &[0])),
        Box::new(MemoryCredentialStore::new()),
        Box::new(FixedAccount),
        Box::new(filesystem.clone()),
        Box::new(SimpleRenderer::new()),
    );

    let err = service.init(&registry, Path::new("/out")).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(!filesystem.exists(Path::new("/out/demo")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn repeated_source_loads_over_warm_cache() {
    let modules = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let dir = modules.path().join("backend");
    write_module(&dir, "[module]\nname = \"backend\"\n");

    let loader = Arc::new(CachingModuleLoader::new(cache.path()));
    let service = ModuleService::new(loader).with_duplicate_policy(DuplicatePolicy::LastWins);
    let source = stackup_core::domain::ModuleSource::new(dir.display().to_string());
    let sources = vec![source.clone(), source.clone(), source];

    service.load_all_modules(&sources[..1]).await.unwrap();
    for _ in 0..50 {
        let loaded = service.load_all_modules(&sources).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("backend"));
    }
}
