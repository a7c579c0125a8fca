//! Integration tests for the `stackup` binary.
//!
//! Every test writes its own config file so nothing touches the user's
//! config, cache or credentials. `init` runs through the line prompter with
//! answers piped on stdin.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("out")).unwrap();
        Self { temp }
    }

    fn path(&self) -> &Path {
        self.temp.path()
    }

    fn out(&self) -> PathBuf {
        self.path().join("out")
    }

    fn module(&self, name: &str, descriptor: &str) -> String {
        let dir = self.path().join("modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stackup-module.toml"), descriptor).unwrap();
        dir.display().to_string()
    }

    /// Config with one stack made of `sources`.
    fn config(&self, sources: &[String]) -> PathBuf {
        let modules = sources
            .iter()
            .map(|s| format!("{s:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        let config = format!(
            r#"
[modules]
cache_dir = {cache:?}
max_concurrent_fetches = 2

[credentials]
path = {creds:?}

[[stacks]]
name = "Web"
modules = [{modules}]
"#,
            cache = self.path().join("cache").display().to_string(),
            creds = self.credentials().display().to_string(),
        );
        let path = self.path().join("config.toml");
        fs::write(&path, config).unwrap();
        path
    }

    fn credentials(&self) -> PathBuf {
        self.path().join("credentials.toml")
    }

    fn stackup(&self, config: &Path) -> Command {
        let mut cmd = Command::cargo_bin("stackup").unwrap();
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(config);
        cmd
    }

    fn web_stack(&self) -> PathBuf {
        let backend = self.module(
            "backend",
            r#"
[module]
name = "backend"
required_credentials = ["github"]

[[parameters]]
field = "appName"
label = "Application name"
default = "api"
"#,
        );
        let frontend = self.module(
            "frontend",
            r#"
[module]
name = "frontend"
output_dir = "web"

[[parameters]]
field = "port"
label = "Dev server port"
default = "3000"
"#,
        );
        self.config(&[backend, frontend])
    }
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("stackup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("stacks"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    Command::cargo_bin("stackup")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_config_file_is_a_configuration_error() {
    let ws = Workspace::new();
    ws.stackup(&ws.path().join("absent.toml"))
        .args(["stacks", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn stacks_list_shows_configured_stacks() {
    let ws = Workspace::new();
    let config = ws.web_stack();

    ws.stackup(&config)
        .args(["stacks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Web"))
        .stdout(predicate::str::contains("backend"));
}

#[test]
fn stacks_show_describes_modules() {
    let ws = Workspace::new();
    let config = ws.web_stack();

    ws.stackup(&config)
        .args(["stacks", "show", "Web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("frontend -> web/"))
        .stdout(predicate::str::contains("appName"))
        .stdout(predicate::str::contains("credentials: github"));
}

#[test]
fn stacks_show_json() {
    let ws = Workspace::new();
    let config = ws.web_stack();

    let output = ws
        .stackup(&config)
        .args(["--output-format", "json", "stacks", "show", "Web"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["stack"]["name"], "Web");
    assert_eq!(report["required_credentials"], serde_json::json!(["github"]));
    assert_eq!(report["modules"].as_array().unwrap().len(), 2);
}

#[test]
fn stacks_show_unknown_stack_is_not_found() {
    let ws = Workspace::new();
    let config = ws.web_stack();

    ws.stackup(&config)
        .args(["stacks", "show", "Serverless"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Stack not found"))
        .stderr(predicate::str::contains("Web"));
}

#[test]
fn stacks_show_reports_broken_module() {
    let ws = Workspace::new();
    let broken = ws.module("broken", "[module]\nname = \n");
    let config = ws.config(&[broken]);

    ws.stackup(&config)
        .args(["stacks", "show", "Web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to load module"));
}

#[test]
fn init_creates_project_from_piped_answers() {
    let ws = Workspace::new();
    let config = ws.web_stack();

    // name, stack, push (rejected once), backend repo, frontend repo,
    // github token, appName, port
    let answers = "demo\n1\nmaybe\nn\n\n\nghp_test\n\n8080\n";

    ws.stackup(&config)
        .args(["init", "--dir"])
        .arg(ws.out())
        .write_stdin(answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'demo' created"))
        .stderr(predicate::str::contains("'maybe' is not a valid answer"));

    let project = fs::read_to_string(ws.out().join("demo/stackup-project.toml")).unwrap();
    let parsed: toml::Value = toml::from_str(&project).unwrap();
    assert_eq!(parsed["should_push_repositories"].as_bool(), Some(false));
    assert_eq!(parsed["modules"]["frontend"]["repo_name"].as_str(), Some("web"));
    assert_eq!(
        parsed["modules"]["frontend"]["parameters"]["port"].as_str(),
        Some("8080")
    );
    assert_eq!(
        parsed["modules"]["backend"]["parameters"]["appName"].as_str(),
        Some("api")
    );
    assert!(parsed["modules"]["backend"].get("repo_url").is_none());
    assert!(ws.out().join("demo/.gitignore").exists());

    let credentials = fs::read_to_string(ws.credentials()).unwrap();
    assert!(credentials.contains("ghp_test"));
}

#[test]
fn init_refuses_existing_directory() {
    let ws = Workspace::new();
    let config = ws.web_stack();
    fs::create_dir_all(ws.out().join("demo")).unwrap();

    ws.stackup(&config)
        .args(["init", "--dir"])
        .arg(ws.out())
        .write_stdin("demo\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_fails_when_input_ends_early() {
    let ws = Workspace::new();
    let config = ws.web_stack();

    ws.stackup(&config)
        .args(["init", "--dir"])
        .arg(ws.out())
        .write_stdin("demo\n1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt failed"));

    assert!(!ws.out().join("demo").exists());
}

#[test]
fn config_get_reads_file_values() {
    let ws = Workspace::new();
    let config = ws.web_stack();

    ws.stackup(&config)
        .args(["config", "get", "modules.max_concurrent_fetches"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modules.max_concurrent_fetches = 2"));
}

#[test]
fn shell_completions() {
    Command::cargo_bin("stackup")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackup"));
}
