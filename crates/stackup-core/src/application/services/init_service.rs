//! Init Service - the interactive project initialization pipeline.
//!
//! 1. Ask for the project name and reserve `<base>/<name>`
//! 2. Pick a stack and load its modules
//! 3. Ask the project questions (push, org, repository names)
//! 4. Ask for vendor credentials and persist them
//! 5. Resolve the cloud provider and look up the account
//! 6. Ask every module parameter once, then fan the answers out
//! 7. Render and write the project files
//!
//! Any fatal error after step 1 removes the project directory again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CredentialStore, Filesystem, IdentityVerifier, Prompter, TemplateRenderer},
        services::{ModuleService, PromptResolver},
    },
    domain::{
        AwsInfrastructure, Condition, Modules, Parameter, ParameterValues, ProjectConfig,
        ProjectCredential, ProjectModule, PromptHandler, PromptSequence, RenderContext,
        StackRegistry, Validation, assign_module_parameters, prompts_for_vendor,
        required_vendors, validate_project_name,
    },
    error::{StackupError, StackupResult},
};

pub const PROJECT_NAME: &str = "projectName";
pub const SHOULD_PUSH_REPOSITORIES: &str = "ShouldPushRepositories";
pub const GITHUB_ROOT_ORG: &str = "GithubRootOrg";
pub const AWS_REGION: &str = "awsRegion";

const AWS_PROVIDER: &str = "Amazon AWS";

/// Tunables for [`InitService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    /// Offered in the provider selection; only AWS is supported.
    pub cloud_providers: Vec<String>,
    pub default_region: String,
    pub default_github_org: String,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            cloud_providers: vec![
                AWS_PROVIDER.to_string(),
                "Google GCP".to_string(),
                "Microsoft Azure".to_string(),
            ],
            default_region: "us-east-1".to_string(),
            default_github_org: "github.com/".to_string(),
        }
    }
}

/// Result of a successful `init`.
#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub root: PathBuf,
    pub stack: String,
    pub config: ProjectConfig,
    pub credentials: ProjectCredential,
    /// Account lookup failure; reported but not fatal.
    pub verification_error: Option<StackupError>,
    /// Files written, relative to `root`.
    pub files: Vec<PathBuf>,
}

/// Project initialization orchestrator.
pub struct InitService {
    modules: ModuleService,
    prompter: Arc<dyn Prompter>,
    credentials: Box<dyn CredentialStore>,
    verifier: Box<dyn IdentityVerifier>,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    options: InitOptions,
}

impl InitService {
    pub fn new(
        modules: ModuleService,
        prompter: Arc<dyn Prompter>,
        credentials: Box<dyn CredentialStore>,
        verifier: Box<dyn IdentityVerifier>,
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            modules,
            prompter,
            credentials,
            verifier,
            filesystem,
            renderer,
            options: InitOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InitOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the whole pipeline, creating the project under `base_dir`.
    #[instrument(skip_all, fields(base_dir = %base_dir.display()))]
    pub async fn init(
        &self,
        registry: &StackRegistry,
        base_dir: &Path,
    ) -> StackupResult<InitOutcome> {
        let resolver = PromptResolver::new(self.prompter.as_ref());
        let mut project_answers = ParameterValues::new();

        let name = resolver
            .resolve(
                &PromptHandler::new(Parameter::new(PROJECT_NAME, "Project Name", "")),
                &mut project_answers,
            )?
            .unwrap_or_default();
        validate_project_name(&name)?;

        let root = base_dir.join(&name);
        if self.filesystem.exists(&root) {
            return Err(ApplicationError::DirectoryExists { path: root }.into());
        }
        self.filesystem.create_dir_all(&root)?;
        info!(project = %name, root = %root.display(), "Initializing project");

        match self.run(registry, &root, name, project_answers).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(error = %e, "Init failed, attempting rollback");
                self.rollback(&root);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        registry: &StackRegistry,
        root: &Path,
        name: String,
        mut project_answers: ParameterValues,
    ) -> StackupResult<InitOutcome> {
        let resolver = PromptResolver::new(self.prompter.as_ref());

        // Stack
        let labels = registry.labels();
        if labels.is_empty() {
            return Err(StackupError::Configuration {
                message: "no stacks are configured".into(),
            });
        }
        let choice = self
            .prompter
            .select("Pick a stack you'd like to use", &labels)?;
        let label = labels.get(choice).ok_or_else(|| ApplicationError::Prompt {
            reason: format!("selection {choice} is out of range"),
        })?;
        let stack = registry.get(label)?;
        info!(stack = %stack.name, modules = stack.modules.len(), "Stack selected");

        let modules = self.modules.load_all_modules(&stack.sources()).await?;

        // Project questions; repository names are keyed by module name, so
        // they get their own answers.
        resolver.resolve_sequence(&self.project_prompts()?, &mut project_answers)?;
        let should_push = project_answers.get(SHOULD_PUSH_REPOSITORIES) != Some("n");
        let mut repo_names = ParameterValues::new();
        resolver.resolve_sequence(&repository_prompts(&modules)?, &mut repo_names)?;

        // Credentials
        let credentials = self.collect_credentials(&name, &modules)?;

        // Provider
        let mut config = ProjectConfig::new(name.as_str());
        config.should_push_repositories = should_push;
        let mut verification_error = None;
        if modules
            .values()
            .any(|m| m.required_credentials.contains("aws"))
        {
            let region = self.choose_provider(&resolver, &mut project_answers)?;
            let account_id = match self.verifier.account_id(&credentials.aws, &region).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "Could not verify AWS credentials");
                    verification_error = Some(e);
                    String::new()
                }
            };
            config.infrastructure.aws = Some(AwsInfrastructure { region, account_id });
        }

        // Module parameters, each field asked once
        let mut module_answers = ParameterValues::new();
        for module in modules.values() {
            for parameter in &module.parameters {
                resolver.resolve(&PromptHandler::new(parameter.clone()), &mut module_answers)?;
            }
        }

        let org = should_push
            .then(|| project_answers.get(GITHUB_ROOT_ORG))
            .flatten();
        for (module_name, params) in assign_module_parameters(&modules, &module_answers) {
            let repo_name = repo_names
                .get(&module_name)
                .unwrap_or(module_name.as_str())
                .to_string();
            config
                .modules
                .insert(module_name, ProjectModule::new(params, repo_name, org));
        }
        config.parameters = project_answers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let context = RenderContext::new(name.as_str()).with_variable("STACK", stack.name.as_str());
        let files = self.write_files(root, &config, &context)?;

        info!(files = files.len(), "Project initialized");
        Ok(InitOutcome {
            root: root.to_path_buf(),
            stack: stack.name.clone(),
            config,
            credentials,
            verification_error,
            files,
        })
    }

    /// Push, then the org when pushing.
    fn project_prompts(&self) -> StackupResult<PromptSequence> {
        let mut sequence = PromptSequence::seeded([PROJECT_NAME]);
        sequence.push(
            PromptHandler::new(Parameter::new(
                SHOULD_PUSH_REPOSITORIES,
                "Should the created projects be checked into github automatically? (y/n)",
                "y",
            ))
            .validated_by(Validation::one_of(["y", "n"])),
        )?;
        sequence.push(
            PromptHandler::new(Parameter::new(
                GITHUB_ROOT_ORG,
                "What's the root of the github org to create repositories in?",
                self.options.default_github_org.as_str(),
            ))
            .when(Condition::key_equals(SHOULD_PUSH_REPOSITORIES, "y")),
        )?;
        Ok(sequence)
    }

    /// Ask each required vendor's questions, pre-filled from the store, and save.
    fn collect_credentials(&self, project: &str, modules: &Modules) -> StackupResult<ProjectCredential> {
        let resolver = PromptResolver::new(self.prompter.as_ref());
        let mut credentials = self.credentials.load(project)?;

        for vendor in required_vendors(modules.values()) {
            let mut answers = ParameterValues::new();
            for handler in prompts_for_vendor(&credentials, &vendor) {
                resolver.resolve(&handler, &mut answers)?;
            }
            let applied = credentials.apply_answers(&vendor, &answers);
            info!(%vendor, fields = applied, "Credentials collected");
        }

        self.credentials.save(&credentials)?;
        Ok(credentials)
    }

    /// Select the provider and ask for its region.
    fn choose_provider(
        &self,
        resolver: &PromptResolver<'_>,
        answers: &mut ParameterValues,
    ) -> StackupResult<String> {
        let providers = &self.options.cloud_providers;
        let index = self.prompter.select("Select Cloud Provider", providers)?;
        let provider = providers.get(index).map(String::as_str).unwrap_or_default();
        if provider != AWS_PROVIDER {
            return Err(ApplicationError::UnsupportedProvider {
                provider: provider.to_string(),
            }
            .into());
        }

        let region = resolver
            .resolve(
                &PromptHandler::new(Parameter::new(
                    AWS_REGION,
                    "AWS Region",
                    self.options.default_region.as_str(),
                )),
                answers,
            )?
            .unwrap_or_else(|| self.options.default_region.clone());
        Ok(region)
    }

    fn write_files(
        &self,
        root: &Path,
        config: &ProjectConfig,
        context: &RenderContext,
    ) -> StackupResult<Vec<PathBuf>> {
        let rendered = self.renderer.render(config, context)?;
        let mut written = Vec::with_capacity(rendered.len());

        for file in rendered {
            let path = root.join(&file.path);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, &file.content)?;
            written.push(file.path);
        }
        Ok(written)
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

/// One repository-name question per module, keyed by module name.
fn repository_prompts(modules: &Modules) -> StackupResult<PromptSequence> {
    let mut sequence = PromptSequence::new();
    for module in modules.values() {
        sequence.push(PromptHandler::new(Parameter::new(
            module.name.as_str(),
            format!("What do you want to call the {} project?", module.name),
            module.output_dir.as_str(),
        )))?;
    }
    Ok(sequence)
}
