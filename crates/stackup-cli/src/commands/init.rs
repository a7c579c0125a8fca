//! `stackup init` - run the whole scaffolding pipeline.

use tracing::{info, instrument};

use stackup_adapters::{FileCredentialStore, LocalFilesystem, SimpleRenderer};
use stackup_core::{
    application::{InitOutcome, InitService, ports::IdentityVerifier},
    error::StackupError,
};

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::terminal_prompter,
};

#[cfg(feature = "aws")]
fn identity_verifier() -> Box<dyn IdentityVerifier> {
    Box::new(stackup_adapters::AwsStsVerifier::new())
}

#[cfg(not(feature = "aws"))]
fn identity_verifier() -> Box<dyn IdentityVerifier> {
    Box::new(stackup_adapters::UnavailableVerifier)
}

#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub async fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let registry = config.registry().map_err(StackupError::from)?;

    let service = InitService::new(
        super::module_service(&config),
        terminal_prompter(),
        Box::new(FileCredentialStore::new(config.credentials_path())),
        identity_verifier(),
        Box::new(LocalFilesystem::new()),
        Box::new(SimpleRenderer::new()),
    );

    let outcome = service.init(&registry, &args.dir).await?;
    info!(project = %outcome.config.name, stack = %outcome.stack, "Project created");

    if let Some(err) = &outcome.verification_error {
        output.warning(&format!("Could not verify AWS credentials: {err}"))?;
        output.warning("The project was created without an AWS account id")?;
    }

    if output.is_json() {
        return output.json(&outcome.config);
    }

    report(&outcome, &output)
}

fn report(outcome: &InitOutcome, output: &OutputManager) -> CliResult<()> {
    output.success(&format!(
        "Project '{}' created at {}",
        outcome.config.name,
        outcome.root.display()
    ))?;

    if output.is_quiet() {
        return Ok(());
    }

    output.print("")?;
    output.header(&format!("Stack: {}", outcome.stack))?;
    let rendered = toml::to_string_pretty(&outcome.config).map_err(|e| CliError::Serialization {
        message: e.to_string(),
        source: Box::new(e),
    })?;
    output.print(&rendered)?;

    output.header("Files:")?;
    for file in &outcome.files {
        output.print(&format!("  {}", outcome.root.join(file).display()))?;
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", outcome.root.display()))?;
    Ok(())
}
