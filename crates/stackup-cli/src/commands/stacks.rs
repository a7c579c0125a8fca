//! `stackup stacks` - list stacks and inspect their modules.

use serde::Serialize;
use tracing::instrument;

use stackup_core::{
    domain::{ModuleConfig, Stack, StackRegistry, required_vendors},
    error::StackupError,
};

use crate::{
    cli::StacksCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub async fn execute(cmd: StacksCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let registry = config.registry().map_err(StackupError::from)?;

    match cmd {
        StacksCommands::List => list(&registry, &output),
        StacksCommands::Show { name } => show(&registry, &name, &config, &output).await,
    }
}

fn list(registry: &StackRegistry, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        return output.json(registry.stacks());
    }

    output.header("Available stacks:")?;
    for stack in registry.stacks() {
        output.print(&format!("  {}", stack.name))?;
        if stack.modules.is_empty() {
            output.print("      (no modules)")?;
        }
        for source in &stack.modules {
            output.print(&format!("      {source}"))?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct StackReport<'a> {
    stack: &'a Stack,
    required_credentials: Vec<String>,
    modules: Vec<&'a ModuleConfig>,
}

#[instrument(skip(registry, config, output))]
async fn show(
    registry: &StackRegistry,
    name: &str,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let stack = registry.get(name).map_err(|_| CliError::StackNotFound {
        name: name.to_string(),
        available: registry.labels(),
    })?;

    let spinner = output.spinner(format!("Fetching {} module(s)...", stack.modules.len()));
    let loaded = super::module_service(config)
        .load_all_modules(&stack.sources())
        .await;
    spinner.finish_and_clear();
    let modules = loaded?;

    let report = StackReport {
        stack,
        required_credentials: required_vendors(modules.values()).into_iter().collect(),
        modules: modules.values().collect(),
    };

    if output.is_json() {
        return output.json(&report);
    }

    output.header(&report.stack.name)?;
    if report.modules.is_empty() {
        output.print("  (no modules)")?;
        return Ok(());
    }
    output.print(&format!(
        "  credentials: {}",
        display_list(&report.required_credentials)
    ))?;

    for module in &report.modules {
        output.print("")?;
        output.print(&format!("  {} -> {}/", module.name, module.output_dir))?;
        let vendors: Vec<String> = module.required_credentials.iter().cloned().collect();
        output.print(&format!("    credentials: {}", display_list(&vendors)))?;
        for parameter in &module.parameters {
            output.print(&format!(
                "    {:<20} {} [{}]",
                parameter.field, parameter.label, parameter.default
            ))?;
        }
    }
    Ok(())
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "none".into()
    } else {
        items.join(", ")
    }
}
