//! Simple variable substitution renderer.

use stackup_core::{
    application::{
        ApplicationError,
        ports::{RenderedFile, TemplateRenderer},
    },
    domain::{ProjectConfig, RenderContext},
    error::StackupResult,
};
use tracing::instrument;

/// File the project configuration is written to.
pub const PROJECT_CONFIG_FILE: &str = "stackup-project.toml";

const CONFIG_HEADER: &str = "\
# {{PROJECT_NAME}} - generated by stackup {{STACKUP_VERSION}}
# Stack: {{STACK}}
#
# Credentials are not stored here; see `stackup config path`.

";

const GITIGNORE: &str = "\
# {{PROJECT_NAME}}
.env
.env.*
*.tfstate
*.tfstate.backup
.terraform/
node_modules/
/target/
.DS_Store
";

/// Renderer producing the project configuration and boilerplate files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(project = %config.name))]
    fn render(
        &self,
        config: &ProjectConfig,
        context: &RenderContext,
    ) -> StackupResult<Vec<RenderedFile>> {
        let body = toml::to_string_pretty(config).map_err(|e| ApplicationError::RenderingFailed {
            reason: format!("failed to serialize project config: {e}"),
        })?;

        Ok(vec![
            RenderedFile::new(
                PROJECT_CONFIG_FILE,
                format!("{}{}", context.render(CONFIG_HEADER), body),
            ),
            RenderedFile::new(".gitignore", context.render(GITIGNORE)),
        ])
    }
}
