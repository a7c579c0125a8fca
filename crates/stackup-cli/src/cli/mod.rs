//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value enums live here and nowhere else.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "stackup",
    bin_name = "stackup",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold a project from a curated stack of modules",
    long_about = "Stackup fetches the modules of a stack, asks each module's \
                  questions once, collects the credentials they need and \
                  writes the resulting project configuration.",
    after_help = "EXAMPLES:\n\
        \x20 stackup init\n\
        \x20 stackup init --dir ~/code\n\
        \x20 stackup stacks list\n\
        \x20 stackup stacks show \"EKS + Go + React\"\n\
        \x20 stackup completions bash > /usr/share/bash-completion/completions/stackup",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project interactively.
    #[command(
        about = "Create a new project from a stack",
        after_help = "EXAMPLES:\n\
            \x20 stackup init\n\
            \x20 stackup init --dir ./projects"
    )]
    Init(InitArgs),

    /// Inspect the configured stacks.
    #[command(subcommand, about = "List and inspect stacks")]
    Stacks(StacksCommands),

    /// Read configuration values.
    #[command(subcommand, about = "Show configuration")]
    Config(ConfigCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stackup completions bash > ~/.local/share/bash-completion/completions/stackup\n\
            \x20 stackup completions zsh  > ~/.zfunc/_stackup\n\
            \x20 stackup completions fish > ~/.config/fish/completions/stackup.fish"
    )]
    Completions(CompletionsArgs),
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Directory the project folder is created in.
    #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

// ── stacks ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Subcommand)]
pub enum StacksCommands {
    /// List stacks and their module sources.
    #[command(visible_alias = "ls")]
    List,

    /// Fetch a stack's modules and describe them.
    #[command(after_help = "EXAMPLES:\n\
        \x20 stackup stacks show \"EKS + Go + React\"\n\
        \x20 stackup --output-format json stacks show Custom")]
    Show {
        /// Stack name, as printed by `stackup stacks list`.
        name: String,
    },
}

// ── config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommands {
    /// Print one value, e.g. `modules.max_concurrent_fetches`.
    Get { key: String },

    /// Print the effective configuration.
    List,

    /// Print the default configuration file path.
    Path,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}
