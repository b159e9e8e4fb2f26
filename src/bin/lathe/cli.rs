//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Lathe - build orchestration for Rust crates with a C ABI
#[derive(Parser)]
#[command(name = "lathe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the crate and regenerate its C header
    Build(BuildArgs),

    /// Apply the install rules registered by the last build
    Install(InstallArgs),

    /// Remove build artifacts
    Clean(CleanArgs),

    /// Inspect recognized configuration options
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build a shared library (dynamic artifact)
    #[arg(long, conflicts_with = "static_lib")]
    pub shared: bool,

    /// Build a static library (the default)
    #[arg(long = "static", conflicts_with = "shared")]
    pub static_lib: bool,

    /// Build profile (dev, release, release-with-debug)
    #[arg(long)]
    pub profile: Option<String>,

    /// Emit the build plan as JSON (no build)
    #[arg(long)]
    pub plan: bool,

    /// Output format for build messages (human, json)
    #[arg(long, default_value = "human")]
    pub message_format: String,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Install prefix the runtime component is copied under
    #[arg(long)]
    pub prefix: PathBuf,

    /// Print what would be installed without copying
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// List recognized options
    List {
        /// Include hidden tuning options
        #[arg(long)]
        all: bool,
    },
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
