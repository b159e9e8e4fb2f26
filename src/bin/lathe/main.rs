//! Lathe CLI - build orchestration for Rust crates with a C ABI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("lathe=debug")
    } else {
        EnvFilter::new("lathe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, cli.verbose),
        Commands::Install(args) => commands::install::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Config(args) => commands::config::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
