//! `lathe clean` command

use anyhow::{Context, Result};

use crate::cli::CleanArgs;
use lathe::core::manifest::find_project_manifest;
use lathe::util::fs::remove_dir_all_if_exists;

pub fn execute(_args: CleanArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let manifest_path = find_project_manifest(&cwd)?;
    let project_root = manifest_path
        .parent()
        .context("manifest path has no parent directory")?;

    let build_dir = project_root.join("build");
    remove_dir_all_if_exists(&build_dir)?;
    eprintln!("     Removed {}", build_dir.display());

    Ok(())
}
