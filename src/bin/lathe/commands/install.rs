//! `lathe install` command

use anyhow::{bail, Context, Result};

use crate::cli::InstallArgs;
use lathe::core::manifest::find_project_manifest;
use lathe::pipeline::InstallManifest;

pub fn execute(args: InstallArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let manifest_path = find_project_manifest(&cwd)?;
    let project_root = manifest_path
        .parent()
        .context("manifest path has no parent directory")?;

    let install_manifest_path = project_root.join("build").join("install-manifest.json");
    if !install_manifest_path.is_file() {
        bail!(
            "no install manifest at {}\nhelp: run `lathe build` first",
            install_manifest_path.display()
        );
    }

    let manifest = InstallManifest::load(&install_manifest_path)?;

    if manifest.is_empty() {
        eprintln!("nothing to install: static artifacts are linked from the build tree");
        return Ok(());
    }

    let installed = manifest.apply(&args.prefix, args.dry_run)?;

    for path in &installed {
        if args.dry_run {
            eprintln!("Would install {}", path.display());
        } else {
            eprintln!("   Installed {}", path.display());
        }
    }

    Ok(())
}
