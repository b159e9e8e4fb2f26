//! `lathe build` command

use anyhow::{Context, Result};

use crate::cli::BuildArgs;
use lathe::core::manifest::{find_project_manifest, ProjectManifest};
use lathe::core::profile::BuildProfile;
use lathe::pipeline::{BuildContext, BuildPlan, MessageFormat, PipelineExecutor, ProcessToolchain};
use lathe::util::config::{global_config_path, load_config, project_config_path};

pub fn execute(args: BuildArgs, verbose: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let manifest_path = find_project_manifest(&cwd)?;
    let project_root = manifest_path
        .parent()
        .context("manifest path has no parent directory")?
        .to_path_buf();

    let manifest = ProjectManifest::load(&manifest_path)?;

    // Load configuration (global + project, project wins).
    let config = load_config(&global_config_path(), &project_config_path(&project_root));

    // CLI overrides config, config overrides the defaults.
    let shared = if args.shared {
        true
    } else if args.static_lib {
        false
    } else {
        config.build.shared.unwrap_or(false)
    };

    let profile = match args.profile {
        Some(ref s) => s.parse::<BuildProfile>()?,
        None => config.build.profile.unwrap_or_default(),
    };

    let message_format = args.message_format.parse::<MessageFormat>()?;

    let ctx = BuildContext::new(project_root, manifest, shared, profile);

    if args.plan {
        let plan = BuildPlan::new(&ctx);
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    // Resolve external tools before anything else: a missing binding
    // generator must fail here, not mid-build.
    let toolchain = ProcessToolchain::configure(&config.build)?;

    let report = PipelineExecutor::new(&ctx, &toolchain)
        .verbose(verbose)
        .message_format(message_format)
        .run()?;

    report.install.save(&ctx.install_manifest_path())?;

    if message_format == MessageFormat::Human {
        eprintln!(
            "    Finished `{}` -> {}",
            report.target.id,
            report.target.artifact.display()
        );
        eprintln!(
            "      Header {} (sha256 {})",
            report.header_path.display(),
            &report.header_digest[..16.min(report.header_digest.len())]
        );
        if report.install.is_empty() {
            eprintln!("     Install skipped (static artifact, linked in-place)");
        } else {
            eprintln!(
                "     Install {} rule(s) registered; run `lathe install --prefix <dir>`",
                report.install.len()
            );
        }
    }

    Ok(())
}
