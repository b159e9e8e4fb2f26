//! Crate compiler adapter.
//!
//! Invokes cargo to build the bound crate with the requested profile and
//! crate type, then places the produced artifact in the build tree under
//! `lib/`. Cargo's own target directory lives inside the build tree unless
//! overridden, so a clean removes everything.

use std::path::{Path, PathBuf};

use crate::core::target::CompiledTarget;
use crate::pipeline::context::BuildContext;
use crate::pipeline::errors::BuildError;
use crate::util::config::BuildConfig;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_executable, ProcessBuilder};

/// Adapter around the external cargo binary.
///
/// Resolution order for the executable: config override, `CARGO` environment
/// variable, `cargo` in PATH.
#[derive(Debug)]
pub struct CargoCompiler {
    cargo: PathBuf,
    target_dir: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl CargoCompiler {
    /// Resolve the cargo executable at configuration time.
    pub fn configure(config: &BuildConfig) -> Result<Self, BuildError> {
        let cargo = resolve_cargo(config)?;
        Ok(CargoCompiler {
            cargo,
            target_dir: config.target_dir.clone(),
            extra_args: config.cargo_args.clone(),
        })
    }

    /// The resolved cargo executable.
    pub fn executable(&self) -> &Path {
        &self.cargo
    }

    /// Compile the crate for the context's kind and profile.
    ///
    /// On success the artifact is copied to its final path in the build tree
    /// and returned as a `CompiledTarget`.
    pub fn compile(&self, ctx: &BuildContext) -> Result<CompiledTarget, BuildError> {
        let target_dir = self
            .target_dir
            .clone()
            .unwrap_or_else(|| ctx.build_dir.join("cargo"));

        let cmd = ProcessBuilder::new(&self.cargo)
            .arg("rustc")
            .arg("--manifest-path")
            .arg(ctx.crate_manifest_path())
            .args(ctx.profile.cargo_args())
            .arg("--crate-type")
            .arg(ctx.kind.crate_type())
            .arg("--target-dir")
            .arg(&target_dir)
            .args(&self.extra_args);

        tracing::info!(
            "compiling {} as {} ({})",
            ctx.manifest.krate.name,
            ctx.kind,
            ctx.profile
        );

        let output = cmd
            .exec()
            .map_err(|e| BuildError::compile(e.to_string(), None))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::compile(
                format!("`{}` failed\n{}", cmd.display_command(), stderr),
                output.status.code(),
            ));
        }

        let produced = target_dir
            .join(ctx.profile.target_subdir())
            .join(ctx.artifact_filename());

        if !produced.is_file() {
            return Err(BuildError::compile(
                format!(
                    "cargo reported success but `{}` was not produced",
                    produced.display()
                ),
                None,
            ));
        }

        let artifact = ctx.artifact_path();
        ensure_dir(&ctx.lib_dir()).map_err(|e| BuildError::compile(e.to_string(), None))?;
        std::fs::copy(&produced, &artifact).map_err(|e| {
            BuildError::compile(
                format!(
                    "failed to copy {} to {}: {}",
                    produced.display(),
                    artifact.display(),
                    e
                ),
                None,
            )
        })?;

        tracing::debug!("artifact at {}", artifact.display());

        Ok(CompiledTarget::new(
            ctx.manifest.krate.name.clone(),
            ctx.kind,
            ctx.profile,
            artifact,
        ))
    }
}

fn resolve_cargo(config: &BuildConfig) -> Result<PathBuf, BuildError> {
    if let Some(ref path) = config.cargo {
        if path.is_file() {
            return Ok(path.clone());
        }
        return Err(BuildError::configuration(format!(
            "configured cargo `{}` does not exist",
            path.display()
        )));
    }

    if let Ok(env) = std::env::var("CARGO") {
        let path = PathBuf::from(env);
        if path.is_file() {
            return Ok(path);
        }
    }

    find_executable("cargo").ok_or_else(|| {
        BuildError::configuration(
            "`cargo` not found in PATH\nhelp: install Rust from https://rustup.rs",
        )
    })
}
