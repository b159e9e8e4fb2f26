//! Header synthesizer.
//!
//! Runs cbindgen against the bound crate's source root after each successful
//! compile and returns the header bytes. The generator's stdout is captured
//! and written by the executor through an atomic rename, so the header on
//! disk is never partially written. cbindgen picks up a `cbindgen.toml` in
//! the crate root on its own.

use std::path::{Path, PathBuf};

use crate::pipeline::errors::BuildError;
use crate::util::config::BuildConfig;
use crate::util::process::{find_executable, ProcessBuilder};

/// Adapter around the external cbindgen binary.
///
/// Resolution order for the executable: config override, `CBINDGEN`
/// environment variable, `cbindgen` in PATH. Absence is a configuration-time
/// fatal condition: header generation cannot be scheduled without it.
#[derive(Debug)]
pub struct HeaderSynthesizer {
    cbindgen: PathBuf,
}

impl HeaderSynthesizer {
    /// Resolve the binding generator at configuration time (fail fast).
    pub fn configure(config: &BuildConfig) -> Result<Self, BuildError> {
        let cbindgen = resolve_cbindgen(config)?;
        tracing::debug!("binding generator at {}", cbindgen.display());
        Ok(HeaderSynthesizer { cbindgen })
    }

    /// The resolved generator executable.
    pub fn executable(&self) -> &Path {
        &self.cbindgen
    }

    /// Run the generator against the crate's source root.
    ///
    /// A generator failure after a successful compile is a synthesis error,
    /// deliberately distinct from a compile error.
    pub fn generate(&self, crate_dir: &Path) -> Result<Vec<u8>, BuildError> {
        let cmd = ProcessBuilder::new(&self.cbindgen).arg(crate_dir);

        let output = cmd
            .exec()
            .map_err(|e| BuildError::synthesis(e.to_string(), None))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::synthesis(
                format!("`{}` failed\n{}", cmd.display_command(), stderr),
                output.status.code(),
            ));
        }

        Ok(output.stdout)
    }
}

fn resolve_cbindgen(config: &BuildConfig) -> Result<PathBuf, BuildError> {
    if let Some(ref path) = config.cbindgen {
        if path.is_file() {
            return Ok(path.clone());
        }
        return Err(BuildError::configuration(format!(
            "configured binding generator `{}` does not exist",
            path.display()
        )));
    }

    if let Ok(env) = std::env::var("CBINDGEN") {
        let path = PathBuf::from(env);
        if path.is_file() {
            return Ok(path);
        }
        return Err(BuildError::configuration(format!(
            "CBINDGEN points to `{}` which does not exist",
            path.display()
        )));
    }

    find_executable("cbindgen").ok_or_else(|| {
        BuildError::configuration(
            "binding generator `cbindgen` not found in PATH\n\
             help: install it with `cargo install cbindgen` or set build.cbindgen",
        )
    })
}
