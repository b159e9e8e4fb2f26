//! Toolchain abstraction.
//!
//! The external toolchain (cargo for compilation, cbindgen for header
//! generation) is injected behind a trait so the pipeline's ordering and
//! failure logic can be tested without spawning real processes.

use crate::core::target::CompiledTarget;
use crate::pipeline::cargo::CargoCompiler;
use crate::pipeline::cbindgen::HeaderSynthesizer;
use crate::pipeline::context::BuildContext;
use crate::pipeline::errors::BuildError;
use crate::util::config::BuildConfig;

/// Trait for toolchain implementations.
pub trait Toolchain: Send + Sync {
    /// Compile the bound crate for the context's kind and profile.
    ///
    /// A failure is fatal to the whole build; no partial artifact is produced
    /// and no fallback kind is substituted.
    fn compile(&self, ctx: &BuildContext) -> Result<CompiledTarget, BuildError>;

    /// Generate C header bytes from the crate's exported ABI.
    ///
    /// Must only be called after `compile` has returned successfully for the
    /// same context. Byte-identical output is required for unchanged ABI and
    /// generator version.
    fn generate_header(&self, ctx: &BuildContext) -> Result<Vec<u8>, BuildError>;
}

/// The real toolchain, backed by external cargo and cbindgen processes.
#[derive(Debug)]
pub struct ProcessToolchain {
    compiler: CargoCompiler,
    synthesizer: HeaderSynthesizer,
}

impl ProcessToolchain {
    /// Resolve both external tools.
    ///
    /// The binding generator is resolved first: its absence must fail the
    /// configuration step before any compile could be attempted.
    pub fn configure(config: &BuildConfig) -> Result<Self, BuildError> {
        let synthesizer = HeaderSynthesizer::configure(config)?;
        let compiler = CargoCompiler::configure(config)?;
        Ok(ProcessToolchain {
            compiler,
            synthesizer,
        })
    }

    /// The resolved compiler adapter.
    pub fn compiler(&self) -> &CargoCompiler {
        &self.compiler
    }

    /// The resolved header synthesizer.
    pub fn synthesizer(&self) -> &HeaderSynthesizer {
        &self.synthesizer
    }
}

impl Toolchain for ProcessToolchain {
    fn compile(&self, ctx: &BuildContext) -> Result<CompiledTarget, BuildError> {
        self.compiler.compile(ctx)
    }

    fn generate_header(&self, ctx: &BuildContext) -> Result<Vec<u8>, BuildError> {
        self.synthesizer.generate(&ctx.crate_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_configure_fails_fast_on_missing_generator() {
        let config = BuildConfig {
            cbindgen: Some(PathBuf::from("/nonexistent/cbindgen")),
            ..Default::default()
        };

        let err = ProcessToolchain::configure(&config).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("cbindgen"));
    }
}
