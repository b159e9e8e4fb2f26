//! Pipeline executor.
//!
//! Drives one configuration run through its stages in order, tracking the
//! pipeline state machine. The executor owns no policy of its own: kind
//! selection, install policy, and aliasing all live in their components; this
//! module only sequences them and stops at the first failure.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::target::{AliasTable, CompiledTarget};
use crate::pipeline::context::BuildContext;
use crate::pipeline::errors::BuildError;
use crate::pipeline::events::{BuildEvent, MessageFormat};
use crate::pipeline::install::InstallManifest;
use crate::pipeline::plan::BuildPlan;
use crate::pipeline::toolchain::Toolchain;
use crate::pipeline::PipelineState;
use crate::util::fs::write_atomic;
use crate::util::hash::sha256_bytes;

/// Result of a successful pipeline run.
#[derive(Debug)]
pub struct BuildReport {
    /// The compiled target with its usage requirements wired.
    pub target: CompiledTarget,

    /// Path of the generated header.
    pub header_path: std::path::PathBuf,

    /// SHA256 digest of the header contents.
    pub header_digest: String,

    /// Install rules registered by the install policy.
    pub install: InstallManifest,

    /// Stable alias names for the target.
    pub aliases: AliasTable,
}

/// Drives the pipeline for one build context.
pub struct PipelineExecutor<'a> {
    ctx: &'a BuildContext,
    toolchain: &'a dyn Toolchain,
    state: PipelineState,
    verbose: bool,
    message_format: MessageFormat,
}

impl<'a> PipelineExecutor<'a> {
    /// Create an executor for a context and an injected toolchain.
    pub fn new(ctx: &'a BuildContext, toolchain: &'a dyn Toolchain) -> Self {
        PipelineExecutor {
            ctx,
            toolchain,
            state: PipelineState::Unconfigured,
            verbose: false,
            message_format: MessageFormat::Human,
        }
    }

    /// Enable verbose output (disables the progress bar).
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Select the message format.
    pub fn message_format(mut self, format: MessageFormat) -> Self {
        self.message_format = format;
        self
    }

    /// Current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) -> Result<(), BuildError> {
        if !self.state.can_transition(next) {
            let err = BuildError::Transition {
                from: self.state,
                to: next,
            };
            self.state = PipelineState::Failed;
            return Err(err);
        }
        tracing::debug!("pipeline: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn fail(&mut self, err: BuildError) -> BuildError {
        self.state = PipelineState::Failed;
        self.emit(BuildEvent::finished(false, 0));
        err
    }

    fn emit(&self, event: BuildEvent) {
        if self.message_format == MessageFormat::Json {
            println!("{}", event.to_json());
        }
    }

    /// Run the pipeline to completion.
    ///
    /// On any compile or synthesis failure the state is `Failed`, no later
    /// stage runs, and a pre-existing header is left untouched.
    pub fn run(&mut self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let plan = BuildPlan::new(self.ctx);

        self.emit(BuildEvent::started(
            self.ctx.manifest.krate.name.clone(),
            self.ctx.kind,
            self.ctx.profile,
        ));

        // Kind was derived from the shared flag when the context was built,
        // before any compile could observe it.
        self.advance(PipelineState::KindSelected)?;

        let pb = if self.message_format == MessageFormat::Human && !self.verbose {
            let pb = ProgressBar::new(plan.step_count() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let tick = |msg: &'static str| {
            if let Some(ref pb) = pb {
                pb.set_message(msg);
                pb.inc(1);
            }
        };

        // Compile.
        self.advance(PipelineState::Compiling)?;
        let compiled = self.toolchain.compile(self.ctx);
        let mut target = match compiled {
            Ok(target) => target,
            Err(e) => return Err(self.fail(e)),
        };
        self.advance(PipelineState::Compiled)?;
        self.emit(BuildEvent::compiled(
            target.id.to_string(),
            target.artifact.clone(),
        ));
        tick("compiled");

        // Synthesize the header, strictly after the compile.
        let header_bytes = match self.toolchain.generate_header(self.ctx) {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.fail(e)),
        };

        let header_path = self.ctx.header_path();
        if let Err(e) = write_atomic(&header_path, &header_bytes) {
            return Err(self.fail(BuildError::synthesis(e.to_string(), None)));
        }
        let header_digest = sha256_bytes(&header_bytes);
        self.advance(PipelineState::HeaderSynthesized)?;
        self.emit(BuildEvent::header(header_path.clone(), header_digest.clone()));
        tick("header");

        // Wire the header directory into the target's usage requirements.
        // The output path is fixed by now, so consumers can rely on it.
        target.usage.add_interface_include(self.ctx.include_dir());
        self.advance(PipelineState::Wired)?;
        tick("wired");

        // Install policy: dynamic registers, static deliberately skips.
        let install = InstallManifest::for_target(&target);
        if install.is_empty() {
            self.advance(PipelineState::Skipped)?;
        } else {
            self.advance(PipelineState::InstallRegistered)?;
            tick("install");
        }

        let mut aliases = AliasTable::new();
        aliases
            .define(format!("{}::capi", target.crate_name), target.id.clone())
            .map_err(|e| BuildError::configuration(e.to_string()))?;

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        let elapsed = start.elapsed();
        self.emit(BuildEvent::finished(true, elapsed.as_millis() as u64));
        tracing::info!(
            "finished {} in {:.2}s",
            target.id,
            elapsed.as_secs_f64()
        );

        Ok(BuildReport {
            target,
            header_path,
            header_digest,
            install,
            aliases,
        })
    }
}
