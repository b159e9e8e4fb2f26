//! Pipeline integration tests.
//!
//! The external toolchain is replaced with a mock so ordering and failure
//! semantics can be verified without spawning cargo or cbindgen.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use lathe::core::manifest::ProjectManifest;
use lathe::core::target::CompiledTarget;
use lathe::pipeline::{
    BuildContext, BuildError, PipelineExecutor, PipelineState, ProcessToolchain, Toolchain,
};
use lathe::util::config::BuildConfig;
use lathe::BuildProfile;

/// Mock toolchain recording the order of calls.
#[derive(Default)]
struct MockToolchain {
    calls: Mutex<Vec<&'static str>>,
    fail_compile: bool,
    fail_synthesis: bool,
    header: Vec<u8>,
    compile_delay: Option<Duration>,
}

impl MockToolchain {
    fn with_header(header: &[u8]) -> Self {
        MockToolchain {
            header: header.to_vec(),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl Toolchain for MockToolchain {
    fn compile(&self, ctx: &BuildContext) -> Result<CompiledTarget, BuildError> {
        self.calls.lock().unwrap().push("compile");

        if self.fail_compile {
            return Err(BuildError::compile("mock compile failure", Some(101)));
        }

        if let Some(delay) = self.compile_delay {
            std::thread::sleep(delay);
        }

        let artifact = ctx.artifact_path();
        std::fs::create_dir_all(artifact.parent().unwrap()).unwrap();
        std::fs::write(&artifact, b"mock artifact").unwrap();

        Ok(CompiledTarget::new(
            ctx.manifest.krate.name.clone(),
            ctx.kind,
            ctx.profile,
            artifact,
        ))
    }

    fn generate_header(&self, _ctx: &BuildContext) -> Result<Vec<u8>, BuildError> {
        self.calls.lock().unwrap().push("generate_header");

        if self.fail_synthesis {
            return Err(BuildError::synthesis("mock ABI not representable", Some(1)));
        }

        Ok(self.header.clone())
    }
}

fn project_context(root: &Path, shared: bool, profile: BuildProfile) -> BuildContext {
    std::fs::write(
        root.join("Lathe.toml"),
        "[crate]\nname = \"bdd-capi\"\n\n[header]\nname = \"bdd\"\n",
    )
    .unwrap();

    let manifest = ProjectManifest::load(&root.join("Lathe.toml")).unwrap();
    BuildContext::new(root, manifest, shared, profile)
}

#[test]
fn test_header_synthesis_strictly_after_compile() {
    let tmp = TempDir::new().unwrap();
    let ctx = project_context(tmp.path(), false, BuildProfile::Dev);

    let toolchain = MockToolchain {
        header: b"// bdd.h\n".to_vec(),
        compile_delay: Some(Duration::from_millis(20)),
        ..Default::default()
    };

    let mut executor = PipelineExecutor::new(&ctx, &toolchain);
    executor.run().unwrap();

    assert_eq!(toolchain.calls(), vec!["compile", "generate_header"]);

    // Even with an artificially slow compile, the header is written after
    // the artifact.
    let artifact_mtime = std::fs::metadata(ctx.artifact_path())
        .unwrap()
        .modified()
        .unwrap();
    let header_mtime = std::fs::metadata(ctx.header_path())
        .unwrap()
        .modified()
        .unwrap();
    assert!(header_mtime >= artifact_mtime);
}

#[test]
fn test_compile_failure_leaves_stale_header_untouched() {
    let tmp = TempDir::new().unwrap();
    let ctx = project_context(tmp.path(), true, BuildProfile::Release);

    // A header from a prior successful build.
    std::fs::create_dir_all(ctx.include_dir()).unwrap();
    std::fs::write(ctx.header_path(), b"// stale but valid\n").unwrap();

    let toolchain = MockToolchain {
        fail_compile: true,
        ..Default::default()
    };

    let mut executor = PipelineExecutor::new(&ctx, &toolchain);
    let err = executor.run().unwrap_err();

    assert!(err.is_compile());
    assert_eq!(executor.state(), PipelineState::Failed);

    // Synthesis never ran and the stale header survived.
    assert_eq!(toolchain.calls(), vec!["compile"]);
    assert_eq!(
        std::fs::read(ctx.header_path()).unwrap(),
        b"// stale but valid\n"
    );
}

#[test]
fn test_synthesis_failure_is_distinct_from_compile_failure() {
    let tmp = TempDir::new().unwrap();
    let ctx = project_context(tmp.path(), false, BuildProfile::Dev);

    std::fs::create_dir_all(ctx.include_dir()).unwrap();
    std::fs::write(ctx.header_path(), b"// stale but valid\n").unwrap();

    let toolchain = MockToolchain {
        fail_synthesis: true,
        ..Default::default()
    };

    let mut executor = PipelineExecutor::new(&ctx, &toolchain);
    let err = executor.run().unwrap_err();

    assert!(err.is_synthesis());
    assert!(!err.is_compile());
    assert_eq!(executor.state(), PipelineState::Failed);

    // The failed generator never replaced the previous header.
    assert_eq!(
        std::fs::read(ctx.header_path()).unwrap(),
        b"// stale but valid\n"
    );
}

#[test]
fn test_header_output_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let ctx = project_context(tmp.path(), false, BuildProfile::Release);

    let header = b"#pragma once\nvoid bdd_unref(void *f);\n";
    let toolchain = MockToolchain::with_header(header);

    let first = PipelineExecutor::new(&ctx, &toolchain).run().unwrap();
    let first_bytes = std::fs::read(ctx.header_path()).unwrap();

    let second = PipelineExecutor::new(&ctx, &toolchain).run().unwrap();
    let second_bytes = std::fs::read(ctx.header_path()).unwrap();

    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first.header_digest, second.header_digest);
}

#[test]
fn test_dynamic_release_scenario() {
    let tmp = TempDir::new().unwrap();
    let ctx = project_context(tmp.path(), true, BuildProfile::Release);

    let toolchain = MockToolchain::with_header(b"// bdd.h\n");
    let mut executor = PipelineExecutor::new(&ctx, &toolchain);
    let report = executor.run().unwrap();

    // Compiled dynamic artifact exists.
    assert!(ctx.artifact_path().is_file());
    assert!(report.target.kind.is_dynamic());

    // Header exists at the fixed path under include/.
    assert_eq!(ctx.header_path(), ctx.include_dir().join("bdd.h"));
    assert!(ctx.header_path().is_file());

    // Install rule present, pipeline terminal state records it.
    assert_eq!(report.install.len(), 1);
    assert_eq!(executor.state(), PipelineState::InstallRegistered);

    // The header directory is advertised via usage requirements only.
    assert_eq!(
        report.target.usage.interface_include_dirs(),
        &[ctx.include_dir()]
    );
}

#[test]
fn test_static_dev_scenario() {
    let tmp = TempDir::new().unwrap();
    let ctx = project_context(tmp.path(), false, BuildProfile::Dev);

    let toolchain = MockToolchain::with_header(b"// bdd.h\n");
    let mut executor = PipelineExecutor::new(&ctx, &toolchain);
    let report = executor.run().unwrap();

    assert!(ctx.artifact_path().is_file());
    assert!(!report.target.kind.is_dynamic());
    assert!(ctx.header_path().is_file());

    // No install rule for the static variant.
    assert!(report.install.is_empty());
    assert_eq!(executor.state(), PipelineState::Skipped);
}

#[test]
fn test_absent_generator_fails_configuration_before_compile() {
    let config = BuildConfig {
        cbindgen: Some("/nonexistent/cbindgen".into()),
        ..Default::default()
    };

    let err = ProcessToolchain::configure(&config).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("cbindgen"));
}

#[test]
fn test_alias_is_stable_across_internal_renames() {
    let tmp = TempDir::new().unwrap();
    let ctx = project_context(tmp.path(), true, BuildProfile::Release);

    let toolchain = MockToolchain::with_header(b"// bdd.h\n");
    let report = PipelineExecutor::new(&ctx, &toolchain).run().unwrap();

    // External consumers depend on the alias, not the canonical id.
    let resolved = report.aliases.resolve("bdd-capi::capi").unwrap();
    assert_eq!(resolved, &report.target.id);
}
