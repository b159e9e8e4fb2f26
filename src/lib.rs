//! Lathe - build orchestration for Rust crates with a C ABI.
//!
//! This crate provides the core library functionality for Lathe: compiling a
//! library crate into a linkable artifact (static or dynamic), synthesizing a
//! matching C header with cbindgen, and wiring include paths and install
//! rules so C/C++ consumers never hand-maintain bindings.

pub mod core;
pub mod pipeline;
pub mod util;

pub use crate::core::{
    artifact::ArtifactKind, manifest::ProjectManifest, profile::BuildProfile,
    target::AliasTable, target::CompiledTarget, target::TargetId,
};

pub use crate::pipeline::{
    BuildContext, BuildError, BuildPlan, BuildReport, InstallManifest, PipelineExecutor,
    PipelineState, ProcessToolchain, Toolchain,
};
