//! Build context - resolved configuration for one pipeline run.

use std::path::{Path, PathBuf};

use crate::core::artifact::ArtifactKind;
use crate::core::manifest::ProjectManifest;
use crate::core::profile::BuildProfile;

/// Everything a pipeline run needs to know, resolved up front.
///
/// The artifact kind is computed from the shared flag here, before the compile
/// step starts, and is immutable for the duration of the build.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Project root (directory containing `Lathe.toml`).
    pub project_root: PathBuf,

    /// Parsed project manifest.
    pub manifest: ProjectManifest,

    /// Artifact kind derived from the shared/static flag.
    pub kind: ArtifactKind,

    /// Active build profile.
    pub profile: BuildProfile,

    /// Build output tree. Layout below it is owned by this pipeline.
    pub build_dir: PathBuf,
}

impl BuildContext {
    /// Create a build context, deriving the artifact kind from the flag.
    pub fn new(
        project_root: impl Into<PathBuf>,
        manifest: ProjectManifest,
        shared: bool,
        profile: BuildProfile,
    ) -> Self {
        let project_root = project_root.into();
        let build_dir = project_root.join("build");
        BuildContext {
            project_root,
            manifest,
            kind: ArtifactKind::from_shared(shared),
            profile,
            build_dir,
        }
    }

    /// Override the build output directory.
    pub fn with_build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    /// Directory compiled artifacts are placed in.
    pub fn lib_dir(&self) -> PathBuf {
        self.build_dir.join("lib")
    }

    /// Directory the generated header is placed in. This is the directory
    /// advertised to consumers via usage requirements.
    pub fn include_dir(&self) -> PathBuf {
        self.build_dir.join("include")
    }

    /// Fixed, predictable path of the generated header.
    pub fn header_path(&self) -> PathBuf {
        self.include_dir()
            .join(format!("{}.h", self.manifest.header_name()))
    }

    /// Path the install manifest is written to after a build.
    pub fn install_manifest_path(&self) -> PathBuf {
        self.build_dir.join("install-manifest.json")
    }

    /// Absolute path of the bound crate's Cargo.toml.
    pub fn crate_manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.manifest.krate.manifest_path)
    }

    /// Source root of the bound crate (where the binding generator runs).
    pub fn crate_dir(&self) -> PathBuf {
        self.crate_manifest_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.project_root.clone())
    }

    /// Artifact filename for the selected kind on the host OS.
    pub fn artifact_filename(&self) -> String {
        self.kind.host_filename(&self.manifest.lib_name())
    }

    /// Final path of the compiled artifact in the build tree.
    pub fn artifact_path(&self) -> PathBuf {
        self.lib_dir().join(self.artifact_filename())
    }
}
