//! Project manifest (`Lathe.toml`).
//!
//! The manifest names the crate to bind and the header to synthesize.
//! Everything about how the crate is built (kind, profile, tool paths) comes
//! from configuration, not from the manifest.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Manifest file name.
pub const MANIFEST_FILE: &str = "Lathe.toml";

/// Parsed project manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    /// The crate to compile and bind.
    #[serde(rename = "crate")]
    pub krate: CrateSection,

    /// Header synthesis settings.
    #[serde(default)]
    pub header: HeaderSection,
}

/// `[crate]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrateSection {
    /// Crate (package) name as it appears in the crate's own Cargo.toml.
    pub name: String,

    /// Path to the crate's Cargo.toml, relative to the project root.
    #[serde(rename = "manifest-path", default = "default_manifest_path")]
    pub manifest_path: PathBuf,
}

/// `[header]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderSection {
    /// Basename of the generated header (without `.h`).
    /// Defaults to the crate name.
    pub name: Option<String>,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("Cargo.toml")
}

impl ProjectManifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let manifest: ProjectManifest = toml::from_str(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

        if manifest.krate.name.is_empty() {
            bail!("manifest {}: crate name must not be empty", path.display());
        }

        Ok(manifest)
    }

    /// Basename of the generated header (without extension).
    pub fn header_name(&self) -> &str {
        self.header.name.as_deref().unwrap_or(&self.krate.name)
    }

    /// Library name as cargo emits it (dashes become underscores).
    pub fn lib_name(&self) -> String {
        self.krate.name.replace('-', "_")
    }
}

/// Find `Lathe.toml` by walking up from `start`.
pub fn find_project_manifest(start: &Path) -> Result<PathBuf> {
    let mut dir = Some(start);

    while let Some(current) = dir {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        dir = current.parent();
    }

    bail!(
        "could not find `{}` in `{}` or any parent directory",
        MANIFEST_FILE,
        start.display()
    );
}
