//! Install policy.
//!
//! Only the dynamic variant ships: its runtime artifact is registered for
//! installation into `<prefix>/lib`. The static variant is linked in-place
//! from the build tree and never redistributed by this layer, so its manifest
//! is empty. This is a deliberate policy split, not an "always install".

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::target::CompiledTarget;
use crate::util::fs::{ensure_dir, write_atomic};

/// Install tree component a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallComponent {
    /// Shared libraries needed at run time.
    Runtime,
}

/// A single file to install.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallRule {
    /// Absolute source path in the build tree.
    pub source: PathBuf,

    /// Destination path relative to the install prefix.
    pub dest: PathBuf,

    /// Component the rule belongs to.
    pub component: InstallComponent,
}

/// The set of install rules produced by one configuration run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallManifest {
    pub rules: Vec<InstallRule>,
}

impl InstallManifest {
    /// Apply the install policy to a compiled target.
    ///
    /// Exactly one runtime rule iff the target is dynamic; empty otherwise.
    pub fn for_target(target: &CompiledTarget) -> Self {
        if !target.kind.is_dynamic() {
            return InstallManifest::default();
        }

        let file_name = target
            .artifact
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| target.artifact.clone());

        InstallManifest {
            rules: vec![InstallRule {
                source: target.artifact.clone(),
                dest: PathBuf::from("lib").join(file_name),
                component: InstallComponent::Runtime,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Write the manifest as JSON (atomically, like every build output).
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())
    }

    /// Load a manifest written by a previous build.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read install manifest: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse install manifest: {}", path.display()))
    }

    /// Copy every rule's source under the prefix. Returns installed paths.
    pub fn apply(&self, prefix: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
        let mut installed = Vec::new();

        for rule in &self.rules {
            let dest = prefix.join(&rule.dest);

            if dry_run {
                tracing::info!(
                    "[dry-run] would install {} -> {}",
                    rule.source.display(),
                    dest.display()
                );
                installed.push(dest);
                continue;
            }

            if let Some(parent) = dest.parent() {
                ensure_dir(parent)?;
            }

            std::fs::copy(&rule.source, &dest).with_context(|| {
                format!(
                    "failed to install {} -> {}",
                    rule.source.display(),
                    dest.display()
                )
            })?;

            tracing::debug!("installed {} -> {}", rule.source.display(), dest.display());
            installed.push(dest);
        }

        Ok(installed)
    }
}
