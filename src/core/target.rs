//! Compiled targets, usage requirements, and alias names.
//!
//! A `CompiledTarget` is the output of compiling the bound crate. Downstream
//! consumers never reference the generated header by path; they pick up its
//! directory from the target's usage requirements. Aliases give external
//! build definitions a stable name that survives internal renames.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::artifact::ArtifactKind;
use crate::core::profile::BuildProfile;

/// Canonical identifier of a compiled target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(String);

impl TargetId {
    /// Conventional id for the crate compiled as the given crate type.
    pub fn for_crate(crate_name: &str, kind: ArtifactKind) -> Self {
        TargetId(format!("{}::{}", crate_name, kind.crate_type()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Consumer-visible requirements of a compiled target.
///
/// Include directories are interface-only: the target's own build never needs
/// them, but everything that links against the target does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageRequirements {
    /// Include directories advertised to consumers.
    interface_include_dirs: Vec<PathBuf>,
}

impl UsageRequirements {
    /// Advertise an include directory to consumers of the target.
    pub fn add_interface_include(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !self.interface_include_dirs.contains(&dir) {
            self.interface_include_dirs.push(dir);
        }
    }

    /// Include directories consumers must add when compiling against the target.
    pub fn interface_include_dirs(&self) -> &[PathBuf] {
        &self.interface_include_dirs
    }
}

/// The output of compiling the bound crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledTarget {
    /// Canonical target id.
    pub id: TargetId,

    /// Name of the compiled crate.
    pub crate_name: String,

    /// Artifact kind the crate was compiled as.
    pub kind: ArtifactKind,

    /// Profile the crate was compiled with.
    pub profile: BuildProfile,

    /// Path to the compiled artifact in the build tree.
    pub artifact: PathBuf,

    /// Consumer-visible usage requirements.
    #[serde(default)]
    pub usage: UsageRequirements,
}

impl CompiledTarget {
    /// Create a target record for a freshly compiled artifact.
    pub fn new(
        crate_name: impl Into<String>,
        kind: ArtifactKind,
        profile: BuildProfile,
        artifact: impl Into<PathBuf>,
    ) -> Self {
        let crate_name = crate_name.into();
        CompiledTarget {
            id: TargetId::for_crate(&crate_name, kind),
            crate_name,
            kind,
            profile,
            artifact: artifact.into(),
            usage: UsageRequirements::default(),
        }
    }

    /// Path to the compiled artifact.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact
    }
}

/// Error defining an alias.
#[derive(Debug, Error)]
#[error("alias `{alias}` already refers to `{existing}`, cannot rebind to `{requested}`")]
pub struct AliasConflict {
    pub alias: String,
    pub existing: TargetId,
    pub requested: TargetId,
}

/// Stable external names for compiled targets.
///
/// A naming/lookup relation, not ownership: aliases map an external name to a
/// canonical target id and are resolved at reference time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    aliases: BTreeMap<String, TargetId>,
}

impl AliasTable {
    pub fn new() -> Self {
        AliasTable::default()
    }

    /// Bind an external name to a target id.
    ///
    /// Re-defining an alias to the same id is a no-op; binding it to a
    /// different id is rejected.
    pub fn define(&mut self, alias: impl Into<String>, id: TargetId) -> Result<(), AliasConflict> {
        let alias = alias.into();
        match self.aliases.get(&alias) {
            Some(existing) if *existing != id => Err(AliasConflict {
                alias,
                existing: existing.clone(),
                requested: id,
            }),
            _ => {
                self.aliases.insert(alias, id);
                Ok(())
            }
        }
    }

    /// Resolve an external name to its canonical target id.
    pub fn resolve(&self, alias: &str) -> Option<&TargetId> {
        self.aliases.get(alias)
    }

    /// All defined aliases.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetId)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_convention() {
        let id = TargetId::for_crate("bdd-capi", ArtifactKind::Dynamic);
        assert_eq!(id.as_str(), "bdd-capi::cdylib");

        let id = TargetId::for_crate("bdd-capi", ArtifactKind::Static);
        assert_eq!(id.as_str(), "bdd-capi::staticlib");
    }

    #[test]
    fn test_usage_requirements_dedup() {
        let mut usage = UsageRequirements::default();
        usage.add_interface_include("/build/include");
        usage.add_interface_include("/build/include");

        assert_eq!(usage.interface_include_dirs().len(), 1);
        assert_eq!(
            usage.interface_include_dirs()[0],
            PathBuf::from("/build/include")
        );
    }

    #[test]
    fn test_alias_resolves_to_canonical_id() {
        let id = TargetId::for_crate("bdd-capi", ArtifactKind::Static);

        let mut aliases = AliasTable::new();
        aliases.define("bdd-capi::capi", id.clone()).unwrap();

        assert_eq!(aliases.resolve("bdd-capi::capi"), Some(&id));
        assert_eq!(aliases.resolve("unknown"), None);
    }

    #[test]
    fn test_alias_redefine_same_id_is_noop() {
        let id = TargetId::for_crate("bdd-capi", ArtifactKind::Static);

        let mut aliases = AliasTable::new();
        aliases.define("capi", id.clone()).unwrap();
        aliases.define("capi", id.clone()).unwrap();

        assert_eq!(aliases.resolve("capi"), Some(&id));
    }

    #[test]
    fn test_alias_conflict_rejected() {
        let static_id = TargetId::for_crate("bdd-capi", ArtifactKind::Static);
        let dynamic_id = TargetId::for_crate("bdd-capi", ArtifactKind::Dynamic);

        let mut aliases = AliasTable::new();
        aliases.define("capi", static_id.clone()).unwrap();

        let err = aliases.define("capi", dynamic_id).unwrap_err();
        assert_eq!(err.alias, "capi");
        assert_eq!(err.existing, static_id);
    }
}
