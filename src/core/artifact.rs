//! Artifact kind selection.
//!
//! The kind is a pure function of the global shared/static flag, computed
//! before the compile step starts and never changed mid-build.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of linkable artifact the crate is compiled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Shared library (`cdylib`), installed into the runtime component.
    Dynamic,
    /// Static archive (`staticlib`), linked in-place from the build tree.
    Static,
}

impl ArtifactKind {
    /// Map the "build shared libraries" flag to an artifact kind.
    ///
    /// Total over both flag values; the flag defaults to `false` (static).
    pub fn from_shared(shared: bool) -> Self {
        if shared {
            ArtifactKind::Dynamic
        } else {
            ArtifactKind::Static
        }
    }

    /// The cargo crate type that produces this kind.
    pub fn crate_type(&self) -> &'static str {
        match self {
            ArtifactKind::Dynamic => "cdylib",
            ArtifactKind::Static => "staticlib",
        }
    }

    /// Whether this kind is registered for installation.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ArtifactKind::Dynamic)
    }

    /// Artifact filename for a library on the given OS.
    ///
    /// `lib_name` is the crate's library name (dashes already converted to
    /// underscores, as cargo does).
    pub fn filename(&self, lib_name: &str, os: &str) -> String {
        match (self, os) {
            (ArtifactKind::Dynamic, "windows") => format!("{}.dll", lib_name),
            (ArtifactKind::Dynamic, "macos") => format!("lib{}.dylib", lib_name),
            (ArtifactKind::Dynamic, _) => format!("lib{}.so", lib_name),
            (ArtifactKind::Static, "windows") => format!("{}.lib", lib_name),
            (ArtifactKind::Static, _) => format!("lib{}.a", lib_name),
        }
    }

    /// Artifact filename on the host OS.
    pub fn host_filename(&self, lib_name: &str) -> String {
        self.filename(lib_name, std::env::consts::OS)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Dynamic => f.write_str("dynamic"),
            ArtifactKind::Static => f.write_str("static"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_total() {
        // Both flag values map to exactly one kind.
        assert_eq!(ArtifactKind::from_shared(true), ArtifactKind::Dynamic);
        assert_eq!(ArtifactKind::from_shared(false), ArtifactKind::Static);
    }

    #[test]
    fn test_crate_type() {
        assert_eq!(ArtifactKind::Dynamic.crate_type(), "cdylib");
        assert_eq!(ArtifactKind::Static.crate_type(), "staticlib");
    }

    #[test]
    fn test_filenames_per_os() {
        assert_eq!(
            ArtifactKind::Dynamic.filename("bdd_capi", "linux"),
            "libbdd_capi.so"
        );
        assert_eq!(
            ArtifactKind::Dynamic.filename("bdd_capi", "macos"),
            "libbdd_capi.dylib"
        );
        assert_eq!(
            ArtifactKind::Dynamic.filename("bdd_capi", "windows"),
            "bdd_capi.dll"
        );
        assert_eq!(
            ArtifactKind::Static.filename("bdd_capi", "linux"),
            "libbdd_capi.a"
        );
        assert_eq!(
            ArtifactKind::Static.filename("bdd_capi", "windows"),
            "bdd_capi.lib"
        );
    }

    #[test]
    fn test_install_policy_follows_kind() {
        assert!(ArtifactKind::from_shared(true).is_dynamic());
        assert!(!ArtifactKind::from_shared(false).is_dynamic());
    }
}
