//! Configuration file support.
//!
//! Two locations are merged, project taking precedence:
//! - Global: `~/.lathe/config.toml` - user-wide defaults
//! - Project: `.lathe/config.toml` - project-specific overrides
//!
//! Every recognized option carries a visibility. Internal tuning knobs of the
//! compiler adapter are hidden: they work, but `lathe config list` omits them
//! unless `--all` is passed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::profile::BuildProfile;

/// Lathe configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// `[build]` settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Build the crate as a shared library (selects the artifact kind).
    pub shared: Option<bool>,

    /// Build profile forwarded to the compiler adapter.
    pub profile: Option<BuildProfile>,

    /// Binding generator executable override.
    pub cbindgen: Option<PathBuf>,

    /// Compiler adapter executable override.
    pub cargo: Option<PathBuf>,

    /// Cargo target directory override.
    pub target_dir: Option<PathBuf>,

    /// Extra arguments appended to every compiler adapter invocation.
    pub cargo_args: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.shared.is_some() {
            self.build.shared = other.build.shared;
        }
        if other.build.profile.is_some() {
            self.build.profile = other.build.profile;
        }
        if other.build.cbindgen.is_some() {
            self.build.cbindgen = other.build.cbindgen;
        }
        if other.build.cargo.is_some() {
            self.build.cargo = other.build.cargo;
        }
        if other.build.target_dir.is_some() {
            self.build.target_dir = other.build.target_dir;
        }
        if !other.build.cargo_args.is_empty() {
            self.build.cargo_args = other.build.cargo_args;
        }
    }

    /// Current value of a recognized option, if set, for display.
    pub fn value_of(&self, key: &str) -> Option<String> {
        match key {
            "build.shared" => self.build.shared.map(|v| v.to_string()),
            "build.profile" => self.build.profile.map(|p| p.to_string()),
            "build.cbindgen" => self.build.cbindgen.as_ref().map(|p| p.display().to_string()),
            "build.cargo" => self.build.cargo.as_ref().map(|p| p.display().to_string()),
            "build.target-dir" => self
                .build
                .target_dir
                .as_ref()
                .map(|p| p.display().to_string()),
            "build.cargo-args" => {
                if self.build.cargo_args.is_empty() {
                    None
                } else {
                    Some(self.build.cargo_args.join(" "))
                }
            }
            _ => None,
        }
    }
}

/// Load and merge global + project configuration.
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::load_or_default(global_path);
    config.merge(Config::load_or_default(project_path));
    config
}

/// Global config file path (`~/.lathe/config.toml`).
pub fn global_config_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".lathe").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".lathe/config.toml"))
}

/// Project config file path (`<root>/.lathe/config.toml`).
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(".lathe").join("config.toml")
}

/// Whether an option shows up in the user-facing option listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionVisibility {
    /// Listed by default.
    Public,
    /// Internal tuning knob; listed only on request.
    Hidden,
}

/// Schema entry for a recognized configuration option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// Dotted option key, e.g. `build.shared`.
    pub key: &'static str,
    /// Value shape shown in listings.
    pub value_hint: &'static str,
    /// One-line summary.
    pub summary: &'static str,
    /// Listing visibility.
    pub visibility: OptionVisibility,
}

/// All options the configuration system recognizes.
pub fn recognized_options() -> &'static [OptionSpec] {
    &[
        OptionSpec {
            key: "build.shared",
            value_hint: "true|false",
            summary: "build the crate as a shared library",
            visibility: OptionVisibility::Public,
        },
        OptionSpec {
            key: "build.profile",
            value_hint: "dev|release|release-with-debug",
            summary: "build profile forwarded to cargo",
            visibility: OptionVisibility::Public,
        },
        OptionSpec {
            key: "build.cbindgen",
            value_hint: "path",
            summary: "binding generator executable",
            visibility: OptionVisibility::Public,
        },
        OptionSpec {
            key: "build.cargo",
            value_hint: "path",
            summary: "cargo executable override",
            visibility: OptionVisibility::Hidden,
        },
        OptionSpec {
            key: "build.target-dir",
            value_hint: "path",
            summary: "cargo target directory override",
            visibility: OptionVisibility::Hidden,
        },
        OptionSpec {
            key: "build.cargo-args",
            value_hint: "list",
            summary: "extra arguments for every cargo invocation",
            visibility: OptionVisibility::Hidden,
        },
    ]
}

/// Options listed by default (hidden ones filtered out).
pub fn public_options() -> impl Iterator<Item = &'static OptionSpec> {
    recognized_options()
        .iter()
        .filter(|o| o.visibility == OptionVisibility::Public)
}
