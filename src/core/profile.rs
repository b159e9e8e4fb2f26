//! Build profiles.
//!
//! A profile is selected once per configuration and forwarded verbatim to the
//! crate compiler. It never changes while a build is running.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Build profile for the bound crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildProfile {
    /// Fast iteration, no optimization.
    #[default]
    Dev,
    /// Optimized build.
    Release,
    /// Optimized build that keeps debug info.
    ReleaseWithDebug,
}

/// Error parsing a profile name.
#[derive(Debug, Error)]
#[error("unknown profile `{0}` (expected dev, release, or release-with-debug)")]
pub struct ProfileParseError(String);

impl BuildProfile {
    /// Profile name as accepted on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildProfile::Dev => "dev",
            BuildProfile::Release => "release",
            BuildProfile::ReleaseWithDebug => "release-with-debug",
        }
    }

    /// Arguments that select this profile on a cargo invocation.
    ///
    /// `release-with-debug` is a custom profile the bound crate's manifest is
    /// expected to define (release settings plus `debug = true`).
    pub fn cargo_args(&self) -> Vec<String> {
        match self {
            BuildProfile::Dev => vec![],
            BuildProfile::Release => vec!["--release".to_string()],
            BuildProfile::ReleaseWithDebug => {
                vec!["--profile".to_string(), "release-with-debug".to_string()]
            }
        }
    }

    /// Subdirectory of cargo's target dir where this profile's artifacts land.
    pub fn target_subdir(&self) -> &'static str {
        match self {
            BuildProfile::Dev => "debug",
            BuildProfile::Release => "release",
            BuildProfile::ReleaseWithDebug => "release-with-debug",
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildProfile {
    type Err = ProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" | "debug" => Ok(BuildProfile::Dev),
            "release" => Ok(BuildProfile::Release),
            "release-with-debug" | "relwithdebinfo" => Ok(BuildProfile::ReleaseWithDebug),
            other => Err(ProfileParseError(other.to_string())),
        }
    }
}
