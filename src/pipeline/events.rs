//! Build event types for JSON output.
//!
//! Emitted one JSON object per line when building with
//! `--message-format=json`. New fields may be added; existing fields should
//! not be removed or renamed.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::core::artifact::ArtifactKind;
use crate::core::profile::BuildProfile;

/// Output format for build messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    /// Progress bar and human-readable status lines.
    #[default]
    Human,
    /// One JSON event per line on stdout.
    Json,
}

/// Error parsing a message format name.
#[derive(Debug, Error)]
#[error("unknown message format `{0}` (expected human or json)")]
pub struct MessageFormatParseError(String);

impl FromStr for MessageFormat {
    type Err = MessageFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(MessageFormat::Human),
            "json" => Ok(MessageFormat::Json),
            other => Err(MessageFormatParseError(other.to_string())),
        }
    }
}

/// A build event emitted during the pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    /// Pipeline started; kind and profile are already resolved.
    #[serde(rename = "build-started")]
    BuildStarted {
        crate_name: String,
        kind: ArtifactKind,
        profile: BuildProfile,
    },

    /// The crate compiled successfully.
    #[serde(rename = "crate-compiled")]
    CrateCompiled { target: String, artifact: PathBuf },

    /// The header was regenerated.
    #[serde(rename = "header-generated")]
    HeaderGenerated { path: PathBuf, digest: String },

    /// Pipeline finished (success or failure).
    #[serde(rename = "build-finished")]
    BuildFinished { success: bool, duration_ms: u64 },
}

impl BuildEvent {
    pub fn started(crate_name: impl Into<String>, kind: ArtifactKind, profile: BuildProfile) -> Self {
        BuildEvent::BuildStarted {
            crate_name: crate_name.into(),
            kind,
            profile,
        }
    }

    pub fn compiled(target: impl Into<String>, artifact: impl Into<PathBuf>) -> Self {
        BuildEvent::CrateCompiled {
            target: target.into(),
            artifact: artifact.into(),
        }
    }

    pub fn header(path: impl Into<PathBuf>, digest: impl Into<String>) -> Self {
        BuildEvent::HeaderGenerated {
            path: path.into(),
            digest: digest.into(),
        }
    }

    pub fn finished(success: bool, duration_ms: u64) -> Self {
        BuildEvent::BuildFinished {
            success,
            duration_ms,
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
