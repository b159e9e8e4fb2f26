//! Pipeline error taxonomy.
//!
//! Three failure classes, none of which is ever downgraded to a warning:
//! configuration-time errors surface before any compile is attempted, compile
//! errors and synthesis errors are distinct so users can tell "my code is
//! wrong" apart from "my exported ABI is not representable".

use thiserror::Error;

use crate::pipeline::PipelineState;

/// Error during a pipeline configuration run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required external tool or option is missing or invalid.
    /// Raised at configure time, before any compile starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The crate failed to build for the requested kind/profile.
    /// No fallback kind is substituted and the build is not retried.
    #[error("compile failed: {message}")]
    Compile {
        message: String,
        /// Toolchain exit code, if it ran at all.
        code: Option<i32>,
    },

    /// Header generation failed after a successful compile.
    #[error("header synthesis failed: {message}")]
    Synthesis {
        message: String,
        /// Generator exit code, if it ran at all.
        code: Option<i32>,
    },

    /// A stage was driven out of order. Programming error, not user error.
    #[error("invalid pipeline transition: {from} -> {to}")]
    Transition {
        from: PipelineState,
        to: PipelineState,
    },
}

impl BuildError {
    pub fn configuration(message: impl Into<String>) -> Self {
        BuildError::Configuration(message.into())
    }

    pub fn compile(message: impl Into<String>, code: Option<i32>) -> Self {
        BuildError::Compile {
            message: message.into(),
            code,
        }
    }

    pub fn synthesis(message: impl Into<String>, code: Option<i32>) -> Self {
        BuildError::Synthesis {
            message: message.into(),
            code,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, BuildError::Configuration(_))
    }

    pub fn is_compile(&self) -> bool {
        matches!(self, BuildError::Compile { .. })
    }

    pub fn is_synthesis(&self) -> bool {
        matches!(self, BuildError::Synthesis { .. })
    }
}
