// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-side error types.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for host-boundary operations.
pub type Result<T> = std::result::Result<T, HostError>;

/// Errors surfaced to the embedding host.
///
/// `HostError` is cheaply cloneable: the script-exception payload sits behind
/// an `Arc`, which is what makes the identity-preserving re-throw round trip
/// observable (`Arc::ptr_eq` on the payload).
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// Module resolution exhausted every candidate.
    #[error("Cannot find module '{0}'")]
    ModuleNotFound(String),

    /// A script exception crossed into the host.
    #[error("An exception was thrown in script")]
    Script(#[source] Arc<ScriptFailure>),

    /// An opaque embedder-supplied failure raised from a native callback.
    #[error("{0}")]
    Host(Arc<anyhow::Error>),
}

impl HostError {
    /// Wraps an arbitrary embedder failure.
    pub fn host(err: anyhow::Error) -> Self {
        HostError::Host(Arc::new(err))
    }

    /// The script-failure payload, if this error carries one.
    pub fn script_failure(&self) -> Option<&Arc<ScriptFailure>> {
        match self {
            HostError::Script(failure) => Some(failure),
            _ => None,
        }
    }
}

/// The host-native projection of a script exception.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ScriptFailure {
    /// Display message derived from the thrown value.
    pub message: String,
    /// Structured projection of the thrown value.
    pub thrown: serde_json::Value,
    /// Reconstructed script stack, never empty.
    pub frames: Vec<TraceFrame>,
    /// The original host exception, when the thrown value carried one of a
    /// foreign kind.
    #[source]
    pub cause: Option<Box<HostError>>,
}

/// One reconstructed stack entry of a [`ScriptFailure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
    /// Receiver type name, `"<unknown>"` when unavailable.
    pub type_name: String,
    /// Method name, falling back to the function name, falling back to
    /// `"<anonymous>"`.
    pub method_name: String,
    /// Script name; absent for frames with no source attribution.
    pub file_name: Option<String>,
    /// Line position within `file_name`.
    pub line: LineInfo,
}

/// Line-number policy for a [`TraceFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineInfo {
    /// A concrete 1-based line.
    Line(u32),
    /// The script is known but the line is not.
    Unknown,
    /// No script attribution; the frame ran in native code.
    Native,
}

impl fmt::Display for TraceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.method_name)?;
        match (&self.file_name, self.line) {
            (Some(file), LineInfo::Line(line)) => write!(f, " ({}:{})", file, line),
            (Some(file), _) => write!(f, " ({})", file),
            (None, _) => write!(f, " (native)"),
        }
    }
}
