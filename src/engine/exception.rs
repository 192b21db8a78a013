// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pending exceptions and stack introspection.

use crate::Value;
use crate::error::HostError;

/// A pending script exception: the thrown value plus the engine's
/// best-effort single source position for it (used for syntax-error messages
/// and for the fallback trace frame when no stack was captured).
#[derive(Debug, Clone)]
pub struct ScriptException {
    /// The thrown value.
    pub value: Value,
    /// Best-effort location of the failure.
    pub location: Option<SourceLocation>,
}

impl ScriptException {
    /// A pending exception with no location information.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            location: None,
        }
    }
}

/// A single source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Diagnostic script name, when known.
    pub script: Option<String>,
    /// 1-based line number, when known.
    pub line: Option<u32>,
}

/// One entry of a captured script call stack.
///
/// This is the engine's stack-frame introspection contract: five optional
/// fields read directly off the frame, with no getter indirection. Absent
/// fields are resolved to display fallbacks only when a frame is translated
/// for host consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Receiver type name.
    pub type_name: Option<String>,
    /// Method name, when the function was invoked as a method.
    pub method_name: Option<String>,
    /// Function name.
    pub function_name: Option<String>,
    /// Script the frame executes in.
    pub file_name: Option<String>,
    /// 1-based line number.
    pub line_number: Option<u32>,
}

/// A failure raised out of a native callback.
///
/// The `Host` arm is converted into a script exception by the exception
/// bridge at the call boundary, so raw host errors never cross into script.
#[derive(Debug)]
pub enum Raised {
    /// A script exception is pending.
    Script(ScriptException),
    /// Host-side code failed; not yet translated.
    Host(HostError),
}

impl From<ScriptException> for Raised {
    fn from(exc: ScriptException) -> Self {
        Raised::Script(exc)
    }
}

impl From<HostError> for Raised {
    fn from(err: HostError) -> Self {
        Raised::Host(err)
    }
}

/// Result type for operations that can raise into script.
pub type ScriptResult<T> = Result<T, Raised>;
