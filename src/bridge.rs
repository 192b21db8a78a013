// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bidirectional exception translation between host and script.
//!
//! Host errors entering script become ordinary error objects with a hidden
//! carrier entry keeping the original [`HostError`] alive; script exceptions
//! leaving for the host become [`ScriptFailure`] payloads with a
//! reconstructed trace. An error object that carries a host-thrown script
//! failure and crosses back unwraps to the identical error, so a re-throw
//! round trip is lossless.

use crate::engine::{CallSite, Engine, ScriptException, SourceLocation};
use crate::error::{HostError, LineInfo, ScriptFailure, TraceFrame};
use crate::{Value, engine::json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

const UNKNOWN: &str = "<unknown>";
const ANONYMOUS: &str = "<anonymous>";

/// Per-instance side table pairing script error objects with the host errors
/// they carry.
///
/// Entries are released eagerly when the object crosses back to the host and
/// unwrapping consumes them; anything still pending is dropped with the
/// instance. There is no per-object finalizer.
pub struct ExceptionBridge {
    carriers: HashMap<crate::engine::ObjectId, HostError>,
}

impl ExceptionBridge {
    /// Creates an empty bridge.
    pub fn new() -> Self {
        Self {
            carriers: HashMap::new(),
        }
    }

    /// Translates a host error into a pending script exception.
    ///
    /// The thrown value is an error object named `HostError` whose message is
    /// the error's display form; the original error rides along in the
    /// carrier table so it survives a round trip intact.
    pub fn wrap_host_error(&mut self, engine: &mut Engine, err: HostError) -> ScriptException {
        let message = err.to_string();
        let id = engine.make_error("HostError", &message);
        trace!(object = ?id, error = %message, "host error enters script");
        self.carriers.insert(id, err);
        ScriptException {
            value: Value::Object(id),
            location: engine.current_location(),
        }
    }

    /// Translates a pending script exception into a host error.
    ///
    /// If the thrown value carries a host-originated script failure, that
    /// exact error is returned and the carrier is released. Any other carried
    /// host error becomes the `cause` of the new failure. The reconstructed
    /// trace is never empty: with no captured stack a single placeholder
    /// frame is built from the exception's own location.
    pub fn unwrap_exception(&mut self, engine: &Engine, exc: ScriptException) -> HostError {
        let carried = match exc.value {
            Value::Object(id) => self.carriers.remove(&id),
            _ => None,
        };
        let carried = match carried {
            Some(original @ HostError::Script(_)) => {
                trace!("script exception unwraps to its original host error");
                return original;
            }
            other => other,
        };

        let message = self.failure_message(engine, &exc);
        let frames = self.failure_frames(engine, &exc);
        let thrown = json::project(engine, &exc.value);
        HostError::Script(Arc::new(ScriptFailure {
            message,
            thrown,
            frames,
            cause: carried.map(Box::new),
        }))
    }

    /// Drops every pending carrier. Called on host teardown.
    pub fn clear(&mut self) {
        self.carriers.clear();
    }

    /// Number of pending carriers.
    pub fn pending(&self) -> usize {
        self.carriers.len()
    }

    fn failure_message(&self, engine: &Engine, exc: &ScriptException) -> String {
        let Some(id) = exc.value.as_object() else {
            return engine.to_display_string(&exc.value);
        };
        let name = engine.get_property(id, "name");
        let message = engine.get_property(id, "message");
        match (
            name.as_ref().and_then(Value::as_str),
            message.as_ref().and_then(Value::as_str),
        ) {
            (Some(name), Some(message)) => {
                // Syntax errors get the failing position up front, in the
                // form `<resource>:<line> - <message>`.
                if name == "SyntaxError"
                    && let Some(SourceLocation {
                        script: Some(script),
                        line: Some(line),
                    }) = &exc.location
                {
                    format!("[{name}] {script}:{line} - {message}")
                } else {
                    format!("[{name}] {message}")
                }
            }
            // A message without a name still beats the default string
            // conversion.
            (None, Some(message)) => message.to_string(),
            _ => engine.to_display_string(&exc.value),
        }
    }

    fn failure_frames(&self, engine: &Engine, exc: &ScriptException) -> Vec<TraceFrame> {
        let captured = exc
            .value
            .as_object()
            .and_then(|id| engine.error_stack(id))
            .filter(|stack| !stack.is_empty());
        match captured {
            Some(stack) => stack.iter().map(translate_frame).collect(),
            // Nothing captured: one placeholder frame from the exception's
            // own location, so the trace is never empty.
            None => {
                let location = exc.location.clone().unwrap_or(SourceLocation {
                    script: None,
                    line: None,
                });
                vec![TraceFrame {
                    type_name: UNKNOWN.to_string(),
                    method_name: UNKNOWN.to_string(),
                    line: line_info(location.script.as_deref(), location.line),
                    file_name: location.script,
                }]
            }
        }
    }
}

impl Default for ExceptionBridge {
    fn default() -> Self {
        Self::new()
    }
}

fn translate_frame(site: &CallSite) -> TraceFrame {
    let method_name = site
        .method_name
        .clone()
        .or_else(|| site.function_name.clone())
        .unwrap_or_else(|| ANONYMOUS.to_string());
    TraceFrame {
        type_name: site
            .type_name
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        method_name,
        line: line_info(site.file_name.as_deref(), site.line_number),
        file_name: site.file_name.clone(),
    }
}

fn line_info(file: Option<&str>, line: Option<u32>) -> LineInfo {
    match (file, line) {
        (Some(_), Some(line)) => LineInfo::Line(line),
        (Some(_), None) => LineInfo::Unknown,
        (None, _) => LineInfo::Native,
    }
}
