// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-callable function values.

use super::exception::{CallSite, ScriptResult};
use crate::Value;
use crate::host::ScriptHost;
use std::fmt;

/// Body of a native function. Receives the owning host (so the body can call
/// back into the loader, e.g. from `require`) and the argument list.
pub type NativeFn = dyn Fn(&mut ScriptHost, &[Value]) -> ScriptResult<Value> + Send + Sync;

/// A function value backed by a host closure.
///
/// Compiled module initializers and built-in entry points such as `require`
/// are both represented this way; the optional script origin feeds the call
/// stack the engine maintains for error reporting.
pub struct NativeFunction {
    name: Option<String>,
    script: Option<String>,
    line: Option<u32>,
    body: Box<NativeFn>,
}

impl NativeFunction {
    /// Creates a named function.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut ScriptHost, &[Value]) -> ScriptResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            script: None,
            line: None,
            body: Box::new(body),
        }
    }

    /// Creates an anonymous function (e.g. a compiled module wrapper).
    pub fn anonymous<F>(body: F) -> Self
    where
        F: Fn(&mut ScriptHost, &[Value]) -> ScriptResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: None,
            script: None,
            line: None,
            body: Box::new(body),
        }
    }

    /// Attaches the diagnostic script origin this function was compiled from.
    pub fn with_origin(mut self, script: impl Into<String>, line: u32) -> Self {
        self.script = Some(script.into());
        self.line = Some(line);
        self
    }

    /// The function's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The call-stack frame pushed while this function executes.
    pub(crate) fn call_site(&self) -> CallSite {
        CallSite {
            type_name: None,
            method_name: None,
            function_name: self.name.clone(),
            file_name: self.script.clone(),
            line_number: self.line,
        }
    }

    pub(crate) fn invoke(&self, host: &mut ScriptHost, args: &[Value]) -> ScriptResult<Value> {
        (self.body)(host, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("script", &self.script)
            .finish_non_exhaustive()
    }
}
