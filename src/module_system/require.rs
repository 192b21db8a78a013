// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-directory `require` functions.

use super::path::normalize;
use crate::Value;
use crate::engine::{NativeFunction, Raised};
use crate::host::ScriptHost;
use std::sync::Arc;

/// Anchors a `./` specifier at the requiring module's directory.
///
/// Everything else passes through untouched: bare specifiers name native
/// modules or provider-root paths, and parent-relative `../` forms are not
/// rewritten either, so they miss at the provider root rather than escape
/// into a sibling directory.
pub(crate) fn rewrite_relative(specifier: &str, dir: &str) -> String {
    if specifier.starts_with("./") {
        normalize(&format!("{dir}/{specifier}"))
    } else {
        specifier.to_string()
    }
}

impl ScriptHost {
    /// Returns the `require` function for modules living in `dir`.
    ///
    /// One function per directory, built on first use and reused for every
    /// later module in the same directory.
    pub(crate) fn make_require(&mut self, dir: &str) -> Value {
        if let Some(existing) = self.require_fns.get(dir) {
            return existing.clone();
        }
        let base = dir.to_string();
        let function = NativeFunction::new("require", move |host, args| {
            // A non-string argument resolves to undefined, not an error.
            let Some(specifier) = args.first().and_then(Value::as_str) else {
                return Ok(Value::Undefined);
            };
            let rewritten = rewrite_relative(specifier, &base);
            host.load_module(&rewritten).map_err(Raised::Script)
        });
        let value = Value::Function(Arc::new(function));
        self.require_fns.insert(dir.to_string(), value.clone());
        value
    }
}
