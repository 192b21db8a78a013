// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared test support.
//!
//! `ScriptedCompiler` stands in for a real evaluator: each test registers a
//! native closure under the diagnostic origin the loader will compile, so
//! the full load path (resolution, wrapping, caching, require, bridging)
//! runs without a parser. Unregistered origins fail to compile, which doubles
//! as the syntax-error path.

#![allow(dead_code)]

use estuary::engine::CompileError;
use estuary::{
    HostConfig, MemoryFileProvider, NativeFunction, ObjectId, ScriptCompiler, ScriptHost,
    ScriptResult, Value,
};
use std::collections::HashMap;
use std::sync::Arc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Evaluator stub mapping diagnostic origins to module bodies.
pub struct ScriptedCompiler {
    scripts: HashMap<String, Arc<NativeFunction>>,
}

impl ScriptedCompiler {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
        }
    }

    /// Registers the body compiled for `origin`. Module bodies receive the
    /// wrapper's five arguments: exports, require, module, filename, dirname.
    pub fn define<F>(mut self, origin: &str, body: F) -> Self
    where
        F: Fn(&mut ScriptHost, &[Value]) -> ScriptResult<Value> + Send + Sync + 'static,
    {
        self.scripts.insert(
            origin.to_string(),
            Arc::new(NativeFunction::anonymous(body).with_origin(origin, 1)),
        );
        self
    }
}

impl ScriptCompiler for ScriptedCompiler {
    fn compile(
        &mut self,
        _source: &str,
        origin: &str,
    ) -> Result<Arc<NativeFunction>, CompileError> {
        self.scripts.get(origin).cloned().ok_or_else(|| CompileError {
            message: "Unexpected token".to_string(),
            line: Some(1),
        })
    }
}

/// A host with the scripted compiler installed.
pub fn host_with(provider: MemoryFileProvider, compiler: ScriptedCompiler) -> ScriptHost {
    init_tracing();
    let mut host = ScriptHost::new(Box::new(provider), HostConfig::default());
    host.engine_mut().set_compiler(Box::new(compiler));
    host
}

pub fn exports_of(args: &[Value]) -> ObjectId {
    args[0].as_object().unwrap()
}

pub fn require_of(args: &[Value]) -> Value {
    args[1].clone()
}

pub fn module_of(args: &[Value]) -> ObjectId {
    args[2].as_object().unwrap()
}
