// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The embedding host.
//!
//! [`ScriptHost`] owns one engine instance together with its module system
//! and exception bridge. Everything is per-instance: tearing the host down
//! releases the heap, the module cache and any pending exception carriers,
//! and two hosts never share state.

use crate::Value;
use crate::bridge::ExceptionBridge;
use crate::engine::{Engine, ObjectId, Raised, ScriptException, ScriptResult, json};
use crate::error::{HostError, Result};
use crate::module_system::{ModuleCache, ModuleLoader};
use crate::provider::FileProvider;
use parking_lot::{Mutex, MutexGuard};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Build facts exposed to modules through the `module` metadata object.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Environment name modules see as `module.environment`.
    pub environment: String,
    /// Platform name modules see as `module.platform`.
    pub platform: String,
    /// Whether this is a debug build.
    pub debug: bool,
    /// Whether this is a store build, exposed as `module.isStoreBuild`.
    pub store_build: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            environment: "estuary".to_string(),
            platform: std::env::consts::OS.to_string(),
            debug: false,
            store_build: false,
        }
    }
}

/// One scripting instance: engine, module system and exception bridge.
pub struct ScriptHost {
    pub(crate) engine: Engine,
    pub(crate) bridge: ExceptionBridge,
    pub(crate) loader: ModuleLoader,
    /// Memoized per-directory `require` functions.
    pub(crate) require_fns: HashMap<String, Value>,
    pub(crate) config: HostConfig,
}

impl ScriptHost {
    /// Creates a host reading module sources from `provider`.
    pub fn new(provider: Box<dyn FileProvider>, config: HostConfig) -> Self {
        debug!(environment = %config.environment, platform = %config.platform, "host created");
        Self {
            engine: Engine::new(),
            bridge: ExceptionBridge::new(),
            loader: ModuleLoader::new(provider),
            require_fns: HashMap::new(),
            config,
        }
    }

    /// Registers a host-implemented module under `name`.
    ///
    /// The initializer runs on first require and receives the module
    /// metadata object; it populates or replaces its `exports` property.
    /// Registering an already-registered name replaces the initializer.
    pub fn register_native_module<F>(&mut self, name: impl Into<String>, init: F)
    where
        F: Fn(&mut ScriptHost, ObjectId) -> ScriptResult<()> + Send + Sync + 'static,
    {
        self.loader.registry.register(name, Arc::new(init));
    }

    /// Loads a module and returns its exports.
    ///
    /// Requiring the same resolved module again returns the cached export
    /// value, the very same `Value`.
    pub fn require(&mut self, specifier: &str) -> Result<Value> {
        match self.load_module(specifier) {
            Ok(value) => Ok(value),
            Err(exc) => Err(self.bridge.unwrap_exception(&self.engine, exc)),
        }
    }

    /// Compiles and runs `source` under the diagnostic name `script:<name>`.
    pub fn run_script(&mut self, source: &str, name: &str) -> Result<Value> {
        let origin = format!("script:{name}");
        let function = match self.engine.compile(source, &origin) {
            Ok(function) => function,
            Err(raised) => return Err(self.surface_raised(raised)),
        };
        self.call(&function, &[])
    }

    /// Calls a script function, translating any failure for the host.
    pub fn call(&mut self, function: &Value, args: &[Value]) -> Result<Value> {
        match self.call_function(function, args) {
            Ok(value) => Ok(value),
            Err(exc) => Err(self.bridge.unwrap_exception(&self.engine, exc)),
        }
    }

    /// Calls a script function, leaving a failure as a pending script
    /// exception. This is the in-script call path; host errors raised by
    /// native callees are bridged into script exceptions here, at the
    /// boundary frame.
    pub fn call_function(
        &mut self,
        function: &Value,
        args: &[Value],
    ) -> std::result::Result<Value, ScriptException> {
        let Value::Function(function) = function else {
            return Err(self
                .engine
                .make_error_exception("TypeError", "value is not a function"));
        };
        let function = Arc::clone(function);
        self.engine.push_frame(function.call_site());
        let result = function.invoke(self, args);
        self.engine.pop_frame();
        match result {
            Ok(value) => Ok(value),
            Err(raised) => Err(self.raised_to_exception(raised)),
        }
    }

    /// Parses JSON text into a script value.
    pub fn parse_json(&mut self, source: &str) -> Result<Value> {
        match json::parse(&mut self.engine, source) {
            Ok(value) => Ok(value),
            Err(raised) => Err(self.surface_raised(raised)),
        }
    }

    /// Serializes a script value to JSON text.
    pub fn stringify_json(&self, value: &Value, pretty: bool) -> String {
        json::stringify(&self.engine, value, pretty)
    }

    /// Builds a raisable script error, for use inside native callbacks:
    /// `return Err(host.throw_error("TypeError", "..."))`.
    pub fn throw_error(&mut self, name: &str, message: &str) -> Raised {
        Raised::Script(self.engine.make_error_exception(name, message))
    }

    /// The underlying engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The underlying engine, mutably. Used by embedders to install their
    /// evaluator and to build values for native modules.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// The module export cache.
    pub fn module_cache(&self) -> &ModuleCache {
        &self.loader.cache
    }

    pub(crate) fn raised_to_exception(&mut self, raised: Raised) -> ScriptException {
        match raised {
            Raised::Script(exc) => exc,
            Raised::Host(err) => self.bridge.wrap_host_error(&mut self.engine, err),
        }
    }

    fn surface_raised(&mut self, raised: Raised) -> HostError {
        match raised {
            Raised::Script(exc) => self.bridge.unwrap_exception(&self.engine, exc),
            Raised::Host(err) => err,
        }
    }
}

impl Drop for ScriptHost {
    fn drop(&mut self) {
        // Pending carriers hold host errors alive; release them with the
        // instance.
        self.bridge.clear();
    }
}

/// A host shared across threads behind a mutex.
///
/// The lock is held for the full duration of a call into script and is not
/// reentrant; native callbacks already run under it and must use the
/// `&mut ScriptHost` they are handed rather than locking again.
#[derive(Clone)]
pub struct SharedHost {
    inner: Arc<Mutex<ScriptHost>>,
}

impl SharedHost {
    /// Wraps a host for shared use.
    pub fn new(host: ScriptHost) -> Self {
        Self {
            inner: Arc::new(Mutex::new(host)),
        }
    }

    /// Acquires the instance lock.
    pub fn lock(&self) -> MutexGuard<'_, ScriptHost> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryFileProvider;

    fn assert_send<T: Send>() {}

    #[test]
    fn host_is_send() {
        assert_send::<ScriptHost>();
        assert_send::<SharedHost>();
    }

    #[test]
    fn config_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.environment, "estuary");
        assert!(!config.debug);
        assert!(!config.store_build);
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let config: HostConfig = serde_json::from_str(r#"{"debug":true}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.environment, "estuary");
    }

    #[test]
    fn calling_a_non_function_is_a_type_error() {
        let mut host = ScriptHost::new(
            Box::new(MemoryFileProvider::new()),
            HostConfig::default(),
        );
        let err = host.call(&Value::Number(1.0), &[]).unwrap_err();
        let failure = err.script_failure().unwrap();
        assert_eq!(failure.message, "[TypeError] value is not a function");
    }
}
