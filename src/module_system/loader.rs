// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Module loading.
//!
//! The loader owns the per-instance module state (resolver, cache, native
//! registry, file provider). The load algorithm itself runs as methods on
//! [`ScriptHost`] because executing a module body calls back into the engine
//! and, through `require`, back into the loader.

use super::cache::ModuleCache;
use super::path::ModuleId;
use super::registry::{NativeModuleInit, NativeModuleRegistry};
use super::resolver::{ModuleResolver, ModuleSource, Resolution};
use crate::Value;
use crate::engine::{ObjectId, ScriptException, json};
use crate::host::ScriptHost;
use crate::provider::FileProvider;
use tracing::debug;

/// Module wrapper. The compiled function body closes over nothing; every
/// binding a module sees arrives through these five parameters.
const WRAPPER_HEAD: &str = "(function (exports, require, module, __filename, __dirname) {";
const WRAPPER_TAIL: &str = "})";

/// Per-instance module machinery.
pub struct ModuleLoader {
    pub(crate) resolver: ModuleResolver,
    pub(crate) cache: ModuleCache,
    pub(crate) registry: NativeModuleRegistry,
    pub(crate) provider: Box<dyn FileProvider>,
}

impl ModuleLoader {
    /// Creates a loader reading sources from `provider`.
    pub fn new(provider: Box<dyn FileProvider>) -> Self {
        Self {
            resolver: ModuleResolver::new(),
            cache: ModuleCache::new(),
            registry: NativeModuleRegistry::new(),
            provider,
        }
    }
}

impl ScriptHost {
    /// Loads the module named by `specifier` and returns its exports.
    ///
    /// The specifier is expected to be absolute already; `require` rewrites
    /// relative forms against the calling module's directory before getting
    /// here. Failures surface as pending script exceptions so a module's
    /// `try`/`catch` can observe them.
    pub(crate) fn load_module(&mut self, specifier: &str) -> Result<Value, ScriptException> {
        let id = ModuleId::normalized(specifier);
        if let Some(value) = self.loader.cache.get(&id) {
            return Ok(value);
        }

        // Native modules shadow every file-based candidate of the same name.
        if let Some(init) = self.loader.registry.get(id.as_str()) {
            debug!(module = %id, "loading native module");
            return self.load_native(&id, init);
        }

        let resolved =
            self.loader
                .resolver
                .resolve(&id, &self.loader.cache, self.loader.provider.as_ref());
        let source = match resolved {
            Ok(Resolution::Cached(value)) => return Ok(value),
            Ok(Resolution::Source(source)) => source,
            Err(err) => return Err(self.bridge.wrap_host_error(&mut self.engine, err)),
        };

        if source.json {
            return self.load_json(source);
        }
        self.load_script(source)
    }

    fn load_native(
        &mut self,
        id: &ModuleId,
        init: NativeModuleInit,
    ) -> Result<Value, ScriptException> {
        let module = self.new_module_object(id.as_str());
        match init(self, module) {
            Ok(()) => {
                let exports = self
                    .engine
                    .get_property(module, "exports")
                    .unwrap_or(Value::Undefined);
                self.loader.cache.put(id.clone(), exports.clone());
                Ok(exports)
            }
            // A failed initializer caches nothing; the next require retries.
            Err(raised) => Err(self.raised_to_exception(raised)),
        }
    }

    fn load_json(&mut self, source: ModuleSource) -> Result<Value, ScriptException> {
        debug!(module = %source.id, "loading json module");
        let text = String::from_utf8_lossy(&source.bytes);
        let value = match json::parse(&mut self.engine, &text) {
            Ok(value) => value,
            Err(raised) => return Err(self.raised_to_exception(raised)),
        };
        self.loader.cache.put(source.id, value.clone());
        Ok(value)
    }

    fn load_script(&mut self, source: ModuleSource) -> Result<Value, ScriptException> {
        debug!(module = %source.id, "loading script module");
        let text = String::from_utf8_lossy(&source.bytes);
        let wrapped = format!("{WRAPPER_HEAD}{text}{WRAPPER_TAIL}");
        let function = match self.engine.compile(&wrapped, source.id.as_str()) {
            Ok(function) => function,
            Err(raised) => return Err(self.raised_to_exception(raised)),
        };

        let module = self.new_module_object(source.id.as_str());
        let exports = self
            .engine
            .get_property(module, "exports")
            .unwrap_or(Value::Undefined);
        let dir = source.id.dirname().to_string();
        let require = self.make_require(&dir);
        let args = [
            exports,
            require,
            Value::Object(module),
            Value::String(source.id.to_string()),
            Value::String(dir),
        ];
        self.call_function(&function, &args)?;

        // The body may have replaced `module.exports` wholesale; what counts
        // is the property's value after the run.
        let exports = self
            .engine
            .get_property(module, "exports")
            .unwrap_or(Value::Undefined);
        self.loader.cache.put(source.id, exports.clone());
        Ok(exports)
    }

    /// Builds the `module` metadata object handed to a module body or a
    /// native initializer: fresh `exports`, the module id, and the host's
    /// build facts.
    pub(crate) fn new_module_object(&mut self, id: &str) -> ObjectId {
        let exports = self.engine.new_object();
        let module = self.engine.new_object();
        self.engine
            .set_property(module, "id", Value::String(id.to_string()));
        self.engine
            .set_property(module, "exports", Value::Object(exports));
        self.engine.set_property(
            module,
            "environment",
            Value::String(self.config.environment.clone()),
        );
        self.engine.set_property(
            module,
            "platform",
            Value::String(self.config.platform.clone()),
        );
        self.engine
            .set_property(module, "debug", Value::Boolean(self.config.debug));
        self.engine.set_property(
            module,
            "isStoreBuild",
            Value::Boolean(self.config.store_build),
        );
        module
    }
}
