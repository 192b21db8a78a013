// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Native module registry.

use crate::engine::{ObjectId, ScriptResult};
use crate::host::ScriptHost;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Initializer for a module implemented on the host side.
///
/// Receives the host and the freshly built module-metadata object; it
/// populates (or replaces) the object's `exports` property.
pub type NativeModuleInit =
    Arc<dyn Fn(&mut ScriptHost, ObjectId) -> ScriptResult<()> + Send + Sync>;

/// Map from module name to host-supplied initializer.
///
/// The host may register at any time before the name is first required.
pub struct NativeModuleRegistry {
    modules: HashMap<String, NativeModuleInit>,
}

impl NativeModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Registers `init` under `name`. Re-registration replaces the previous
    /// initializer silently; the last writer wins.
    pub fn register(&mut self, name: impl Into<String>, init: NativeModuleInit) {
        let name = name.into();
        if self.modules.insert(name.clone(), init).is_some() {
            debug!(module = %name, "native module re-registered");
        }
    }

    /// Looks up the initializer for `name`.
    pub fn get(&self, name: &str) -> Option<NativeModuleInit> {
        self.modules.get(name).cloned()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for NativeModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
