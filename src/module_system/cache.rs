// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Module export cache.

use super::path::ModuleId;
use crate::Value;
use dashmap::DashMap;

/// Map from resolved module id to the export value it produced.
///
/// One cache per host instance; entries are never evicted and live until the
/// instance is torn down. A cached value is returned as-is on every later
/// require, including any mutations script code made to it in the meantime.
pub struct ModuleCache {
    cache: DashMap<ModuleId, Value>,
}

impl ModuleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Returns the cached export value for `id`.
    pub fn get(&self, id: &ModuleId) -> Option<Value> {
        self.cache.get(id).map(|entry| entry.clone())
    }

    /// Checks whether `id` has been loaded.
    pub fn has(&self, id: &ModuleId) -> bool {
        self.cache.contains_key(id)
    }

    /// Stores the export value for `id`. Last write wins.
    pub fn put(&self, id: ModuleId, value: Value) {
        self.cache.insert(id, value);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// All cached module ids.
    pub fn keys(&self) -> Vec<ModuleId> {
        self.cache.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of cached modules.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for ModuleCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_round_trip() {
        let cache = ModuleCache::new();
        let id = ModuleId::normalized("lib/a.js");
        assert!(!cache.has(&id));
        cache.put(id.clone(), Value::Number(1.0));
        assert_eq!(cache.get(&id), Some(Value::Number(1.0)));
        assert_eq!(cache.len(), 1);
    }
}
