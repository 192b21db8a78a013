// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Module specifier resolution.

use super::cache::ModuleCache;
use super::path::ModuleId;
use crate::Value;
use crate::error::HostError;
use crate::provider::FileProvider;
use serde::Deserialize;
use tracing::warn;

/// Outcome of resolving a specifier.
#[derive(Debug)]
pub enum Resolution {
    /// A candidate id was already loaded; resolution and loading are skipped.
    Cached(Value),
    /// Source bytes to compile or parse.
    Source(ModuleSource),
}

/// Raw source located for a module.
#[derive(Debug)]
pub struct ModuleSource {
    /// The final resolved id; the module is cached under this id.
    pub id: ModuleId,
    /// Raw bytes from the file provider.
    pub bytes: Vec<u8>,
    /// Whether the module is JSON-typed (the parsed value is the export; no
    /// wrapper function, no `require`/`exports` in scope).
    pub json: bool,
}

/// Minimal package.json structure for resolution.
#[derive(Debug, Deserialize)]
struct PackageJson {
    main: Option<String>,
}

/// Resolves specifiers to concrete module sources.
///
/// Candidate order, short-circuiting at the first that exists:
/// the specifier verbatim, `<specifier>/package.json` (recursing on its
/// `main` field), `<specifier>/index.js`, `<specifier>.js`,
/// `<specifier>.json`. The cache is consulted for each candidate id before
/// the provider is probed.
#[derive(Debug, Default)]
pub struct ModuleResolver;

impl ModuleResolver {
    /// Creates a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Resolves `specifier` (already rewritten and normalized by the caller).
    ///
    /// Failure carries the originally requested specifier.
    pub fn resolve(
        &self,
        specifier: &ModuleId,
        cache: &ModuleCache,
        provider: &dyn FileProvider,
    ) -> Result<Resolution, HostError> {
        // 1. The specifier verbatim, as a concrete file.
        let verbatim_json = specifier.as_str().ends_with(".json");
        if let Some(found) = self.probe(specifier.clone(), verbatim_json, cache, provider) {
            return Ok(found);
        }

        // 2. A directory with a package descriptor.
        let descriptor_path = format!("{specifier}/package.json");
        if let Some(bytes) = provider.load_source(&descriptor_path) {
            match serde_json::from_slice::<PackageJson>(&bytes) {
                Ok(PackageJson { main: Some(main) }) => {
                    let target = ModuleId::normalized(&format!("{specifier}/{main}"));
                    // The descriptor exists, so the candidate sequence stops
                    // here; a dangling `main` fails resolution outright.
                    return self.resolve(&target, cache, provider).map_err(|_| {
                        warn!(
                            descriptor = %descriptor_path,
                            main = %main,
                            "package descriptor points at a missing main"
                        );
                        HostError::ModuleNotFound(specifier.to_string())
                    });
                }
                Ok(PackageJson { main: None }) => {
                    warn!(descriptor = %descriptor_path, "package descriptor has no main field");
                }
                Err(err) => {
                    warn!(descriptor = %descriptor_path, error = %err, "malformed package descriptor");
                }
            }
            // Malformed or main-less descriptors fall through to the
            // remaining candidates.
        }

        // 3. A directory with an index file.
        let index = ModuleId::normalized(&format!("{specifier}/index.js"));
        if let Some(found) = self.probe(index, false, cache, provider) {
            return Ok(found);
        }

        // 4. A script file without its extension.
        let script = ModuleId::normalized(&format!("{specifier}.js"));
        if let Some(found) = self.probe(script, false, cache, provider) {
            return Ok(found);
        }

        // 5. A JSON file without its extension.
        let json = ModuleId::normalized(&format!("{specifier}.json"));
        if let Some(found) = self.probe(json, true, cache, provider) {
            return Ok(found);
        }

        Err(HostError::ModuleNotFound(specifier.to_string()))
    }

    fn probe(
        &self,
        id: ModuleId,
        json: bool,
        cache: &ModuleCache,
        provider: &dyn FileProvider,
    ) -> Option<Resolution> {
        if let Some(value) = cache.get(&id) {
            return Some(Resolution::Cached(value));
        }
        provider
            .load_source(id.as_str())
            .map(|bytes| Resolution::Source(ModuleSource { id, bytes, json }))
    }
}
