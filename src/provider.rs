// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Module source providers.
//!
//! The loader never touches the filesystem directly; the host supplies a
//! [`FileProvider`] and a missing file is a valid, non-fatal answer that
//! advances resolution to the next candidate.

use std::collections::HashMap;
use std::path::PathBuf;

/// Host-supplied source of raw module bytes.
pub trait FileProvider: Send {
    /// Loads the bytes at `path`, or `None` if no such file exists.
    fn load_source(&self, path: &str) -> Option<Vec<u8>>;
}

/// In-memory provider, in the style of a bundled asset tree.
#[derive(Debug, Default)]
pub struct MemoryFileProvider {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFileProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous content at the same path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl FileProvider for MemoryFileProvider {
    fn load_source(&self, path: &str) -> Option<Vec<u8>> {
        self.files.get(path).cloned()
    }
}

/// Provider rooted at a directory on disk.
#[derive(Debug)]
pub struct DirFileProvider {
    root: PathBuf,
}

impl DirFileProvider {
    /// Creates a provider serving files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileProvider for DirFileProvider {
    fn load_source(&self, path: &str) -> Option<Vec<u8>> {
        // Module ids are normalized, but a bare specifier may still carry a
        // preserved leading "..": refuse anything that would escape the root.
        if path.split('/').any(|segment| segment == "..") {
            return None;
        }
        std::fs::read(self.root.join(path)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_provider_misses_are_none() {
        let provider = MemoryFileProvider::new().with_file("a.js", "1");
        assert_eq!(provider.load_source("a.js"), Some(b"1".to_vec()));
        assert_eq!(provider.load_source("b.js"), None);
    }

    #[test]
    fn dir_provider_reads_and_refuses_escapes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mod.js"), "x").unwrap();
        let provider = DirFileProvider::new(dir.path());
        assert_eq!(provider.load_source("mod.js"), Some(b"x".to_vec()));
        assert_eq!(provider.load_source("../mod.js"), None);
    }
}
