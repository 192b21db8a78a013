// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure path utilities and the normalized module identifier.

use std::fmt;

/// Normalizes a slash-separated path.
///
/// `.` segments and empty segments are dropped; each `..` removes the
/// preceding real segment. A leading `..` with nothing before it is kept
/// verbatim rather than guessed away.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), None | Some(&"..")) {
                    segments.push("..");
                } else {
                    segments.pop();
                }
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Returns the portion of `path` before the last `/`, or the whole string
/// when it contains no `/` at all.
pub fn dirname_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => path,
    }
}

/// Canonical identifier of a loadable unit.
///
/// Always normalized: after construction the id contains no `.` segments and
/// no interior `..` segments, and is interpreted relative to the provider's
/// fixed root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    /// Builds an id by normalizing `path`.
    pub fn normalized(path: &str) -> Self {
        Self(normalize(path))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory portion of the id.
    pub fn dirname(&self) -> &str {
        dirname_of(&self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
