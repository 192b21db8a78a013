// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Estuary is an embeddable scripting host: a CommonJS-style module system
//! (resolution, caching, native modules, per-directory `require`) and a
//! bidirectional exception bridge over a per-instance script engine.
//!
//! Module sources come from a host-supplied [`FileProvider`]; host-side
//! failures crossing into script become carrier-backed error objects, and
//! script exceptions crossing out become [`ScriptFailure`] payloads with a
//! reconstructed stack trace. An error that makes the round trip unwraps to
//! the identical host error.
//!
//! # Example
//!
//! ```no_run
//! use estuary::{HostConfig, MemoryFileProvider, ScriptHost};
//!
//! let provider = MemoryFileProvider::new()
//!     .with_file("app/index.js", "module.exports = { ready: true };");
//! let mut host = ScriptHost::new(Box::new(provider), HostConfig::default());
//! let exports = host.require("app")?;
//! # Ok::<(), estuary::HostError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod engine;
pub mod error;
pub mod host;
pub mod module_system;
pub mod provider;

pub use bridge::ExceptionBridge;
pub use engine::{
    CallSite, CompileError, Engine, NativeFunction, ObjectId, Raised, ScriptCompiler,
    ScriptException, ScriptResult, SourceLocation, Value,
};
pub use error::{HostError, LineInfo, Result, ScriptFailure, TraceFrame};
pub use host::{HostConfig, ScriptHost, SharedHost};
pub use module_system::{ModuleCache, ModuleId, NativeModuleRegistry};
pub use provider::{DirFileProvider, FileProvider, MemoryFileProvider};
