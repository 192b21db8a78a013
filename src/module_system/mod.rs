// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CommonJS-style module system: specifier normalization, resolution,
//! caching, native modules and per-directory `require`.

pub mod cache;
pub mod loader;
pub mod path;
pub mod registry;
pub mod require;
pub mod resolver;

pub use cache::ModuleCache;
pub use loader::ModuleLoader;
pub use path::{ModuleId, dirname_of, normalize};
pub use registry::{NativeModuleInit, NativeModuleRegistry};
pub use resolver::{ModuleResolver, ModuleSource, Resolution};
