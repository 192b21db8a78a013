// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine facade.
//!
//! This module is the concrete boundary to the embedded script engine: the
//! value model, the object heap, pending exceptions, the call-stack frames
//! used for error reporting, and the compiler seam the embedder's evaluator
//! plugs into. Engine bootstrap (globals, scheduling, bytecode) is the
//! evaluator's own concern and stays behind [`ScriptCompiler`].

pub mod exception;
pub mod function;
pub mod heap;
pub mod json;
pub mod value;

pub use exception::{CallSite, Raised, ScriptException, ScriptResult, SourceLocation};
pub use function::NativeFunction;
pub use heap::{Heap, Object, ObjectId, ObjectKind};
pub use value::Value;

use std::sync::Arc;

/// A compile failure reported by the evaluator.
#[derive(Debug, Clone)]
pub struct CompileError {
    /// Parser message.
    pub message: String,
    /// 1-based line of the failure within the compiled source, when known.
    pub line: Option<u32>,
}

/// The seam to the embedded evaluator.
///
/// The loader hands over wrapped module source together with the resolved
/// module id as the diagnostic origin; the evaluator returns a callable that
/// runs the module body. Stack frames and syntax errors reference the origin.
pub trait ScriptCompiler: Send {
    /// Compiles `source`, registering it under the diagnostic name `origin`.
    fn compile(&mut self, source: &str, origin: &str)
    -> Result<Arc<NativeFunction>, CompileError>;
}

/// Placeholder compiler installed until the embedder provides its evaluator.
struct NullCompiler;

impl ScriptCompiler for NullCompiler {
    fn compile(
        &mut self,
        _source: &str,
        _origin: &str,
    ) -> Result<Arc<NativeFunction>, CompileError> {
        Err(CompileError {
            message: "script evaluation is not available: no compiler installed".to_string(),
            line: None,
        })
    }
}

/// One engine instance: heap, execution stack and compiler seam.
///
/// All state is owned by the instance; tearing the engine down releases the
/// heap, every cached module export and every pending carrier in one stroke.
pub struct Engine {
    heap: Heap,
    frames: Vec<CallSite>,
    compiler: Box<dyn ScriptCompiler>,
}

impl Engine {
    /// Creates an engine with no evaluator installed.
    pub fn new() -> Self {
        Self {
            heap: Heap::new(),
            frames: Vec::new(),
            compiler: Box::new(NullCompiler),
        }
    }

    /// Installs the embedder's evaluator.
    pub fn set_compiler(&mut self, compiler: Box<dyn ScriptCompiler>) {
        self.compiler = compiler;
    }

    pub(crate) fn heap(&self) -> &Heap {
        &self.heap
    }

    pub(crate) fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Allocates a fresh plain object.
    pub fn new_object(&mut self) -> ObjectId {
        self.heap.alloc(ObjectKind::Plain)
    }

    /// Allocates an array object with the given elements.
    pub fn new_array(&mut self, elements: Vec<Value>) -> ObjectId {
        self.heap.alloc_array(elements)
    }

    /// Sets a named property.
    pub fn set_property(&mut self, id: ObjectId, key: &str, value: Value) {
        self.heap.set_property(id, key, value);
    }

    /// Reads a named property.
    pub fn get_property(&self, id: ObjectId, key: &str) -> Option<Value> {
        self.heap.property(id, key)
    }

    /// Constructs an error object with `name` and `message` properties and a
    /// stack captured at the construction site.
    pub fn make_error(&mut self, name: &str, message: &str) -> ObjectId {
        let id = self.heap.alloc(ObjectKind::Plain);
        self.heap
            .set_property(id, "name", Value::String(name.to_string()));
        self.heap
            .set_property(id, "message", Value::String(message.to_string()));
        let stack = self.frames.clone();
        self.heap.set_captured_stack(id, stack);
        id
    }

    /// Constructs an error object and wraps it as a pending exception located
    /// at the current execution point.
    pub fn make_error_exception(&mut self, name: &str, message: &str) -> ScriptException {
        let id = self.make_error(name, message);
        ScriptException {
            value: Value::Object(id),
            location: self.current_location(),
        }
    }

    /// The stack captured when `id` was constructed as an error, if any.
    pub fn error_stack(&self, id: ObjectId) -> Option<&[CallSite]> {
        self.heap.captured_stack(id)
    }

    pub(crate) fn push_frame(&mut self, frame: CallSite) {
        self.frames.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// The current script call stack, innermost frame last.
    pub fn stack(&self) -> &[CallSite] {
        &self.frames
    }

    /// Best-effort location of the innermost executing frame.
    pub fn current_location(&self) -> Option<SourceLocation> {
        self.frames.last().map(|frame| SourceLocation {
            script: frame.file_name.clone(),
            line: frame.line_number,
        })
    }

    /// Compiles `source` under the diagnostic name `origin`.
    ///
    /// A compile failure becomes a pending `SyntaxError` whose location
    /// carries the origin and the failing line, so the bridge can prepend
    /// `<resource>:<line> - ` when the failure reaches the host.
    pub fn compile(&mut self, source: &str, origin: &str) -> ScriptResult<Value> {
        match self.compiler.compile(source, origin) {
            Ok(function) => Ok(Value::Function(function)),
            Err(err) => {
                let id = self.make_error("SyntaxError", &err.message);
                Err(Raised::Script(ScriptException {
                    value: Value::Object(id),
                    location: Some(SourceLocation {
                        script: Some(origin.to_string()),
                        line: err.line,
                    }),
                }))
            }
        }
    }

    /// Default string conversion of a value, used when a thrown value has no
    /// usable `message`.
    pub fn to_display_string(&self, value: &Value) -> String {
        match value {
            Value::Object(id) => match self.heap.get(*id).kind() {
                ObjectKind::Array => self
                    .heap
                    .get(*id)
                    .elements()
                    .iter()
                    .map(|v| self.to_display_string(v))
                    .collect::<Vec<_>>()
                    .join(","),
                ObjectKind::Plain => "[object Object]".to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
