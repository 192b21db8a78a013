// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine-instance-owned object heap.
//!
//! Objects are allocated into a flat arena and addressed by [`ObjectId`]
//! handles. There is no collector: objects live until the owning engine is
//! torn down, matching the lifetime of the module cache that roots most of
//! them.

use super::exception::CallSite;
use crate::Value;
use std::collections::HashMap;

/// Handle to an object in an engine's heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) usize);

/// The kind of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Plain object with string-keyed properties.
    Plain,
    /// Array object with indexed elements.
    Array,
}

/// A heap-allocated script object.
#[derive(Debug)]
pub struct Object {
    kind: ObjectKind,
    properties: HashMap<String, Value>,
    elements: Vec<Value>,
    /// Call stack captured when this object was constructed as an error.
    captured_stack: Option<Vec<CallSite>>,
}

impl Object {
    fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            properties: HashMap::new(),
            elements: Vec::new(),
            captured_stack: None,
        }
    }

    /// The object's kind.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Indexed elements (empty for plain objects).
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    /// Named properties.
    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }
}

/// Flat object arena owned by one engine instance.
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    pub(crate) fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, kind: ObjectKind) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Object::new(kind));
        id
    }

    pub(crate) fn alloc_array(&mut self, elements: Vec<Value>) -> ObjectId {
        let id = self.alloc(ObjectKind::Array);
        self.objects[id.0].elements = elements;
        id
    }

    /// Handles are never invalidated before teardown, so lookups are plain
    /// indexing.
    pub(crate) fn get(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.0]
    }

    pub(crate) fn set_property(&mut self, id: ObjectId, key: &str, value: Value) {
        self.get_mut(id).properties.insert(key.to_string(), value);
    }

    pub(crate) fn property(&self, id: ObjectId, key: &str) -> Option<Value> {
        self.get(id).properties.get(key).cloned()
    }

    pub(crate) fn set_captured_stack(&mut self, id: ObjectId, stack: Vec<CallSite>) {
        self.get_mut(id).captured_stack = Some(stack);
    }

    pub(crate) fn captured_stack(&self, id: ObjectId) -> Option<&[CallSite]> {
        self.get(id).captured_stack.as_deref()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_round_trip() {
        let mut heap = Heap::new();
        let id = heap.alloc(ObjectKind::Plain);
        heap.set_property(id, "answer", Value::Number(42.0));
        assert_eq!(heap.property(id, "answer"), Some(Value::Number(42.0)));
        assert_eq!(heap.property(id, "missing"), None);
    }

    #[test]
    fn arrays_keep_elements() {
        let mut heap = Heap::new();
        let id = heap.alloc_array(vec![Value::Null, Value::Boolean(true)]);
        assert_eq!(heap.get(id).kind(), ObjectKind::Array);
        assert_eq!(heap.get(id).elements().len(), 2);
    }
}
