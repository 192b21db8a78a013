// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Script value representation.

use super::function::NativeFunction;
use super::heap::ObjectId;
use std::fmt;
use std::sync::Arc;

/// A script value.
///
/// Objects are represented as handles into the owning engine's heap, so
/// cloning a value never copies the underlying object and equality on the
/// `Object` arm is identity equality.
#[derive(Debug, Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Object handle into the engine heap
    Object(ObjectId),
    /// Function value
    Function(Arc<NativeFunction>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                // NaN is never equal to itself
                if a.is_nan() && b.is_nan() {
                    false
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Returns true if this value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if this value is a function.
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Returns the string payload, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object handle, if this value is an object.
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the type of this value as a string.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object", // Historical quirk
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(func) => match func.name() {
                Some(name) => write!(f, "[Function: {}]", name),
                None => write!(f, "[Function (anonymous)]"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_equality_is_identity() {
        assert_eq!(Value::Object(ObjectId(3)), Value::Object(ObjectId(3)));
        assert_ne!(Value::Object(ObjectId(3)), Value::Object(ObjectId(4)));
    }

    #[test]
    fn nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn type_predicates_follow_script_typing() {
        let function = Value::Function(Arc::new(NativeFunction::anonymous(|_, _| {
            Ok(Value::Undefined)
        })));
        assert!(function.is_function());
        assert_eq!(function.type_of(), "function");
        assert!(Value::Undefined.is_undefined());
        assert_eq!(Value::Undefined.type_of(), "undefined");
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::Object(ObjectId(0)).type_of(), "object");
        assert_eq!(Value::Number(1.0).type_of(), "number");
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Object(ObjectId(0)).to_string(), "[object Object]");
        assert_eq!(Value::String("hi".into()).to_string(), "hi");
    }
}
