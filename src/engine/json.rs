// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON bindings.
//!
//! Thin pass-through to the engine's native JSON support (serde_json), used
//! by `.json` module loading, `package.json` handling and the host-object
//! projection of script exceptions.

use super::Engine;
use super::exception::{Raised, ScriptResult};
use crate::Value;
use crate::engine::heap::{ObjectId, ObjectKind};
use std::collections::HashSet;

/// Parses JSON source into a script value.
///
/// A parse failure surfaces as a pending `SyntaxError` script exception, the
/// same way any other script failure does.
pub fn parse(engine: &mut Engine, source: &str) -> ScriptResult<Value> {
    let parsed: serde_json::Value = serde_json::from_str(source).map_err(|e| {
        let exc = engine.make_error_exception("SyntaxError", &e.to_string());
        Raised::Script(exc)
    })?;
    Ok(build(engine, &parsed))
}

/// Serializes a script value to a JSON string.
pub fn stringify(engine: &Engine, value: &Value, pretty: bool) -> String {
    let projected = project(engine, value);
    if pretty {
        serde_json::to_string_pretty(&projected).unwrap_or_else(|_| "null".to_string())
    } else {
        serde_json::to_string(&projected).unwrap_or_else(|_| "null".to_string())
    }
}

/// Projects a script value onto plain JSON data.
///
/// Functions and undefined become null; object cycles are cut with null at
/// the revisited handle.
pub fn project(engine: &Engine, value: &Value) -> serde_json::Value {
    let mut visited = HashSet::new();
    project_inner(engine, value, &mut visited)
}

fn project_inner(
    engine: &Engine,
    value: &Value,
    visited: &mut HashSet<ObjectId>,
) -> serde_json::Value {
    match value {
        Value::Undefined | Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Function(_) => serde_json::Value::Null,
        Value::Object(id) => {
            if !visited.insert(*id) {
                return serde_json::Value::Null;
            }
            let object = engine.heap().get(*id);
            let projected = match object.kind() {
                ObjectKind::Array => serde_json::Value::Array(
                    object
                        .elements()
                        .iter()
                        .map(|v| project_inner(engine, v, visited))
                        .collect(),
                ),
                ObjectKind::Plain => serde_json::Value::Object(
                    object
                        .properties()
                        .iter()
                        .map(|(k, v)| (k.clone(), project_inner(engine, v, visited)))
                        .collect(),
                ),
            };
            visited.remove(id);
            projected
        }
    }
}

fn build(engine: &mut Engine, json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            let elements = items.iter().map(|item| build(engine, item)).collect();
            Value::Object(engine.heap_mut().alloc_array(elements))
        }
        serde_json::Value::Object(map) => {
            let id = engine.new_object();
            for (key, item) in map {
                let value = build(engine, item);
                engine.set_property(id, key, value);
            }
            Value::Object(id)
        }
    }
}
