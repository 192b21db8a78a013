// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exception bridging end to end: host errors into script, script
//! exceptions back out, identity across the round trip.

mod common;

use common::{ScriptedCompiler, exports_of, host_with, require_of};
use estuary::engine::ScriptException;
use estuary::{
    HostError, LineInfo, MemoryFileProvider, NativeFunction, Raised, Value,
};
use std::sync::Arc;

#[test]
fn thrown_error_carries_message_and_trace() {
    let compiler = ScriptedCompiler::new().define("app/fail.js", |host, _args| {
        Err(host.throw_error("Error", "boom"))
    });
    let provider = MemoryFileProvider::new().with_file("app/fail.js", "body");
    let mut host = host_with(provider, compiler);

    let err = host.require("app/fail").unwrap_err();
    let failure = err.script_failure().unwrap();
    assert_eq!(failure.message, "[Error] boom");
    assert_eq!(failure.frames.len(), 1);
    let frame = &failure.frames[0];
    assert_eq!(frame.type_name, "<unknown>");
    assert_eq!(frame.method_name, "<anonymous>");
    assert_eq!(frame.file_name.as_deref(), Some("app/fail.js"));
    assert_eq!(frame.line, LineInfo::Line(1));
}

#[test]
fn nested_requires_reconstruct_the_full_stack() {
    let compiler = ScriptedCompiler::new()
        .define("app/a.js", |host, args| {
            let require = require_of(args);
            host.call_function(&require, &[Value::String("./b".into())])
                .map_err(Raised::Script)?;
            Ok(Value::Undefined)
        })
        .define("app/b.js", |host, _args| {
            Err(host.throw_error("RangeError", "too deep"))
        });
    let provider = MemoryFileProvider::new()
        .with_file("app/a.js", "body")
        .with_file("app/b.js", "body");
    let mut host = host_with(provider, compiler);

    let err = host.require("app/a").unwrap_err();
    let failure = err.script_failure().unwrap();
    assert_eq!(failure.message, "[RangeError] too deep");
    // Outermost first: the a.js wrapper, the require builtin, the b.js
    // wrapper that threw.
    assert_eq!(failure.frames.len(), 3);
    assert_eq!(failure.frames[0].file_name.as_deref(), Some("app/a.js"));
    assert_eq!(failure.frames[1].method_name, "require");
    assert_eq!(failure.frames[1].line, LineInfo::Native);
    assert_eq!(failure.frames[2].file_name.as_deref(), Some("app/b.js"));
}

#[test]
fn thrown_plain_object_falls_back_to_display_string() {
    let compiler = ScriptedCompiler::new().define("odd.js", |host, _args| {
        let id = host.engine_mut().new_object();
        Err(Raised::Script(ScriptException::new(Value::Object(id))))
    });
    let provider = MemoryFileProvider::new().with_file("odd.js", "body");
    let mut host = host_with(provider, compiler);

    let err = host.require("odd").unwrap_err();
    let failure = err.script_failure().unwrap();
    assert_eq!(failure.message, "[object Object]");
    // No stack was captured for the plain object; the trace still has its
    // one placeholder entry.
    assert_eq!(failure.frames.len(), 1);
    assert_eq!(failure.frames[0].method_name, "<unknown>");
}

#[test]
fn host_error_round_trip_preserves_identity() {
    let mut host = host_with(MemoryFileProvider::new(), ScriptedCompiler::new());

    // Manufacture a script failure, then re-raise it from a native callee.
    let original = host.require("gone").unwrap_err();
    assert!(matches!(original, HostError::Script(_)));
    let raised = original.clone();
    let rethrow = Value::Function(Arc::new(NativeFunction::new("rethrow", move |_host, _args| {
        Err(Raised::Host(raised.clone()))
    })));

    let back = host.call(&rethrow, &[]).unwrap_err();
    match (&original, &back) {
        (HostError::Script(a), HostError::Script(b)) => assert!(Arc::ptr_eq(a, b)),
        _ => panic!("expected script failures"),
    }
}

#[test]
fn foreign_host_error_becomes_the_cause() {
    let mut host = host_with(MemoryFileProvider::new(), ScriptedCompiler::new());
    let fail = Value::Function(Arc::new(NativeFunction::new("fail", |_host, _args| {
        Err(Raised::Host(HostError::host(anyhow::anyhow!(
            "disk on fire"
        ))))
    })));

    let err = host.call(&fail, &[]).unwrap_err();
    let failure = err.script_failure().unwrap();
    assert_eq!(failure.message, "[HostError] disk on fire");
    assert!(matches!(
        failure.cause.as_deref(),
        Some(HostError::Host(_))
    ));
}

#[test]
fn script_code_can_inspect_a_wrapped_host_error() {
    let compiler = ScriptedCompiler::new().define("catcher.js", |host, args| {
        let require = require_of(args);
        let exports = exports_of(args);
        match host.call_function(&require, &[Value::String("missing".into())]) {
            Ok(_) => Err(host.throw_error("Error", "should not resolve")),
            Err(exc) => {
                // The wrapped error is an ordinary script object.
                let id = exc.value.as_object().ok_or(Raised::Script(exc.clone()))?;
                let name = host
                    .engine()
                    .get_property(id, "name")
                    .unwrap_or(Value::Undefined);
                let message = host
                    .engine()
                    .get_property(id, "message")
                    .unwrap_or(Value::Undefined);
                host.engine_mut().set_property(exports, "name", name);
                host.engine_mut().set_property(exports, "message", message);
                Ok(Value::Undefined)
            }
        }
    });
    let provider = MemoryFileProvider::new().with_file("catcher.js", "body");
    let mut host = host_with(provider, compiler);

    let exports = host.require("catcher").unwrap().as_object().unwrap();
    assert_eq!(
        host.engine().get_property(exports, "name"),
        Some(Value::String("HostError".into()))
    );
    assert_eq!(
        host.engine().get_property(exports, "message"),
        Some(Value::String("Cannot find module 'missing'".into()))
    );
}

#[test]
fn thrown_value_is_projected_for_the_host() {
    let compiler = ScriptedCompiler::new().define("data.js", |host, _args| {
        let id = host.engine_mut().new_object();
        host.engine_mut()
            .set_property(id, "code", Value::String("E_NOPE".into()));
        Err(Raised::Script(ScriptException::new(Value::Object(id))))
    });
    let provider = MemoryFileProvider::new().with_file("data.js", "body");
    let mut host = host_with(provider, compiler);

    let err = host.require("data").unwrap_err();
    let failure = err.script_failure().unwrap();
    assert_eq!(failure.thrown, serde_json::json!({"code": "E_NOPE"}));
}
