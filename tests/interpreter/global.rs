//! Global scope tests: standard bindings, ScopeConfig seeding, stubs

use super::builder::*;
use super::{eval, init_tracing, program};
use jswalk::{EngineOptions, JsValue, Runtime, ScopeConfig};

#[test]
fn test_standard_globals_exist() {
    for name in [
        "Object",
        "Function",
        "Array",
        "String",
        "Number",
        "Boolean",
        "Symbol",
        "Error",
        "TypeError",
        "ReferenceError",
        "RangeError",
        "log",
    ] {
        assert_eq!(
            eval(vec![expr(unary("typeof", id(name)))]),
            JsValue::from("function"),
            "typeof {}",
            name
        );
    }
    assert_eq!(eval(vec![expr(unary("typeof", id("console")))]), JsValue::from("object"));
}

#[test]
fn test_global_constants() {
    assert_eq!(eval(vec![expr(id("undefined"))]), JsValue::Undefined);
    assert_eq!(eval(vec![expr(id("Infinity"))]), JsValue::Number(f64::INFINITY));
    let nan = eval(vec![expr(id("NaN"))]);
    assert!(matches!(nan, JsValue::Number(n) if n.is_nan()));
}

#[test]
fn test_undefined_cannot_be_reassigned() {
    let err = super::eval_result(vec![expr(assign("=", id("undefined"), num(1.0)))]).unwrap_err();
    assert!(err.is_catchable());
}

#[test]
fn test_var_redeclaring_read_only_global_is_ignored() {
    // var undefined = 1; var NaN = 2; `${typeof undefined},${NaN}`
    assert_eq!(
        eval(vec![
            var("undefined", Some(num(1.0))),
            var("NaN", Some(num(2.0))),
            expr(template(
                &["", ",", ""],
                vec![unary("typeof", id("undefined")), id("NaN")],
            )),
        ]),
        JsValue::from("undefined,NaN")
    );
}

#[test]
fn test_unbound_read_is_undefined() {
    assert_eq!(eval(vec![expr(id("neverDeclared"))]), JsValue::Undefined);
}

#[test]
fn test_scope_config_variables_and_this() {
    init_tracing();
    let config = ScopeConfig::new()
        .with_this(JsValue::from("root"))
        .with_variable("answer", JsValue::Number(42.0));
    let runtime = Runtime::with_options(EngineOptions::default(), config);
    let result = runtime
        .eval_program(&program(vec![expr(bin("+", this(), id("answer")))]))
        .unwrap();
    assert_eq!(result, JsValue::from("root42"));
}

#[test]
fn test_scope_config_variables_are_mutable() {
    let config = ScopeConfig::new().with_variable("count", JsValue::Number(1.0));
    let runtime = Runtime::with_options(EngineOptions::default(), config);
    runtime
        .eval_program(&program(vec![expr(update("++", false, id("count")))]))
        .unwrap();
    assert_eq!(runtime.get_global("count"), JsValue::Number(2.0));
}

#[test]
fn test_top_level_this_defaults_to_undefined() {
    assert_eq!(eval(vec![expr(this())]), JsValue::Undefined);
}

#[test]
fn test_globals_persist_between_programs() {
    let runtime = Runtime::new();
    runtime
        .eval_program(&program(vec![
            var("total", Some(num(1.0))),
            func_decl("bump", &[], vec![expr(assign("+=", id("total"), num(1.0)))]),
        ]))
        .unwrap();
    let result = runtime
        .eval_program(&program(vec![
            expr(call(id("bump"), vec![])),
            expr(id("total")),
        ]))
        .unwrap();
    assert_eq!(result, JsValue::Number(2.0));
}

#[test]
fn test_runtimes_are_isolated() {
    let first = Runtime::new();
    let second = Runtime::new();
    first
        .eval_program(&program(vec![let_("x", num(1.0))]))
        .unwrap();
    assert_eq!(first.get_global("x"), JsValue::Number(1.0));
    assert_eq!(second.get_global("x"), JsValue::Undefined);
}

#[test]
fn test_array_and_symbol_stubs_return_undefined() {
    assert_eq!(eval(vec![expr(call(id("Array"), vec![num(3.0)]))]), JsValue::Undefined);
    assert_eq!(eval(vec![expr(call(id("Symbol"), vec![string("s")]))]), JsValue::Undefined);
}

#[test]
fn test_array_literals_inherit_array_prototype() {
    assert_eq!(
        eval(vec![expr(call(
            member(member(member(id("Object"), "prototype"), "toString"), "call"),
            vec![array(vec![])],
        ))]),
        JsValue::from("[object Array]")
    );
}
