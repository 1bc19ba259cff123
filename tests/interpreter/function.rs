//! Function tests: declarations, closures, parameters, `this` binding, `new`

use super::builder::*;
use super::{eval, eval_result, throws_error};
use jswalk::{JsError, JsValue};

// -----------------------------------------------------------------------------
// Declarations and hoisting
// -----------------------------------------------------------------------------

#[test]
fn test_function_declaration_call() {
    assert_eq!(
        eval(vec![
            func_decl("add", &["a", "b"], vec![ret(bin("+", id("a"), id("b")))]),
            expr(call(id("add"), vec![num(2.0), num(3.0)])),
        ]),
        JsValue::Number(5.0)
    );
}

#[test]
fn test_function_name_is_bound_before_its_declaration_runs() {
    // `typeof f` before the declaration sees the hoisted (undefined) binding
    assert_eq!(
        eval(vec![
            let_("before", unary("typeof", id("f"))),
            func_decl("f", &[], vec![]),
            expr(template(&["", ",", ""], vec![id("before"), unary("typeof", id("f"))])),
        ]),
        JsValue::from("undefined,function")
    );
}

#[test]
fn test_var_is_hoisted_to_function_scope() {
    // function f() { x = 5; if (false) { var x; } return x } f(); typeof x
    assert_eq!(
        eval(vec![
            func_decl(
                "f",
                &[],
                vec![
                    expr(assign("=", id("x"), num(5.0))),
                    if_(boolean(false), block(vec![var("x", None)]), None),
                    ret(id("x")),
                ],
            ),
            let_("inner", call(id("f"), vec![])),
            expr(template(&["", ",", ""], vec![id("inner"), unary("typeof", id("x"))])),
        ]),
        JsValue::from("5,undefined")
    );
}

#[test]
fn test_assignment_to_undeclared_is_reference_error() {
    let err = eval_result(vec![expr(assign("=", id("nowhere"), num(1.0)))]).unwrap_err();
    assert!(matches!(err, JsError::ReferenceError { .. }));
}

#[test]
fn test_missing_arguments_are_undefined() {
    assert_eq!(
        eval(vec![
            func_decl("f", &["a", "b"], vec![ret(id("b"))]),
            expr(call(id("f"), vec![num(1.0)])),
        ]),
        JsValue::Undefined
    );
}

#[test]
fn test_function_without_return_yields_undefined() {
    assert_eq!(
        eval(vec![
            func_decl("f", &[], vec![expr(num(1.0))]),
            expr(call(id("f"), vec![])),
        ]),
        JsValue::Undefined
    );
}

#[test]
fn test_arguments_object() {
    assert_eq!(
        eval(vec![
            func_decl(
                "f",
                &[],
                vec![ret(bin(
                    "+",
                    member(id("arguments"), "length"),
                    index(id("arguments"), num(2.0)),
                ))],
            ),
            expr(call(id("f"), vec![num(1.0), num(2.0), num(30.0)])),
        ]),
        JsValue::Number(33.0)
    );
}

#[test]
fn test_default_and_rest_parameters() {
    // function f(a, b = 10, ...rest) { return a + b + rest.length } f(1, undefined, 7, 8)
    assert_eq!(
        eval(vec![
            func_decl_with(
                "f",
                vec![id("a"), default_param("b", num(10.0)), rest_param("rest")],
                vec![ret(bin(
                    "+",
                    bin("+", id("a"), id("b")),
                    member(id("rest"), "length"),
                ))],
            ),
            expr(call(
                id("f"),
                vec![num(1.0), id("undefined"), num(7.0), num(8.0)],
            )),
        ]),
        JsValue::Number(13.0)
    );
}

#[test]
fn test_default_parameter_sees_earlier_parameters() {
    assert_eq!(
        eval(vec![
            func_decl_with(
                "f",
                vec![id("a"), default_param("b", bin("*", id("a"), num(2.0)))],
                vec![ret(id("b"))],
            ),
            expr(call(id("f"), vec![num(4.0)])),
        ]),
        JsValue::Number(8.0)
    );
}

#[test]
fn test_spread_arguments() {
    assert_eq!(
        eval(vec![
            func_decl(
                "sum3",
                &["a", "b", "c"],
                vec![ret(bin("+", bin("+", id("a"), id("b")), id("c")))],
            ),
            expr(call(
                id("sum3"),
                vec![num(1.0), spread(array(vec![num(2.0), num(3.0)]))],
            )),
        ]),
        JsValue::Number(6.0)
    );
}

// -----------------------------------------------------------------------------
// Closures
// -----------------------------------------------------------------------------

#[test]
fn test_closure_counter() {
    // function counter() { let n = 0; return () => ++n } let c = counter(); c(); c(); c()
    assert_eq!(
        eval(vec![
            func_decl(
                "counter",
                &[],
                vec![
                    let_("n", num(0.0)),
                    ret(arrow_expr(&[], update("++", true, id("n")))),
                ],
            ),
            let_("c", call(id("counter"), vec![])),
            expr(call(id("c"), vec![])),
            expr(call(id("c"), vec![])),
            expr(call(id("c"), vec![])),
        ]),
        JsValue::Number(3.0)
    );
}

#[test]
fn test_closures_capture_separate_activations() {
    assert_eq!(
        eval(vec![
            func_decl(
                "make",
                &["x"],
                vec![ret(arrow_expr(&[], id("x")))],
            ),
            let_("a", call(id("make"), vec![string("a")])),
            let_("b", call(id("make"), vec![string("b")])),
            expr(bin("+", call(id("a"), vec![]), call(id("b"), vec![]))),
        ]),
        JsValue::from("ab")
    );
}

#[test]
fn test_closures_share_one_activation() {
    // function counter() { let n = 0; return { inc: () => { n++ }, get: () => n } }
    assert_eq!(
        eval(vec![
            func_decl(
                "counter",
                &[],
                vec![
                    let_("n", num(0.0)),
                    ret(object(vec![
                        prop("inc", arrow(&[], vec![expr(update("++", false, id("n")))])),
                        prop("get", arrow_expr(&[], id("n"))),
                    ])),
                ],
            ),
            let_("c", call(id("counter"), vec![])),
            expr(call(member(id("c"), "inc"), vec![])),
            expr(call(member(id("c"), "inc"), vec![])),
            expr(call(member(id("c"), "get"), vec![])),
        ]),
        JsValue::Number(2.0)
    );
}

#[test]
fn test_named_function_expression_recursion() {
    // let f = function fact(n) { return n <= 1 ? 1 : n * fact(n - 1) }; f(5)
    assert_eq!(
        eval(vec![
            let_(
                "f",
                func_expr(
                    Some("fact"),
                    &["n"],
                    vec![ret(cond(
                        bin("<=", id("n"), num(1.0)),
                        num(1.0),
                        bin(
                            "*",
                            id("n"),
                            call(id("fact"), vec![bin("-", id("n"), num(1.0))]),
                        ),
                    ))],
                ),
            ),
            expr(bin(
                "+",
                call(id("f"), vec![num(5.0)]),
                unary("typeof", id("fact")),
            )),
        ]),
        JsValue::from("120undefined")
    );
}

#[test]
fn test_anonymous_functions_take_binding_name() {
    assert_eq!(
        eval(vec![
            let_("g", arrow_expr(&[], num(1.0))),
            expr(member(id("g"), "name")),
        ]),
        JsValue::from("g")
    );
    assert_eq!(
        eval(vec![
            func_decl("h", &[], vec![]),
            expr(member(id("h"), "name")),
        ]),
        JsValue::from("h")
    );
}

#[test]
fn test_recursion() {
    // function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2) } fib(15)
    assert_eq!(
        eval(vec![
            func_decl(
                "fib",
                &["n"],
                vec![ret(cond(
                    bin("<", id("n"), num(2.0)),
                    id("n"),
                    bin(
                        "+",
                        call(id("fib"), vec![bin("-", id("n"), num(1.0))]),
                        call(id("fib"), vec![bin("-", id("n"), num(2.0))]),
                    ),
                ))],
            ),
            expr(call(id("fib"), vec![num(15.0)])),
        ]),
        JsValue::Number(610.0)
    );
}

// -----------------------------------------------------------------------------
// `this` binding
// -----------------------------------------------------------------------------

fn counter_object() -> serde_json::Value {
    // let o = { n: 3, get: function () { return this.n } }
    let_(
        "o",
        object(vec![
            prop("n", num(3.0)),
            prop("get", func_expr(None, &[], vec![ret(member(this(), "n"))])),
        ]),
    )
}

#[test]
fn test_method_call_binds_this() {
    assert_eq!(
        eval(vec![counter_object(), expr(call(member(id("o"), "get"), vec![]))]),
        JsValue::Number(3.0)
    );
}

#[test]
fn test_computed_method_call_binds_this() {
    assert_eq!(
        eval(vec![
            counter_object(),
            expr(call(index(id("o"), string("get")), vec![])),
        ]),
        JsValue::Number(3.0)
    );
}

#[test]
fn test_detached_method_has_undefined_this() {
    assert!(throws_error(
        vec![
            counter_object(),
            let_("g", member(id("o"), "get")),
            expr(call(id("g"), vec![])),
        ],
        "Cannot read properties of undefined (reading 'n')",
    ));
}

#[test]
fn test_arrow_captures_defining_this() {
    // let o = { n: 4, f() { let a = () => this.n; return a() } }; o.f()
    assert_eq!(
        eval(vec![
            let_(
                "o",
                object(vec![
                    prop("n", num(4.0)),
                    method(
                        "f",
                        &[],
                        vec![
                            let_("a", arrow_expr(&[], member(this(), "n"))),
                            ret(call(id("a"), vec![])),
                        ],
                    ),
                ]),
            ),
            expr(call(member(id("o"), "f"), vec![])),
        ]),
        JsValue::Number(4.0)
    );
}

#[test]
fn test_call_and_apply_set_this() {
    assert_eq!(
        eval(vec![
            func_decl(
                "f",
                &["a", "b"],
                vec![ret(bin("+", bin("+", member(this(), "base"), id("a")), id("b")))],
            ),
            let_("o", object(vec![prop("base", num(100.0))])),
            expr(bin(
                "+",
                call(member(id("f"), "call"), vec![id("o"), num(1.0), num(2.0)]),
                call(
                    member(id("f"), "apply"),
                    vec![id("o"), array(vec![num(10.0), num(20.0)])],
                ),
            )),
        ]),
        JsValue::Number(233.0)
    );
}

#[test]
fn test_calling_non_function() {
    assert!(throws_error(
        vec![expr(call(id("missing"), vec![]))],
        "is not a function",
    ));
    let err = eval_result(vec![
        let_("o", object(vec![])),
        expr(call(id("o"), vec![])),
    ])
    .unwrap_err();
    assert!(matches!(err, JsError::TypeError { .. }));
}

// -----------------------------------------------------------------------------
// Constructors
// -----------------------------------------------------------------------------

fn point_class() -> Vec<serde_json::Value> {
    // function P(x) { this.x = x } P.prototype.get = function () { return this.x }
    vec![
        func_decl("P", &["x"], vec![expr(assign("=", member(this(), "x"), id("x")))]),
        expr(assign(
            "=",
            member(member(id("P"), "prototype"), "get"),
            func_expr(None, &[], vec![ret(member(this(), "x"))]),
        )),
    ]
}

#[test]
fn test_new_binds_fresh_object_and_prototype() {
    let mut body = point_class();
    body.push(let_("p", new(id("P"), vec![num(5.0)])));
    body.push(expr(call(member(id("p"), "get"), vec![])));
    assert_eq!(eval(body), JsValue::Number(5.0));
}

#[test]
fn test_prototype_constructor_points_back() {
    let mut body = point_class();
    body.push(expr(bin(
        "===",
        member(member(id("P"), "prototype"), "constructor"),
        id("P"),
    )));
    assert_eq!(eval(body), JsValue::Boolean(true));
}

#[test]
fn test_instanceof() {
    let mut body = point_class();
    body.push(let_("p", new(id("P"), vec![num(1.0)])));
    body.push(expr(template(
        &["", ",", ""],
        vec![
            bin("instanceof", id("p"), id("P")),
            bin("instanceof", object(vec![]), id("P")),
        ],
    )));
    assert_eq!(eval(body), JsValue::from("true,false"));
}

#[test]
fn test_instanceof_checks_only_immediate_prototype() {
    // function A() {} function B() {} B.prototype = new A(); new B() instanceof A
    assert_eq!(
        eval(vec![
            func_decl("A", &[], vec![]),
            func_decl("B", &[], vec![]),
            expr(assign("=", member(id("B"), "prototype"), new(id("A"), vec![]))),
            let_("b", new(id("B"), vec![])),
            expr(template(
                &["", ",", ""],
                vec![
                    bin("instanceof", id("b"), id("B")),
                    bin("instanceof", id("b"), id("A")),
                ],
            )),
        ]),
        JsValue::from("true,false")
    );
}

#[test]
fn test_instanceof_requires_function() {
    assert!(throws_error(
        vec![expr(bin("instanceof", object(vec![]), object(vec![])))],
        "not callable",
    ));
}

#[test]
fn test_constructor_returning_object_replaces_this() {
    assert_eq!(
        eval(vec![
            func_decl(
                "F",
                &[],
                vec![
                    expr(assign("=", member(this(), "a"), num(1.0))),
                    ret(object(vec![prop("b", num(2.0))])),
                ],
            ),
            let_("f", new(id("F"), vec![])),
            expr(bin("+", member(id("f"), "b"), unary("typeof", member(id("f"), "a")))),
        ]),
        JsValue::from("2undefined")
    );
}

#[test]
fn test_constructor_returning_primitive_keeps_this() {
    assert_eq!(
        eval(vec![
            func_decl(
                "F",
                &[],
                vec![
                    expr(assign("=", member(this(), "a"), num(1.0))),
                    ret(num(99.0)),
                ],
            ),
            expr(member(new(id("F"), vec![]), "a")),
        ]),
        JsValue::Number(1.0)
    );
}

#[test]
fn test_new_on_arrow_is_type_error() {
    let err = eval_result(vec![
        let_("a", arrow_expr(&[], num(1.0))),
        expr(new(id("a"), vec![])),
    ])
    .unwrap_err();
    assert!(matches!(err, JsError::TypeError { .. }));
    assert!(err.to_string().contains("is not a constructor"));
}

#[test]
fn test_generator_is_unsupported() {
    let generator = serde_json::json!({
        "type": "FunctionDeclaration", "id": {"type": "Identifier", "name": "g"},
        "params": [], "body": {"type": "BlockStatement", "body": []},
        "generator": true, "async": false
    });
    let err = eval_result(vec![generator]).unwrap_err();
    assert!(matches!(err, JsError::Internal { .. }));
}
