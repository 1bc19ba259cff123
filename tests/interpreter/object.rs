//! Object tests: literals, property resolution, accessors, prototypes

use super::builder::*;
use super::{eval, throws_error};
use jswalk::JsValue;

// -----------------------------------------------------------------------------
// Literals
// -----------------------------------------------------------------------------

#[test]
fn test_object_literal_property_access() {
    assert_eq!(
        eval(vec![
            let_("o", object(vec![prop("a", num(1.0)), prop("b", string("x"))])),
            expr(bin("+", member(id("o"), "a"), index(id("o"), string("b")))),
        ]),
        JsValue::from("1x")
    );
}

#[test]
fn test_computed_and_numeric_keys() {
    // let k = "dyn"; let o = { [k + 1]: "c", 7: "n" }; o.dyn1 + o[7]
    let numeric_key = serde_json::json!({
        "type": "Property", "key": {"type": "Literal", "value": 7, "raw": "7"},
        "value": string("n"), "kind": "init", "computed": false, "method": false, "shorthand": false
    });
    assert_eq!(
        eval(vec![
            let_("k", string("dyn")),
            let_(
                "o",
                object(vec![
                    computed_prop(bin("+", id("k"), num(1.0)), string("c")),
                    numeric_key,
                ]),
            ),
            expr(bin("+", member(id("o"), "dyn1"), index(id("o"), num(7.0)))),
        ]),
        JsValue::from("cn")
    );
}

#[test]
fn test_missing_property_is_undefined() {
    assert_eq!(
        eval(vec![expr(member(object(vec![]), "nope"))]),
        JsValue::Undefined
    );
}

#[test]
fn test_read_from_null_is_type_error() {
    assert!(throws_error(
        vec![expr(member(null(), "x"))],
        "Cannot read properties of null (reading 'x')",
    ));
}

#[test]
fn test_write_to_undefined_is_type_error() {
    assert!(throws_error(
        vec![expr(assign("=", member(id("undefined"), "x"), num(1.0)))],
        "Cannot set properties of undefined",
    ));
}

#[test]
fn test_object_spread_copies_own_properties() {
    assert_eq!(
        eval(vec![
            let_("a", object(vec![prop("x", num(1.0)), prop("y", num(2.0))])),
            let_("b", object(vec![spread(id("a")), prop("y", num(20.0))])),
            expr(bin("+", member(id("b"), "x"), member(id("b"), "y"))),
        ]),
        JsValue::Number(21.0)
    );
}

#[test]
fn test_array_literal() {
    assert_eq!(
        eval(vec![
            let_("a", array(vec![num(1.0), serde_json::Value::Null, num(3.0)])),
            expr(template(
                &["", ",", ",", ""],
                vec![
                    member(id("a"), "length"),
                    index(id("a"), num(1.0)),
                    index(id("a"), num(2.0)),
                ],
            )),
        ]),
        JsValue::from("3,undefined,3")
    );
}

#[test]
fn test_array_spread() {
    assert_eq!(
        eval(vec![
            let_("a", array(vec![num(1.0), num(2.0)])),
            let_("b", array(vec![num(0.0), spread(id("a")), spread(string("xy"))])),
            expr(bin("+", member(id("b"), "length"), index(id("b"), num(4.0)))),
        ]),
        JsValue::from("5y")
    );
}

#[test]
fn test_delete_and_in() {
    assert_eq!(
        eval(vec![
            let_("o", object(vec![prop("a", num(1.0))])),
            let_("before", bin("in", string("a"), id("o"))),
            let_("deleted", unary("delete", member(id("o"), "a"))),
            expr(template(
                &["", ",", ",", ""],
                vec![id("before"), id("deleted"), bin("in", string("a"), id("o"))],
            )),
        ]),
        JsValue::from("true,true,false")
    );
}

#[test]
fn test_in_walks_prototype_chain_and_accepts_numbers() {
    assert_eq!(
        eval(vec![expr(bin("in", string("toString"), object(vec![])))]),
        JsValue::Boolean(true)
    );
    assert_eq!(
        eval(vec![expr(bin("in", num(0.0), array(vec![num(5.0)])))]),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_in_requires_object() {
    assert!(throws_error(
        vec![expr(bin("in", string("a"), string("abc")))],
        "Cannot use 'in' operator",
    ));
}

// -----------------------------------------------------------------------------
// Accessors
// -----------------------------------------------------------------------------

#[test]
fn test_getter_receives_receiver() {
    // let o = { _v: 2, get v() { return this._v * 10 } }; o.v
    assert_eq!(
        eval(vec![
            let_(
                "o",
                object(vec![
                    prop("_v", num(2.0)),
                    getter("v", vec![ret(bin("*", member(this(), "_v"), num(10.0)))]),
                ]),
            ),
            expr(member(id("o"), "v")),
        ]),
        JsValue::Number(20.0)
    );
}

#[test]
fn test_setter_receives_receiver() {
    // let o = { set v(x) { this.stored = x * 2 } }; o.v = 5; o.stored
    assert_eq!(
        eval(vec![
            let_(
                "o",
                object(vec![setter(
                    "v",
                    "x",
                    vec![expr(assign(
                        "=",
                        member(this(), "stored"),
                        bin("*", id("x"), num(2.0)),
                    ))],
                )]),
            ),
            expr(assign("=", member(id("o"), "v"), num(5.0))),
            expr(member(id("o"), "stored")),
        ]),
        JsValue::Number(10.0)
    );
}

#[test]
fn test_inherited_setter_runs_with_child_receiver() {
    // let p = { set v(x) { this.own = x } }; let c = Object.create(p); c.v = 1;
    assert_eq!(
        eval(vec![
            let_(
                "p",
                object(vec![setter(
                    "v",
                    "x",
                    vec![expr(assign("=", member(this(), "own"), id("x")))],
                )]),
            ),
            let_("c", call(member(id("Object"), "create"), vec![id("p")])),
            expr(assign("=", member(id("c"), "v"), num(1.0))),
            expr(template(
                &["", ",", ""],
                vec![
                    call(member(id("c"), "hasOwnProperty"), vec![string("own")]),
                    call(member(id("p"), "hasOwnProperty"), vec![string("own")]),
                ],
            )),
        ]),
        JsValue::from("true,false")
    );
}

#[test]
fn test_getter_and_setter_pair() {
    assert_eq!(
        eval(vec![
            let_(
                "o",
                object(vec![
                    prop("_t", num(0.0)),
                    getter("t", vec![ret(member(this(), "_t"))]),
                    setter("t", "v", vec![expr(assign("=", member(this(), "_t"), id("v")))]),
                ]),
            ),
            expr(assign("=", member(id("o"), "t"), num(7.0))),
            expr(member(id("o"), "t")),
        ]),
        JsValue::Number(7.0)
    );
}

#[test]
fn test_getter_only_ignores_writes() {
    assert_eq!(
        eval(vec![
            let_("o", object(vec![getter("g", vec![ret(num(1.0))])])),
            expr(assign("=", member(id("o"), "g"), num(2.0))),
            expr(member(id("o"), "g")),
        ]),
        JsValue::Number(1.0)
    );
}

#[test]
fn test_define_property_accessor() {
    // Object.defineProperty(o, "x", { get: () => 42 })
    assert_eq!(
        eval(vec![
            let_("o", object(vec![])),
            expr(call(
                member(id("Object"), "defineProperty"),
                vec![
                    id("o"),
                    string("x"),
                    object(vec![prop("get", arrow_expr(&[], num(42.0)))]),
                ],
            )),
            expr(member(id("o"), "x")),
        ]),
        JsValue::Number(42.0)
    );
}

#[test]
fn test_define_property_defaults_to_read_only() {
    assert_eq!(
        eval(vec![
            let_("o", object(vec![])),
            expr(call(
                member(id("Object"), "defineProperty"),
                vec![id("o"), string("k"), object(vec![prop("value", num(1.0))])],
            )),
            expr(assign("=", member(id("o"), "k"), num(2.0))),
            expr(member(id("o"), "k")),
        ]),
        JsValue::Number(1.0)
    );
}

// -----------------------------------------------------------------------------
// Prototype chain
// -----------------------------------------------------------------------------

#[test]
fn test_inherited_read() {
    assert_eq!(
        eval(vec![
            let_("p", object(vec![prop("x", num(1.0))])),
            let_("c", call(member(id("Object"), "create"), vec![id("p")])),
            expr(member(id("c"), "x")),
        ]),
        JsValue::Number(1.0)
    );
}

#[test]
fn test_read_through_two_prototype_levels() {
    // let p2 = { deep: "found" }; let p1 = Object.create(p2); let o = Object.create(p1); o.deep
    assert_eq!(
        eval(vec![
            let_("p2", object(vec![prop("deep", string("found"))])),
            let_("p1", call(member(id("Object"), "create"), vec![id("p2")])),
            let_("o", call(member(id("Object"), "create"), vec![id("p1")])),
            expr(template(
                &["", ",", ""],
                vec![
                    member(id("o"), "deep"),
                    call(member(id("o"), "hasOwnProperty"), vec![string("deep")]),
                ],
            )),
        ]),
        JsValue::from("found,false")
    );
}

#[test]
fn test_assignment_shadows_inherited_property() {
    assert_eq!(
        eval(vec![
            let_("p", object(vec![prop("x", num(1.0))])),
            let_("c", call(member(id("Object"), "create"), vec![id("p")])),
            expr(assign("=", member(id("c"), "x"), num(2.0))),
            expr(template(
                &["", ",", ""],
                vec![member(id("p"), "x"), member(id("c"), "x")],
            )),
        ]),
        JsValue::from("1,2")
    );
}

#[test]
fn test_get_prototype_of() {
    assert_eq!(
        eval(vec![
            let_("p", object(vec![])),
            let_("c", call(member(id("Object"), "create"), vec![id("p")])),
            expr(bin(
                "===",
                call(member(id("Object"), "getPrototypeOf"), vec![id("c")]),
                id("p"),
            )),
        ]),
        JsValue::Boolean(true)
    );
}

#[test]
fn test_object_create_null_has_no_methods() {
    assert_eq!(
        eval(vec![
            let_("o", call(member(id("Object"), "create"), vec![null()])),
            expr(unary("typeof", member(id("o"), "toString"))),
        ]),
        JsValue::from("undefined")
    );
}

#[test]
fn test_primitive_wrappers() {
    assert_eq!(
        eval(vec![
            let_("s", new(id("String"), vec![string("hey")])),
            expr(template(
                &["", ",", ",", ""],
                vec![
                    unary("typeof", id("s")),
                    member(id("s"), "length"),
                    call(member(id("s"), "valueOf"), vec![]),
                ],
            )),
        ]),
        JsValue::from("object,3,hey")
    );
}

#[test]
fn test_conversion_functions() {
    assert_eq!(
        eval(vec![expr(call(id("String"), vec![num(12.0)]))]),
        JsValue::from("12")
    );
    assert_eq!(
        eval(vec![expr(call(id("Number"), vec![string("0x10")]))]),
        JsValue::Number(16.0)
    );
    assert_eq!(
        eval(vec![expr(call(id("Boolean"), vec![string("")]))]),
        JsValue::Boolean(false)
    );
    assert_eq!(
        eval(vec![expr(call(member(num(255.0), "toString"), vec![num(16.0)]))]),
        JsValue::from("ff")
    );
}
