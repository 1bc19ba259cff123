//! Built-in function implementations for the standard globals

pub mod array;
pub mod boolean;
pub mod console;
pub mod error;
pub mod function;
pub mod number;
pub mod object;
pub mod string;
pub mod symbol;

use super::Engine;
use crate::value::JsValue;

/// Install prototypes methods and global bindings
pub(crate) fn init(engine: &mut Engine) {
    object::init_object(engine);
    function::init_function(engine);
    array::init_array(engine);
    string::init_string(engine);
    number::init_number(engine);
    boolean::init_boolean(engine);
    symbol::init_symbol(engine);
    error::init_error(engine);
    console::init_console(engine);

    engine.add_constant("undefined", JsValue::Undefined);
    engine.add_constant("NaN", JsValue::Number(f64::NAN));
    engine.add_constant("Infinity", JsValue::Number(f64::INFINITY));
}

/// Argument at `index`, or undefined when absent
pub(crate) fn arg(args: &[JsValue], index: usize) -> JsValue {
    args.get(index).cloned().unwrap_or_default()
}
