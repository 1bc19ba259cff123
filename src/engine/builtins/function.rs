//! Function constructor and Function.prototype methods (call, apply)

use crate::engine::Engine;
use crate::engine::builtins::arg;
use crate::error::JsError;
use crate::value::{CheapClone, JsObjectRef, JsValue};

pub fn init_function(engine: &mut Engine) {
    let proto = engine.function_prototype.cheap_clone();
    engine.register_method(&proto, "call", function_call);
    engine.register_method(&proto, "apply", function_apply);

    let constructor = engine.create_native_constructor("Function", function_constructor, &proto);
    engine.add_global("Function", JsValue::Object(constructor));
}

/// Building functions from source text needs a parser, which this crate
/// deliberately does not carry
pub fn function_constructor(
    engine: &Engine,
    _this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    Err(engine.unsupported("Function constructor (no source parser available)"))
}

/// `fn.call(thisArg, ...args)`
pub fn function_call(
    engine: &Engine,
    this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let this_arg = arg(args, 0);
    let rest = args.get(1..).unwrap_or_default();
    engine.execute_function(&this, this_arg, rest, None)
}

/// `fn.apply(thisArg, argsArray)`
pub fn function_apply(
    engine: &Engine,
    this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let this_arg = arg(args, 0);
    let call_args = match arg(args, 1) {
        JsValue::Undefined | JsValue::Null => Vec::new(),
        list @ JsValue::Object(_) => engine.array_like_to_vec(&list)?,
        _ => {
            return Err(JsError::type_error(
                "CreateListFromArrayLike called on non-object",
            ));
        }
    };
    engine.execute_function(&this, this_arg, &call_args, None)
}
