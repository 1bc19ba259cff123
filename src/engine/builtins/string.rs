//! String constructor and String.prototype methods

use crate::engine::Engine;
use crate::engine::builtins::arg;
use crate::error::JsError;
use crate::value::{CheapClone, ExoticObject, JsObjectRef, JsString, JsValue};

pub fn init_string(engine: &mut Engine) {
    let proto = engine.string_prototype.cheap_clone();
    engine.register_method(&proto, "toString", string_to_string);
    engine.register_method(&proto, "valueOf", string_to_string);

    let constructor = engine.create_native_constructor("String", string_constructor, &proto);
    engine.add_global("String", JsValue::Object(constructor));
}

/// `String(value)` converts; `new String(value)` boxes
pub fn string_constructor(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let value = if args.is_empty() {
        JsString::default()
    } else {
        engine.to_string(&arg(args, 0))?
    };
    match new_target {
        Some(receiver) => {
            receiver.borrow_mut().exotic = ExoticObject::Primitive(JsValue::String(value));
            Ok(JsValue::Undefined)
        }
        None => Ok(JsValue::String(value)),
    }
}

fn this_string_value(this: &JsValue) -> Option<JsString> {
    match this {
        JsValue::String(s) => Some(s.cheap_clone()),
        JsValue::Object(obj) => match &obj.borrow().exotic {
            ExoticObject::Primitive(JsValue::String(s)) => Some(s.cheap_clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Shared by `toString` and `valueOf`
pub fn string_to_string(
    _engine: &Engine,
    this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    this_string_value(&this)
        .map(JsValue::String)
        .ok_or_else(|| JsError::type_error("String.prototype.valueOf requires that 'this' be a String"))
}
