//! Boolean constructor and Boolean.prototype methods

use crate::engine::Engine;
use crate::engine::builtins::arg;
use crate::error::JsError;
use crate::value::{CheapClone, ExoticObject, JsObjectRef, JsValue};

pub fn init_boolean(engine: &mut Engine) {
    let proto = engine.boolean_prototype.cheap_clone();
    engine.register_method(&proto, "toString", boolean_to_string);
    engine.register_method(&proto, "valueOf", boolean_value_of);

    let constructor = engine.create_native_constructor("Boolean", boolean_constructor, &proto);
    engine.add_global("Boolean", JsValue::Object(constructor));
}

pub fn boolean_constructor(
    _engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let value = JsValue::Boolean(arg(args, 0).to_boolean());
    match new_target {
        Some(receiver) => {
            receiver.borrow_mut().exotic = ExoticObject::Primitive(value);
            Ok(JsValue::Undefined)
        }
        None => Ok(value),
    }
}

fn this_boolean_value(this: &JsValue) -> Result<bool, JsError> {
    let value = match this {
        JsValue::Boolean(b) => Some(*b),
        JsValue::Object(obj) => match &obj.borrow().exotic {
            ExoticObject::Primitive(JsValue::Boolean(b)) => Some(*b),
            _ => None,
        },
        _ => None,
    };
    value.ok_or_else(|| {
        JsError::type_error("Boolean.prototype.valueOf requires that 'this' be a Boolean")
    })
}

pub fn boolean_to_string(
    _engine: &Engine,
    this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let b = this_boolean_value(&this)?;
    Ok(JsValue::from(if b { "true" } else { "false" }))
}

pub fn boolean_value_of(
    _engine: &Engine,
    this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(this_boolean_value(&this)?))
}
