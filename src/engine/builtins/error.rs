//! Error constructors and Error.prototype methods

use crate::engine::builtins::arg;
use crate::engine::{Engine, ErrorKind};
use crate::error::JsError;
use crate::value::{CheapClone, JsObjectRef, JsString, JsValue, PropertyDescriptor};

/// Install Error and the derived error constructors
pub fn init_error(engine: &mut Engine) {
    let error_proto = engine.error_prototype.cheap_clone();
    engine.register_method(&error_proto, "toString", error_to_string);

    let constructors: [(ErrorKind, crate::value::NativeFn); 4] = [
        (ErrorKind::Error, error_constructor),
        (ErrorKind::TypeError, type_error_constructor),
        (ErrorKind::ReferenceError, reference_error_constructor),
        (ErrorKind::RangeError, range_error_constructor),
    ];
    for (kind, func) in constructors {
        let proto = engine.error_prototype_for(kind).cheap_clone();
        {
            let mut p = proto.borrow_mut();
            p.set_data("name", JsValue::from(kind.name()));
            p.set_data("message", JsValue::from(""));
        }
        let constructor = engine.create_native_constructor(kind.name(), func, &proto);
        engine.add_global(kind.name(), JsValue::Object(constructor));
    }
}

/// Shared body of the error constructors
///
/// With `new` the receiver is initialized in place; a plain call creates
/// the object itself.
fn construct_error(
    engine: &Engine,
    kind: ErrorKind,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let message = match arg(args, 0) {
        JsValue::Undefined => None,
        value => Some(engine.to_string(&value)?),
    };

    let Some(receiver) = new_target else {
        let message = message.unwrap_or_default();
        return Ok(JsValue::Object(engine.create_error(kind, message.as_str())));
    };

    let mut stack = kind.name().to_string();
    if let Some(message) = &message {
        stack.push_str(": ");
        stack.push_str(message.as_str());
    }
    for frame in engine.stack_trace().iter().skip(1) {
        stack.push('\n');
        stack.push_str(&frame.to_string());
    }

    let mut obj = receiver.borrow_mut();
    if let Some(message) = message {
        obj.set_data("message", JsValue::String(message));
    }
    obj.define_property("stack", PropertyDescriptor::data(JsValue::from(stack)));
    Ok(JsValue::Undefined)
}

pub fn error_constructor(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    construct_error(engine, ErrorKind::Error, args, new_target)
}

pub fn type_error_constructor(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    construct_error(engine, ErrorKind::TypeError, args, new_target)
}

pub fn reference_error_constructor(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    construct_error(engine, ErrorKind::ReferenceError, args, new_target)
}

pub fn range_error_constructor(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    construct_error(engine, ErrorKind::RangeError, args, new_target)
}

/// `err.toString()`: "name: message", dropping whichever part is empty
pub fn error_to_string(
    engine: &Engine,
    this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let JsValue::Object(obj) = &this else {
        return Err(JsError::type_error(
            "Error.prototype.toString requires that 'this' be an Object",
        ));
    };

    let name = match engine.read_property(obj, "name", &this)? {
        JsValue::Undefined => JsString::from("Error"),
        value => engine.to_string(&value)?,
    };
    let message = match engine.read_property(obj, "message", &this)? {
        JsValue::Undefined => JsString::default(),
        value => engine.to_string(&value)?,
    };

    let text = if message.is_empty() {
        name
    } else if name.is_empty() {
        message
    } else {
        JsString::from(format!("{}: {}", name, message))
    };
    Ok(JsValue::String(text))
}
