//! Object constructor and Object.prototype methods

use std::rc::Rc;

use crate::engine::Engine;
use crate::engine::builtins::arg;
use crate::error::JsError;
use crate::value::{
    CheapClone, JsObject, JsObjectRef, JsValue, PropertyDescriptor, new_object_ref,
    string_own_property,
};

pub fn init_object(engine: &mut Engine) {
    let proto = engine.object_prototype.cheap_clone();
    engine.register_method(&proto, "hasOwnProperty", object_has_own_property);
    engine.register_method(&proto, "toString", object_to_string);
    engine.register_method(&proto, "valueOf", object_value_of);

    let constructor = engine.create_native_constructor("Object", object_constructor, &proto);
    engine.register_method(&constructor, "create", object_create);
    engine.register_method(&constructor, "getPrototypeOf", object_get_prototype_of);
    engine.register_method(&constructor, "defineProperty", object_define_property);

    engine.add_global("Object", JsValue::Object(constructor));
}

/// `Object(value)` / `new Object(value)`
pub fn object_constructor(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    match arg(args, 0) {
        JsValue::Undefined | JsValue::Null => match new_target {
            // the fresh receiver already inherits from Object.prototype
            Some(_) => Ok(JsValue::Undefined),
            None => Ok(JsValue::Object(engine.create_object())),
        },
        value => Ok(JsValue::Object(engine.to_object(&value)?)),
    }
}

pub fn object_has_own_property(
    engine: &Engine,
    this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let key = engine.to_property_key(&arg(args, 0))?;
    let found = match &this {
        JsValue::Object(obj) => engine.get_own_property_descriptor(obj, &key).is_some(),
        JsValue::String(s) => string_own_property(s, &key).is_some(),
        JsValue::Undefined | JsValue::Null => {
            return Err(JsError::type_error(
                "Cannot convert undefined or null to object",
            ));
        }
        _ => false,
    };
    Ok(JsValue::Boolean(found))
}

pub fn object_to_string(
    engine: &Engine,
    this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let tag = match &this {
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        JsValue::Boolean(_) => "Boolean",
        JsValue::Number(_) => "Number",
        JsValue::String(_) => "String",
        JsValue::Object(obj) => {
            if engine.is_function(obj) {
                "Function"
            } else {
                let proto = obj.borrow().prototype.clone();
                match proto {
                    Some(p) if Rc::ptr_eq(&p, &engine.array_prototype) => "Array",
                    Some(p) if Rc::ptr_eq(&p, &engine.error_prototype) => "Error",
                    _ => "Object",
                }
            }
        }
    };
    Ok(JsValue::from(format!("[object {}]", tag)))
}

pub fn object_value_of(
    engine: &Engine,
    this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    Ok(JsValue::Object(engine.to_object(&this)?))
}

/// `Object.create(proto)`
pub fn object_create(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let prototype = match arg(args, 0) {
        JsValue::Null => None,
        JsValue::Object(proto) => Some(proto),
        other => {
            return Err(JsError::type_error(format!(
                "Object prototype may only be an Object or null: {}",
                engine.describe_value(&other)
            )));
        }
    };
    let mut object = JsObject::new();
    object.prototype = prototype;
    Ok(JsValue::Object(new_object_ref(object)))
}

/// `Object.getPrototypeOf(value)`
pub fn object_get_prototype_of(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let obj = engine.to_object(&arg(args, 0))?;
    let prototype = obj.borrow().prototype.clone();
    Ok(prototype.map(JsValue::Object).unwrap_or(JsValue::Null))
}

/// `Object.defineProperty(obj, key, descriptor)`
///
/// A descriptor with `get` or `set` defines an accessor; otherwise a data
/// property whose `writable` defaults to false.
pub fn object_define_property(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let target = arg(args, 0);
    let JsValue::Object(obj) = &target else {
        return Err(JsError::type_error(
            "Object.defineProperty called on non-object",
        ));
    };
    let key = engine.to_property_key(&arg(args, 1))?;
    let attributes = arg(args, 2);
    let JsValue::Object(attrs) = &attributes else {
        return Err(JsError::type_error(format!(
            "Property description must be an object: {}",
            engine.describe_value(&attributes)
        )));
    };

    let has = |name: &str| engine.get_property_descriptor(attrs, name).is_some();
    let descriptor = if has("get") || has("set") {
        if has("value") || has("writable") {
            return Err(JsError::type_error(
                "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
            ));
        }
        let getter = engine.read_property(attrs, "get", &attributes)?;
        let setter = engine.read_property(attrs, "set", &attributes)?;
        for (kind, accessor) in [("Getter", &getter), ("Setter", &setter)] {
            if !matches!(accessor, JsValue::Undefined) && !engine.is_callable(accessor) {
                return Err(JsError::type_error(format!(
                    "{} must be a function: {}",
                    kind,
                    engine.describe_value(accessor)
                )));
            }
        }
        PropertyDescriptor::accessor(getter, setter)
    } else {
        PropertyDescriptor::Data {
            value: engine.read_property(attrs, "value", &attributes)?,
            writable: engine.read_property(attrs, "writable", &attributes)?.to_boolean(),
        }
    };

    engine.define_property(obj, key, descriptor);
    Ok(target)
}
