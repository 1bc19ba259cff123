//! Array constructor
//!
//! Array literals are plain objects inheriting from Array.prototype; the
//! constructor itself is a placeholder.

use crate::engine::Engine;
use crate::error::JsError;
use crate::value::{CheapClone, JsObjectRef, JsValue};

pub fn init_array(engine: &mut Engine) {
    let proto = engine.array_prototype.cheap_clone();
    let constructor = engine.create_native_constructor("Array", array_constructor, &proto);
    engine.add_global("Array", JsValue::Object(constructor));
}

pub fn array_constructor(
    _engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    tracing::warn!(args = args.len(), "Array constructor is a stub and returns undefined");
    Ok(JsValue::Undefined)
}
