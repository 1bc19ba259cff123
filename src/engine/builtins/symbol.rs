//! Symbol constructor placeholder; symbols are not a value type here

use crate::engine::Engine;
use crate::error::JsError;
use crate::value::{JsObjectRef, JsValue};

pub fn init_symbol(engine: &mut Engine) {
    let constructor = engine.create_native_function("Symbol", symbol_constructor, true);
    engine.add_global("Symbol", JsValue::Object(constructor));
}

pub fn symbol_constructor(
    _engine: &Engine,
    _this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    tracing::warn!("Symbol constructor is a stub and returns undefined");
    Ok(JsValue::Undefined)
}
