//! Console output: the global `log` function and the `console` object

use crate::engine::Engine;
use crate::error::JsError;
use crate::platform::ConsoleLevel;
use crate::value::{JsObjectRef, JsValue};

pub fn init_console(engine: &mut Engine) {
    let log = engine.create_native_function("log", console_log, false);
    engine.add_global("log", JsValue::Object(log));

    let console = engine.create_object();
    engine.register_method(&console, "log", console_log);
    engine.register_method(&console, "info", console_info);
    engine.register_method(&console, "debug", console_debug);
    engine.register_method(&console, "warn", console_warn);
    engine.register_method(&console, "error", console_error);
    engine.add_global("console", JsValue::Object(console));
}

/// Stringify each argument and emit them space-separated
fn write_args(engine: &Engine, level: ConsoleLevel, args: &[JsValue]) -> Result<JsValue, JsError> {
    let parts = args
        .iter()
        .map(|value| engine.to_string(value).map(|s| s.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    engine.console().write(level, &parts.join(" "));
    Ok(JsValue::Undefined)
}

pub fn console_log(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    write_args(engine, ConsoleLevel::Log, args)
}

pub fn console_info(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    write_args(engine, ConsoleLevel::Info, args)
}

pub fn console_debug(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    write_args(engine, ConsoleLevel::Debug, args)
}

pub fn console_warn(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    write_args(engine, ConsoleLevel::Warn, args)
}

pub fn console_error(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    write_args(engine, ConsoleLevel::Error, args)
}
