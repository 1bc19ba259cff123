//! Number constructor and Number.prototype methods

use crate::engine::builtins::arg;
use crate::engine::{Engine, number_to_string};
use crate::error::JsError;
use crate::value::{CheapClone, ExoticObject, JsObjectRef, JsValue};

pub fn init_number(engine: &mut Engine) {
    let proto = engine.number_prototype.cheap_clone();
    engine.register_method(&proto, "toString", number_to_string_method);
    engine.register_method(&proto, "valueOf", number_value_of);

    let constructor = engine.create_native_constructor("Number", number_constructor, &proto);
    engine.add_global("Number", JsValue::Object(constructor));
}

pub fn number_constructor(
    engine: &Engine,
    _this: JsValue,
    args: &[JsValue],
    new_target: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let value = if args.is_empty() {
        JsValue::Number(0.0)
    } else {
        JsValue::Number(engine.to_number(&arg(args, 0))?)
    };
    match new_target {
        Some(receiver) => {
            receiver.borrow_mut().exotic = ExoticObject::Primitive(value);
            Ok(JsValue::Undefined)
        }
        None => Ok(value),
    }
}

fn this_number_value(this: &JsValue) -> Result<f64, JsError> {
    let value = match this {
        JsValue::Number(n) => Some(*n),
        JsValue::Object(obj) => match &obj.borrow().exotic {
            ExoticObject::Primitive(JsValue::Number(n)) => Some(*n),
            _ => None,
        },
        _ => None,
    };
    value.ok_or_else(|| {
        JsError::type_error("Number.prototype.valueOf requires that 'this' be a Number")
    })
}

/// `num.toString(radix?)`
pub fn number_to_string_method(
    engine: &Engine,
    this: JsValue,
    args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    let n = this_number_value(&this)?;
    let radix = match arg(args, 0) {
        JsValue::Undefined => 10.0,
        value => engine.to_number(&value)?.trunc(),
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err(JsError::range_error(
            "toString() radix must be between 2 and 36",
        ));
    }
    let radix = radix as u32;
    if radix == 10 || !n.is_finite() {
        return Ok(JsValue::from(number_to_string(n)));
    }
    Ok(JsValue::from(number_to_radix_string(n, radix)))
}

pub fn number_value_of(
    _engine: &Engine,
    this: JsValue,
    _args: &[JsValue],
    _: Option<&JsObjectRef>,
) -> Result<JsValue, JsError> {
    Ok(JsValue::Number(this_number_value(&this)?))
}

/// Finite `n` in a non-decimal radix; fractions stop after 52 digits
fn number_to_radix_string(n: f64, radix: u32) -> String {
    let negative = n < 0.0;
    let n = n.abs();
    let mut int_part = n.trunc();
    let mut frac_part = n - int_part;

    let mut int_digits = Vec::new();
    loop {
        let digit = (int_part % f64::from(radix)) as u32;
        int_digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        int_part = (int_part / f64::from(radix)).trunc();
        if int_part < 1.0 {
            break;
        }
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.extend(int_digits.iter().rev());

    if frac_part > 0.0 {
        out.push('.');
        for _ in 0..52 {
            frac_part *= f64::from(radix);
            let digit = frac_part.trunc() as u32;
            out.push(std::char::from_digit(digit, radix).unwrap_or('0'));
            frac_part -= frac_part.trunc();
            if frac_part == 0.0 {
                break;
            }
        }
    }
    out
}
