//! Type coercions (ToBoolean, ToNumber, ToString, ToPrimitive) and equality

use super::Engine;
use crate::error::JsError;
use crate::value::{CheapClone, ExoticObject, JsObject, JsObjectRef, JsString, JsValue, new_object_ref};

/// Conversion hint for ToPrimitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    /// valueOf first
    Number,
    /// toString first
    String,
}

impl Engine {
    pub fn to_boolean(&self, value: &JsValue) -> bool {
        value.to_boolean()
    }

    /// ToPrimitive: call `valueOf`/`toString` (order per hint) until one
    /// returns a primitive
    pub fn to_primitive(&self, value: &JsValue, hint: PreferredType) -> Result<JsValue, JsError> {
        let JsValue::Object(obj) = value else {
            return Ok(value.clone());
        };
        let order = match hint {
            PreferredType::Number => ["valueOf", "toString"],
            PreferredType::String => ["toString", "valueOf"],
        };
        for name in order {
            let method = self.read_property(obj, name, value)?;
            if self.is_callable(&method) {
                let result = self.execute_function(&method, value.clone(), &[], None)?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
        Err(JsError::type_error("Cannot convert object to primitive value"))
    }

    pub fn to_number(&self, value: &JsValue) -> Result<f64, JsError> {
        match value {
            JsValue::Object(_) => {
                let primitive = self.to_primitive(value, PreferredType::Number)?;
                Ok(primitive_to_number(&primitive))
            }
            primitive => Ok(primitive_to_number(primitive)),
        }
    }

    pub fn to_string(&self, value: &JsValue) -> Result<JsString, JsError> {
        match value {
            JsValue::String(s) => Ok(s.cheap_clone()),
            JsValue::Object(_) => {
                let primitive = self.to_primitive(value, PreferredType::String)?;
                Ok(primitive_to_string(&primitive))
            }
            primitive => Ok(primitive_to_string(primitive)),
        }
    }

    /// Property keys are strings
    pub fn to_property_key(&self, value: &JsValue) -> Result<JsString, JsError> {
        self.to_string(value)
    }

    pub fn to_int32(&self, value: &JsValue) -> Result<i32, JsError> {
        Ok(to_uint32(self.to_number(value)?) as i32)
    }

    pub fn to_uint32(&self, value: &JsValue) -> Result<u32, JsError> {
        Ok(to_uint32(self.to_number(value)?))
    }

    /// Box a primitive; null and undefined have no object form
    pub fn to_object(&self, value: &JsValue) -> Result<JsObjectRef, JsError> {
        let prototype = match value {
            JsValue::Object(obj) => return Ok(obj.cheap_clone()),
            JsValue::Undefined | JsValue::Null => {
                return Err(JsError::type_error(
                    "Cannot convert undefined or null to object",
                ));
            }
            JsValue::Boolean(_) => &self.boolean_prototype,
            JsValue::Number(_) => &self.number_prototype,
            JsValue::String(_) => &self.string_prototype,
        };
        let mut wrapper = JsObject::with_prototype(prototype.cheap_clone());
        wrapper.exotic = ExoticObject::Primitive(value.clone());
        Ok(new_object_ref(wrapper))
    }

    /// The `typeof` operator
    pub fn type_of(&self, value: &JsValue) -> &'static str {
        match value {
            JsValue::Undefined => "undefined",
            JsValue::Null => "object",
            JsValue::Boolean(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
            JsValue::Object(obj) => {
                if self.is_function(obj) {
                    "function"
                } else {
                    "object"
                }
            }
        }
    }

    /// Abstract equality (==)
    pub fn loose_equals(&self, left: &JsValue, right: &JsValue) -> Result<bool, JsError> {
        let mut left = left.clone();
        let mut right = right.clone();
        loop {
            let (next_left, next_right) = match (&left, &right) {
                (JsValue::Undefined | JsValue::Null, JsValue::Undefined | JsValue::Null) => {
                    return Ok(true);
                }
                (JsValue::Undefined | JsValue::Null, _) | (_, JsValue::Undefined | JsValue::Null) => {
                    return Ok(false);
                }
                (JsValue::Number(a), JsValue::String(b)) => {
                    return Ok(*a == string_to_number(b.as_str()));
                }
                (JsValue::String(a), JsValue::Number(b)) => {
                    return Ok(string_to_number(a.as_str()) == *b);
                }
                (JsValue::Boolean(b), _) => (JsValue::Number(bool_to_number(*b)), right.clone()),
                (_, JsValue::Boolean(b)) => (left.clone(), JsValue::Number(bool_to_number(*b))),
                (JsValue::Object(_), JsValue::Object(_)) => return Ok(left.strict_equals(&right)),
                (JsValue::Object(_), _) => {
                    (self.to_primitive(&left, PreferredType::Number)?, right.clone())
                }
                (_, JsValue::Object(_)) => {
                    (left.clone(), self.to_primitive(&right, PreferredType::Number)?)
                }
                _ => return Ok(left.strict_equals(&right)),
            };
            left = next_left;
            right = next_right;
        }
    }
}

fn bool_to_number(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// ToNumber for values that are already primitive; objects yield NaN
pub fn primitive_to_number(value: &JsValue) -> f64 {
    match value {
        JsValue::Undefined => f64::NAN,
        JsValue::Null => 0.0,
        JsValue::Boolean(b) => bool_to_number(*b),
        JsValue::Number(n) => *n,
        JsValue::String(s) => string_to_number(s.as_str()),
        JsValue::Object(_) => f64::NAN,
    }
}

/// ToString for values that are already primitive
pub fn primitive_to_string(value: &JsValue) -> JsString {
    match value {
        JsValue::Undefined => JsString::from("undefined"),
        JsValue::Null => JsString::from("null"),
        JsValue::Boolean(true) => JsString::from("true"),
        JsValue::Boolean(false) => JsString::from("false"),
        JsValue::Number(n) => JsString::from(number_to_string(*n)),
        JsValue::String(s) => s.cheap_clone(),
        JsValue::Object(_) => JsString::from("[object Object]"),
    }
}

/// Constructor name of a primitive's wrapper
pub fn primitive_class(value: &JsValue) -> &'static str {
    match value {
        JsValue::Boolean(_) => "Boolean",
        JsValue::Number(_) => "Number",
        JsValue::String(_) => "String",
        JsValue::Undefined => "Undefined",
        JsValue::Null => "Null",
        JsValue::Object(_) => "Object",
    }
}

/// ToUint32: modulo 2^32 after truncation; NaN and infinities become 0
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// Number::toString(10) with the shortest round-tripping digits
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    // Rust's `{:e}` yields the shortest digits that round-trip: "d.ddde-x"
    let scientific = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{}{}", sign, scientific);
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the digit string
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let split = point as usize;
        let int_part = digits.get(..split).unwrap_or_default();
        let frac_part = digits.get(split..).unwrap_or_default();
        format!("{}.{}", int_part, frac_part)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let exp = point - 1;
        let exp_sign = if exp >= 0 { '+' } else { '-' };
        let first = digits.get(..1).unwrap_or("0");
        let rest = digits.get(1..).unwrap_or_default();
        if rest.is_empty() {
            format!("{}e{}{}", first, exp_sign, exp.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, exp_sign, exp.abs())
        }
    };
    format!("{}{}", sign, body)
}

/// StringToNumber: whitespace-trimmed decimal, `Infinity`, or a 0x/0o/0b
/// integer; the empty string is 0 and anything else is NaN
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(digits) = prefixes.iter().find_map(|p| trimmed.strip_prefix(p)) {
            return parse_radix_integer(digits, radix);
        }
    }

    // Rust's float grammar also admits "inf" and "nan"; JS does not
    let is_decimal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_integer(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}
