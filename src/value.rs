//! JavaScript value representation
//!
//! The core JsValue type and related structures for representing JavaScript values at runtime.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::ast::{self, SourceLocation};
use crate::engine::Engine;
use crate::error::JsError;
use crate::scope::Scope;

/// Trait for types that have cheap (O(1), reference-counted) clones.
///
/// This makes it explicit when a clone only increments a reference count
/// instead of copying data.
pub trait CheapClone: Clone {
    /// Create a cheap (reference-counted) clone of this value.
    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}

// Rc<RefCell<T>> is covered by this
impl<T: ?Sized> CheapClone for Rc<T> {}

/// A JavaScript value
#[derive(Clone, Default)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
    Object(JsObjectRef),
}

impl JsValue {
    /// Check if this value is null or undefined
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, JsValue::Null | JsValue::Undefined)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsValue::Object(_))
    }

    pub fn as_object(&self) -> Option<&JsObjectRef> {
        match self {
            JsValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Convert to boolean (ToBoolean)
    pub fn to_boolean(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Boolean(b) => *b,
            JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
            JsValue::String(s) => !s.is_empty(),
            JsValue::Object(_) => true,
        }
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Null, JsValue::Null) => true,
            (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
            // NaN !== NaN falls out of IEEE comparison
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (JsValue::String(a), JsValue::String(b)) => a == b,
            (JsValue::Object(a), JsValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "undefined"),
            JsValue::Null => write!(f, "null"),
            JsValue::Boolean(b) => write!(f, "{}", b),
            JsValue::Number(n) => write!(f, "{}", n),
            JsValue::String(s) => write!(f, "\"{}\"", s.as_str()),
            JsValue::Object(obj) => {
                // Debug output must not panic while the object is mutably borrowed
                let Ok(obj) = obj.try_borrow() else {
                    return write!(f, "{{<borrowed>}}");
                };
                match &obj.exotic {
                    ExoticObject::Ordinary => write!(f, "{{...}}"),
                    ExoticObject::Function(func) => {
                        write!(f, "[Function: {}]", func.name().unwrap_or("anonymous"))
                    }
                    ExoticObject::Primitive(inner) => write!(f, "[{:?}]", inner),
                    ExoticObject::Host(host) => write!(f, "{:?}", host),
                }
            }
        }
    }
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

// Conversions from Rust types

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Boolean(b)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        JsValue::Number(n)
    }
}

impl From<i32> for JsValue {
    fn from(n: i32) -> Self {
        JsValue::Number(n as f64)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(JsString::from(s))
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::String(JsString::from(s))
    }
}

impl From<JsString> for JsValue {
    fn from(s: JsString) -> Self {
        JsValue::String(s)
    }
}

impl From<JsObjectRef> for JsValue {
    fn from(obj: JsObjectRef) -> Self {
        JsValue::Object(obj)
    }
}

/// Reference-counted string for efficient string handling
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsString(Rc<str>);

// JsString wraps Rc<str>, so clone is cheap (just reference count increment)
impl CheapClone for JsString {}

impl JsString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in UTF-16 code units, as observed by scripts
    pub fn utf16_len(&self) -> usize {
        self.0.encode_utf16().count()
    }

    /// The UTF-16 code unit at `index` as a one-unit string
    pub fn code_unit_at(&self, index: usize) -> Option<JsString> {
        self.0
            .encode_utf16()
            .nth(index)
            .map(|unit| JsString::from(String::from_utf16_lossy(&[unit])))
    }
}

impl std::ops::Deref for JsString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JsString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for JsString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JsString {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for JsString {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString(s.into())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString(s.into())
    }
}

impl<'de> Deserialize<'de> for JsString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(JsString::from)
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add<&JsString> for JsString {
    type Output = JsString;

    fn add(self, other: &JsString) -> JsString {
        let mut s = String::with_capacity(self.0.len() + other.0.len());
        s.push_str(&self.0);
        s.push_str(&other.0);
        JsString::from(s)
    }
}

/// Reference to a heap-allocated object
pub type JsObjectRef = Rc<RefCell<JsObject>>;

/// Allocate an object and wrap it in a reference
pub fn new_object_ref(object: JsObject) -> JsObjectRef {
    Rc::new(RefCell::new(object))
}

/// A JavaScript object
#[derive(Debug)]
pub struct JsObject {
    /// Prototype link
    pub prototype: Option<JsObjectRef>,
    /// Static property table, in insertion order
    pub properties: IndexMap<JsString, PropertyDescriptor>,
    /// Exotic object behavior
    pub exotic: ExoticObject,
}

impl JsObject {
    /// Create a new ordinary object with no prototype
    pub fn new() -> Self {
        Self {
            prototype: None,
            properties: IndexMap::new(),
            exotic: ExoticObject::Ordinary,
        }
    }

    /// Create a new ordinary object with a prototype
    pub fn with_prototype(prototype: JsObjectRef) -> Self {
        Self {
            prototype: Some(prototype),
            ..Self::new()
        }
    }

    /// Check if this object carries an invoke behavior
    pub fn is_callable(&self) -> bool {
        matches!(self.exotic, ExoticObject::Function(_))
    }

    pub fn as_function(&self) -> Option<&JsFunction> {
        match &self.exotic {
            ExoticObject::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Own property lookup: the exotic hook wins, then the static table
    pub fn own_property(&self, key: &str) -> Option<PropertyDescriptor> {
        self.exotic
            .own_property(key)
            .or_else(|| self.properties.get(key).cloned())
    }

    /// Define (or replace) a property in the static table
    pub fn define_property(&mut self, key: impl Into<JsString>, prop: PropertyDescriptor) {
        self.properties.insert(key.into(), prop);
    }

    /// Convenience for defining a writable data property
    pub fn set_data(&mut self, key: impl Into<JsString>, value: JsValue) {
        self.define_property(key, PropertyDescriptor::data(value));
    }
}

impl Default for JsObject {
    fn default() -> Self {
        Self::new()
    }
}

/// Object property descriptor
#[derive(Debug, Clone)]
pub enum PropertyDescriptor {
    Data { value: JsValue, writable: bool },
    /// Getter/setter pair; an `Undefined` slot means the accessor is absent
    Accessor { getter: JsValue, setter: JsValue },
}

impl PropertyDescriptor {
    pub fn data(value: JsValue) -> Self {
        PropertyDescriptor::Data {
            value,
            writable: true,
        }
    }

    pub fn data_readonly(value: JsValue) -> Self {
        PropertyDescriptor::Data {
            value,
            writable: false,
        }
    }

    pub fn accessor(getter: JsValue, setter: JsValue) -> Self {
        PropertyDescriptor::Accessor { getter, setter }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, PropertyDescriptor::Accessor { .. })
    }
}

/// Host-provided object whose own properties are computed on demand
pub trait HostObject: fmt::Debug {
    fn own_property(&self, key: &str) -> Option<PropertyDescriptor>;
}

/// Exotic object behavior
#[derive(Debug)]
pub enum ExoticObject {
    /// Ordinary object
    Ordinary,
    /// Function exotic object
    Function(JsFunction),
    /// Boxed primitive created by `new String(..)`, `new Number(..)`, ...
    Primitive(JsValue),
    /// Embedder object answering own property queries itself
    Host(Box<dyn HostObject>),
}

impl ExoticObject {
    /// Dynamically computed own property, consulted before the static table
    pub fn own_property(&self, key: &str) -> Option<PropertyDescriptor> {
        match self {
            ExoticObject::Primitive(JsValue::String(s)) => string_own_property(s, key),
            ExoticObject::Host(host) => host.own_property(key),
            _ => None,
        }
    }
}

/// `length` and index properties every string value exposes
pub fn string_own_property(s: &JsString, key: &str) -> Option<PropertyDescriptor> {
    if key == "length" {
        return Some(PropertyDescriptor::data_readonly(JsValue::Number(
            s.utf16_len() as f64,
        )));
    }
    let index = parse_array_index(key)?;
    s.code_unit_at(index)
        .map(|unit| PropertyDescriptor::data_readonly(JsValue::String(unit)))
}

/// Canonical array index: digits only, no leading zeros
pub fn parse_array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Native function signature
///
/// Arguments: engine, receiver, arguments, and the object under construction
/// when invoked through `new`.
pub type NativeFn =
    fn(&Engine, JsValue, &[JsValue], Option<&JsObjectRef>) -> Result<JsValue, JsError>;

/// Function representation
#[derive(Debug, Clone)]
pub enum JsFunction {
    /// User-defined function
    Interpreted(Rc<InterpretedFunction>),
    /// Native Rust function
    Native(NativeFunction),
}

impl JsFunction {
    pub fn name(&self) -> Option<&str> {
        match self {
            JsFunction::Interpreted(f) => f.name.as_ref().map(|s| s.as_str()),
            JsFunction::Native(f) => Some(f.name),
        }
    }

    /// Whether `new` may be applied to this function
    pub fn is_constructor(&self) -> bool {
        match self {
            JsFunction::Interpreted(f) => !f.is_arrow,
            JsFunction::Native(f) => f.constructor,
        }
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            JsFunction::Interpreted(f) => f.node.loc,
            JsFunction::Native(_) => None,
        }
    }
}

/// User-defined function
#[derive(Debug)]
pub struct InterpretedFunction {
    pub name: Option<JsString>,
    /// Shared syntax node; parameters and body are read from here on each call
    pub node: Rc<ast::Function>,
    /// The captured defining scope
    pub closure: Scope,
    /// Arrows take `this` from `closure` instead of the call site
    pub is_arrow: bool,
}

/// Native function wrapper
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
    pub constructor: bool,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// Variable binding
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: JsValue,
    pub mutable: bool,
}
