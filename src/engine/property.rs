//! Property resolution along the prototype chain

use super::Engine;
use crate::error::JsError;
use crate::value::{
    CheapClone, JsObjectRef, JsString, JsValue, PropertyDescriptor, string_own_property,
};

impl Engine {
    /// Own property of `obj`: exotic hook first, then the static table
    pub fn get_own_property_descriptor(
        &self,
        obj: &JsObjectRef,
        key: &str,
    ) -> Option<PropertyDescriptor> {
        obj.borrow().own_property(key)
    }

    /// First descriptor for `key` walking from `obj` up the prototype chain
    pub fn get_property_descriptor(
        &self,
        obj: &JsObjectRef,
        key: &str,
    ) -> Option<PropertyDescriptor> {
        let mut current = Some(obj.cheap_clone());
        while let Some(object) = current {
            let next = {
                let object = object.borrow();
                if let Some(desc) = object.own_property(key) {
                    return Some(desc);
                }
                object.prototype.clone()
            };
            current = next;
        }
        None
    }

    /// [[Get]]: data value, getter result (with `receiver` as `this`), or
    /// undefined when absent
    pub fn read_property(
        &self,
        obj: &JsObjectRef,
        key: &str,
        receiver: &JsValue,
    ) -> Result<JsValue, JsError> {
        match self.get_property_descriptor(obj, key) {
            None => Ok(JsValue::Undefined),
            Some(PropertyDescriptor::Data { value, .. }) => Ok(value),
            Some(PropertyDescriptor::Accessor { getter, .. }) => {
                if matches!(getter, JsValue::Undefined) {
                    return Ok(JsValue::Undefined);
                }
                self.execute_function(&getter, receiver.clone(), &[], None)
            }
        }
    }

    /// [[Set]]: run an inherited or own setter, otherwise write an own data
    /// property (shadowing any inherited one)
    ///
    /// Read-only data properties and accessors without a setter ignore the
    /// write.
    pub fn assign_property(
        &self,
        obj: &JsObjectRef,
        key: JsString,
        value: JsValue,
        receiver: &JsValue,
    ) -> Result<(), JsError> {
        match self.get_property_descriptor(obj, &key) {
            Some(PropertyDescriptor::Accessor { setter, .. }) => {
                if !matches!(setter, JsValue::Undefined) {
                    self.execute_function(&setter, receiver.clone(), &[value], None)?;
                }
                Ok(())
            }
            Some(PropertyDescriptor::Data {
                writable: false, ..
            }) => Ok(()),
            _ => {
                obj.borrow_mut()
                    .define_property(key, PropertyDescriptor::data(value));
                Ok(())
            }
        }
    }

    /// Install `desc` in the static table of `obj`, replacing any existing entry
    pub fn define_property(&self, obj: &JsObjectRef, key: JsString, desc: PropertyDescriptor) {
        obj.borrow_mut().define_property(key, desc);
    }

    /// Property read on any value; primitives resolve through their prototype
    pub fn get_property(&self, target: &JsValue, key: &str) -> Result<JsValue, JsError> {
        let prototype = match target {
            JsValue::Object(obj) => return self.read_property(obj, key, target),
            JsValue::Undefined | JsValue::Null => {
                return Err(JsError::type_error(format!(
                    "Cannot read properties of {} (reading '{}')",
                    self.describe_value(target),
                    key
                )));
            }
            JsValue::String(s) => {
                if let Some(PropertyDescriptor::Data { value, .. }) = string_own_property(s, key) {
                    return Ok(value);
                }
                &self.string_prototype
            }
            JsValue::Number(_) => &self.number_prototype,
            JsValue::Boolean(_) => &self.boolean_prototype,
        };
        self.read_property(prototype, key, target)
    }

    /// Property write on any value; writes to primitives are discarded
    pub fn set_property(
        &self,
        target: &JsValue,
        key: JsString,
        value: JsValue,
    ) -> Result<(), JsError> {
        match target {
            JsValue::Object(obj) => self.assign_property(obj, key, value, target),
            JsValue::Undefined | JsValue::Null => Err(JsError::type_error(format!(
                "Cannot set properties of {} (setting '{}')",
                self.describe_value(target),
                key
            ))),
            _ => Ok(()),
        }
    }

    /// The `delete` operator: removes an own static-table entry
    pub fn delete_property(&self, target: &JsValue, key: &str) -> Result<bool, JsError> {
        match target {
            JsValue::Object(obj) => {
                let mut obj = obj.borrow_mut();
                if let Some(PropertyDescriptor::Data {
                    writable: false, ..
                }) = obj.properties.get(key)
                {
                    return Ok(false);
                }
                obj.properties.shift_remove(key);
                Ok(true)
            }
            JsValue::Undefined | JsValue::Null => Err(JsError::type_error(format!(
                "Cannot convert {} to object",
                self.describe_value(target)
            ))),
            _ => Ok(true),
        }
    }

    /// Collect `length` and indexed elements of an array-like value
    pub fn array_like_to_vec(&self, value: &JsValue) -> Result<Vec<JsValue>, JsError> {
        let length = self.to_number(&self.get_property(value, "length")?)?;
        let length = if length.is_finite() && length > 0.0 {
            length.trunc() as usize
        } else {
            0
        };
        (0..length)
            .map(|i| self.get_property(value, &i.to_string()))
            .collect()
    }
}
