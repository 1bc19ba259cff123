//! Expression evaluation

use std::cmp::Ordering;

use super::Scope;
use crate::ast::{
    ArrayExpression, AssignmentExpression, AssignmentOp, AssignmentTarget, BinaryOp,
    CallExpression, Expression, LiteralValue, LogicalOp, MemberExpression, ObjectExpression,
    ObjectMember, PropertyKind, TemplateLiteral, UnaryExpression, UnaryOp, UpdateExpression,
    UpdateOp,
};
use crate::engine::number_to_string;
use crate::error::JsError;
use crate::stack::ensure_sufficient_stack;
use crate::value::{CheapClone, JsObjectRef, JsString, JsValue, PropertyDescriptor};

impl Scope {
    pub fn evaluate(&self, expr: &Expression) -> Result<JsValue, JsError> {
        ensure_sufficient_stack(|| self.evaluate_inner(expr))
    }

    fn evaluate_inner(&self, expr: &Expression) -> Result<JsValue, JsError> {
        match expr {
            Expression::Identifier(id) => Ok(self.lookup(&id.name)),

            Expression::Literal(lit) => {
                if lit.regex.is_some() {
                    return Err(self.engine().unsupported("regular expression literal"));
                }
                if lit.bigint.is_some() {
                    return Err(self.engine().unsupported("BigInt literal"));
                }
                match &lit.value {
                    LiteralValue::Null => Ok(JsValue::Null),
                    LiteralValue::Boolean(b) => Ok(JsValue::Boolean(*b)),
                    LiteralValue::Number(n) => Ok(JsValue::Number(*n)),
                    LiteralValue::String(s) => Ok(JsValue::String(s.cheap_clone())),
                    LiteralValue::Other(_) => Err(self.engine().unsupported("literal")),
                }
            }

            Expression::This => Ok(self.this_value().clone()),

            Expression::Array(array) => self.evaluate_array(array),

            Expression::Object(object) => self.evaluate_object(object),

            Expression::Function(node) => {
                // A named function expression sees its own name
                let Some(name) = node.name() else {
                    return Ok(JsValue::Object(self.instantiate_function(node, false, None)?));
                };
                let scope = self.child();
                let func = JsValue::Object(scope.instantiate_function(node, false, None)?);
                scope.declare(name.cheap_clone(), func.clone(), true);
                Ok(func)
            }

            Expression::ArrowFunction(node) => {
                Ok(JsValue::Object(self.instantiate_function(node, true, None)?))
            }

            Expression::Template(template) => self.evaluate_template(template),

            Expression::Unary(unary) => self.evaluate_unary(unary),

            Expression::Update(update) => self.evaluate_update(update),

            Expression::Binary(bin) => {
                let left = self.evaluate(&bin.left)?;
                let right = self.evaluate(&bin.right)?;
                self.apply_binary(bin.operator, &left, &right)
            }

            Expression::Logical(logical) => {
                let left = self.evaluate(&logical.left)?;
                let short_circuit = match logical.operator {
                    LogicalOp::And => !left.to_boolean(),
                    LogicalOp::Or => left.to_boolean(),
                    LogicalOp::NullishCoalescing => !left.is_null_or_undefined(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(&logical.right)
                }
            }

            Expression::Assignment(assign) => self.evaluate_assignment(assign),

            Expression::Conditional(cond) => {
                if self.evaluate(&cond.test)?.to_boolean() {
                    self.evaluate(&cond.consequent)
                } else {
                    self.evaluate(&cond.alternate)
                }
            }

            Expression::Sequence(seq) => {
                let mut result = JsValue::Undefined;
                for expr in &seq.expressions {
                    result = self.evaluate(expr)?;
                }
                Ok(result)
            }

            Expression::Member(member) => {
                let object = self.evaluate(&member.object)?;
                let key = self.member_key(member)?;
                self.engine().get_property(&object, &key)
            }

            Expression::Call(call) => self.evaluate_call(call),

            Expression::New(new) => {
                let constructor = self.evaluate(&new.callee)?;
                let args = self.evaluate_arguments(&new.arguments)?;
                let object = self.engine().construct_object(&constructor, &args, None)?;
                Ok(JsValue::Object(object))
            }

            Expression::Spread(_) => Err(self
                .engine()
                .internal_error("Spread element outside of an array literal or argument list")),

            Expression::Unsupported => Err(self.engine().unsupported("expression")),
        }
    }

    /// Evaluate `expr`, giving an anonymous function the binding's name
    pub(crate) fn evaluate_named(
        &self,
        expr: &Expression,
        name: &JsString,
    ) -> Result<JsValue, JsError> {
        match expr {
            Expression::Function(node) if node.id.is_none() => Ok(JsValue::Object(
                self.instantiate_function(node, false, Some(name))?,
            )),
            Expression::ArrowFunction(node) => Ok(JsValue::Object(
                self.instantiate_function(node, true, Some(name))?,
            )),
            _ => self.evaluate(expr),
        }
    }

    /// Property name of a member expression: `o.name` or `o[expr]`
    fn member_key(&self, member: &MemberExpression) -> Result<JsString, JsError> {
        if member.computed {
            let key = self.evaluate(&member.property)?;
            return self.engine().to_property_key(&key);
        }
        match member.property.as_ref() {
            Expression::Identifier(id) => Ok(id.name.cheap_clone()),
            _ => Err(self.engine().unsupported("private member access")),
        }
    }

    fn evaluate_arguments(&self, arguments: &[Expression]) -> Result<Vec<JsValue>, JsError> {
        let mut values = Vec::with_capacity(arguments.len());
        for arg in arguments {
            match arg {
                Expression::Spread(spread) => {
                    let source = self.evaluate(&spread.argument)?;
                    values.extend(self.engine().array_like_to_vec(&source)?);
                }
                expr => values.push(self.evaluate(expr)?),
            }
        }
        Ok(values)
    }

    /// Calls through a member expression bind `this` to the object
    fn evaluate_call(&self, call: &CallExpression) -> Result<JsValue, JsError> {
        let (callee, this) = match call.callee.as_ref() {
            Expression::Member(member) => {
                let object = self.evaluate(&member.object)?;
                let key = self.member_key(member)?;
                let method = self.engine().get_property(&object, &key)?;
                (method, object)
            }
            callee => (self.evaluate(callee)?, JsValue::Undefined),
        };
        let args = self.evaluate_arguments(&call.arguments)?;
        self.engine().execute_function(&callee, this, &args, None)
    }

    fn evaluate_array(&self, array: &ArrayExpression) -> Result<JsValue, JsError> {
        let mut elements = Vec::with_capacity(array.elements.len());
        for element in &array.elements {
            match element {
                None => elements.push(JsValue::Undefined),
                Some(Expression::Spread(spread)) => {
                    let source = self.evaluate(&spread.argument)?;
                    elements.extend(self.engine().array_like_to_vec(&source)?);
                }
                Some(expr) => elements.push(self.evaluate(expr)?),
            }
        }
        Ok(JsValue::Object(self.engine().create_array(elements)))
    }

    fn evaluate_object(&self, object: &ObjectExpression) -> Result<JsValue, JsError> {
        let engine = self.engine();
        let result = engine.create_object();

        for member in &object.properties {
            let prop = match member {
                ObjectMember::Property(prop) => prop,
                ObjectMember::Spread(spread) => {
                    let source = self.evaluate(&spread.argument)?;
                    self.copy_own_properties(&source, &result)?;
                    continue;
                }
                ObjectMember::Unsupported => {
                    return Err(engine.unsupported("object literal member"));
                }
            };

            let key = if prop.computed {
                let key = self.evaluate(&prop.key)?;
                engine.to_property_key(&key)?
            } else {
                match &prop.key {
                    Expression::Identifier(id) => id.name.cheap_clone(),
                    Expression::Literal(lit) => match &lit.value {
                        LiteralValue::String(s) => s.cheap_clone(),
                        LiteralValue::Number(n) => JsString::from(number_to_string(*n)),
                        _ => return Err(engine.unsupported("object literal key")),
                    },
                    _ => return Err(engine.unsupported("object literal key")),
                }
            };

            match prop.kind {
                PropertyKind::Init => {
                    let value = self.evaluate_named(&prop.value, &key)?;
                    engine.define_property(&result, key, PropertyDescriptor::data(value));
                }
                PropertyKind::Get | PropertyKind::Set => {
                    let accessor = self.evaluate(&prop.value)?;
                    // `get` and `set` for one key merge into a single descriptor
                    let (getter, setter) = match engine.get_own_property_descriptor(&result, &key)
                    {
                        Some(PropertyDescriptor::Accessor { getter, setter }) => (getter, setter),
                        _ => (JsValue::Undefined, JsValue::Undefined),
                    };
                    let desc = if prop.kind == PropertyKind::Get {
                        PropertyDescriptor::accessor(accessor, setter)
                    } else {
                        PropertyDescriptor::accessor(getter, accessor)
                    };
                    engine.define_property(&result, key, desc);
                }
            }
        }
        Ok(JsValue::Object(result))
    }

    /// `{...source}`: copy own properties as data, running getters
    fn copy_own_properties(
        &self,
        source: &JsValue,
        target: &JsObjectRef,
    ) -> Result<(), JsError> {
        let engine = self.engine();
        match source {
            JsValue::Object(obj) => {
                let entries: Vec<(JsString, PropertyDescriptor)> = obj
                    .borrow()
                    .properties
                    .iter()
                    .map(|(k, d)| (k.cheap_clone(), d.clone()))
                    .collect();
                for (key, desc) in entries {
                    let value = match desc {
                        PropertyDescriptor::Data { value, .. } => value,
                        PropertyDescriptor::Accessor { .. } => {
                            engine.read_property(obj, &key, source)?
                        }
                    };
                    engine.define_property(target, key, PropertyDescriptor::data(value));
                }
            }
            JsValue::String(_) => {
                for (index, value) in engine.array_like_to_vec(source)?.into_iter().enumerate() {
                    engine.define_property(
                        target,
                        JsString::from(index.to_string()),
                        PropertyDescriptor::data(value),
                    );
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn evaluate_template(&self, template: &TemplateLiteral) -> Result<JsValue, JsError> {
        let mut result = String::new();
        let mut expressions = template.expressions.iter();
        for quasi in &template.quasis {
            result.push_str(quasi.value.cooked.as_deref().unwrap_or(&quasi.value.raw));
            if quasi.tail {
                break;
            }
            if let Some(expr) = expressions.next() {
                let value = self.evaluate(expr)?;
                result.push_str(self.engine().to_string(&value)?.as_str());
            }
        }
        Ok(JsValue::from(result))
    }

    fn evaluate_unary(&self, unary: &UnaryExpression) -> Result<JsValue, JsError> {
        let engine = self.engine();

        if unary.operator == UnaryOp::Delete {
            return match unary.argument.as_ref() {
                Expression::Member(member) => {
                    let object = self.evaluate(&member.object)?;
                    let key = self.member_key(member)?;
                    Ok(JsValue::Boolean(engine.delete_property(&object, &key)?))
                }
                // Variables are not deletable
                Expression::Identifier(_) => Ok(JsValue::Boolean(false)),
                expr => {
                    self.evaluate(expr)?;
                    Ok(JsValue::Boolean(true))
                }
            };
        }

        let value = self.evaluate(&unary.argument)?;
        match unary.operator {
            UnaryOp::Minus => Ok(JsValue::Number(-engine.to_number(&value)?)),
            UnaryOp::Plus => Ok(JsValue::Number(engine.to_number(&value)?)),
            UnaryOp::Not => Ok(JsValue::Boolean(!value.to_boolean())),
            UnaryOp::BitNot => Ok(JsValue::Number(f64::from(!engine.to_int32(&value)?))),
            UnaryOp::Typeof => Ok(JsValue::from(engine.type_of(&value))),
            UnaryOp::Void => Ok(JsValue::Undefined),
            UnaryOp::Delete => Ok(JsValue::Boolean(true)),
        }
    }

    fn evaluate_update(&self, update: &UpdateExpression) -> Result<JsValue, JsError> {
        let engine = self.engine();
        let delta = match update.operator {
            UpdateOp::Increment => 1.0,
            UpdateOp::Decrement => -1.0,
        };

        let (old, new) = match update.argument.as_ref() {
            Expression::Identifier(id) => {
                let old = engine.to_number(&self.lookup(&id.name))?;
                let new = old + delta;
                self.assign(&id.name, JsValue::Number(new))?;
                (old, new)
            }
            Expression::Member(member) => {
                let object = self.evaluate(&member.object)?;
                let key = self.member_key(member)?;
                let old = engine.to_number(&engine.get_property(&object, &key)?)?;
                let new = old + delta;
                engine.set_property(&object, key, JsValue::Number(new))?;
                (old, new)
            }
            _ => return Err(engine.unsupported("update target")),
        };

        Ok(JsValue::Number(if update.prefix { new } else { old }))
    }

    /// `=`, compound and logical assignment to a variable or property
    fn evaluate_assignment(&self, assign: &AssignmentExpression) -> Result<JsValue, JsError> {
        match &assign.left {
            AssignmentTarget::Identifier(id) => {
                let name = &id.name;
                let value = match assign.operator {
                    AssignmentOp::Assign => self.evaluate_named(&assign.right, name)?,
                    op => {
                        let current = self.lookup(name);
                        if let Some(bin_op) = op.binary_op() {
                            let right = self.evaluate(&assign.right)?;
                            self.apply_binary(bin_op, &current, &right)?
                        } else if logical_assignment_skips(op, &current) {
                            return Ok(current);
                        } else {
                            self.evaluate_named(&assign.right, name)?
                        }
                    }
                };
                self.assign(name, value.clone())?;
                Ok(value)
            }

            AssignmentTarget::Member(member) => {
                let engine = self.engine();
                let object = self.evaluate(&member.object)?;
                let key = self.member_key(member)?;
                let value = match assign.operator {
                    AssignmentOp::Assign => self.evaluate(&assign.right)?,
                    op => {
                        let current = engine.get_property(&object, &key)?;
                        if let Some(bin_op) = op.binary_op() {
                            let right = self.evaluate(&assign.right)?;
                            self.apply_binary(bin_op, &current, &right)?
                        } else if logical_assignment_skips(op, &current) {
                            return Ok(current);
                        } else {
                            self.evaluate(&assign.right)?
                        }
                    }
                };
                engine.set_property(&object, key, value.clone())?;
                Ok(value)
            }

            AssignmentTarget::Unsupported => {
                Err(self.engine().unsupported("destructuring assignment"))
            }
        }
    }

    fn apply_binary(
        &self,
        op: BinaryOp,
        left: &JsValue,
        right: &JsValue,
    ) -> Result<JsValue, JsError> {
        let engine = self.engine();
        let value = match op {
            // Concatenates only when an evaluated operand is already a string
            BinaryOp::Add => {
                if matches!(left, JsValue::String(_)) || matches!(right, JsValue::String(_)) {
                    let left = engine.to_string(left)?;
                    let right = engine.to_string(right)?;
                    JsValue::String(left + &right)
                } else {
                    JsValue::Number(engine.to_number(left)? + engine.to_number(right)?)
                }
            }
            BinaryOp::Sub => JsValue::Number(engine.to_number(left)? - engine.to_number(right)?),
            BinaryOp::Mul => JsValue::Number(engine.to_number(left)? * engine.to_number(right)?),
            BinaryOp::Div => JsValue::Number(engine.to_number(left)? / engine.to_number(right)?),
            BinaryOp::Mod => JsValue::Number(engine.to_number(left)? % engine.to_number(right)?),
            BinaryOp::Exp => {
                JsValue::Number(exponentiate(engine.to_number(left)?, engine.to_number(right)?))
            }

            BinaryOp::Eq => JsValue::Boolean(engine.loose_equals(left, right)?),
            BinaryOp::NotEq => JsValue::Boolean(!engine.loose_equals(left, right)?),
            BinaryOp::StrictEq => JsValue::Boolean(left.strict_equals(right)),
            BinaryOp::StrictNotEq => JsValue::Boolean(!left.strict_equals(right)),

            BinaryOp::Lt => JsValue::Boolean(self.compare(left, right)? == Some(Ordering::Less)),
            BinaryOp::Gt => {
                JsValue::Boolean(self.compare(left, right)? == Some(Ordering::Greater))
            }
            BinaryOp::LtEq => JsValue::Boolean(matches!(
                self.compare(left, right)?,
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinaryOp::GtEq => JsValue::Boolean(matches!(
                self.compare(left, right)?,
                Some(Ordering::Greater | Ordering::Equal)
            )),

            BinaryOp::BitAnd => {
                JsValue::Number(f64::from(engine.to_int32(left)? & engine.to_int32(right)?))
            }
            BinaryOp::BitOr => {
                JsValue::Number(f64::from(engine.to_int32(left)? | engine.to_int32(right)?))
            }
            BinaryOp::BitXor => {
                JsValue::Number(f64::from(engine.to_int32(left)? ^ engine.to_int32(right)?))
            }
            BinaryOp::LShift => {
                let shift = engine.to_uint32(right)? & 31;
                JsValue::Number(f64::from(engine.to_int32(left)?.wrapping_shl(shift)))
            }
            BinaryOp::RShift => {
                let shift = engine.to_uint32(right)? & 31;
                JsValue::Number(f64::from(engine.to_int32(left)?.wrapping_shr(shift)))
            }
            BinaryOp::URShift => {
                let shift = engine.to_uint32(right)? & 31;
                JsValue::Number(f64::from(engine.to_uint32(left)?.wrapping_shr(shift)))
            }

            BinaryOp::In => JsValue::Boolean(engine.is_in(left, right)?),
            BinaryOp::Instanceof => JsValue::Boolean(engine.is_instance_of(left, right)?),
        };
        Ok(value)
    }

    /// Relational comparison, always numeric; `None` when either side is NaN
    fn compare(&self, left: &JsValue, right: &JsValue) -> Result<Option<Ordering>, JsError> {
        let engine = self.engine();
        let a = engine.to_number(left)?;
        let b = engine.to_number(right)?;
        Ok(a.partial_cmp(&b))
    }
}

/// Whether `&&=`, `||=` or `??=` leaves `current` in place
fn logical_assignment_skips(op: AssignmentOp, current: &JsValue) -> bool {
    match op {
        AssignmentOp::AndAssign => !current.to_boolean(),
        AssignmentOp::OrAssign => current.to_boolean(),
        AssignmentOp::NullishAssign => !current.is_null_or_undefined(),
        _ => false,
    }
}

/// `**`, which differs from `powf` for a base of ±1
fn exponentiate(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}
