//! Closure creation and function activation

use std::rc::Rc;

use super::{Completion, Scope};
use crate::ast::{self, FunctionBody, Pattern};
use crate::error::JsError;
use crate::value::{
    CheapClone, InterpretedFunction, JsFunction, JsObjectRef, JsString, JsValue,
};

impl Scope {
    /// Create a function object closing over this scope
    ///
    /// Arrows get a bare function object; other functions get a fresh
    /// `prototype` object wired back through `constructor`. `name` overrides
    /// the node's own identifier (anonymous functions named by their binding).
    pub(crate) fn instantiate_function(
        &self,
        node: &Rc<ast::Function>,
        is_arrow: bool,
        name: Option<&JsString>,
    ) -> Result<JsObjectRef, JsError> {
        if node.generator {
            return Err(self.engine().unsupported("generator function"));
        }
        if node.is_async {
            return Err(self.engine().unsupported("async function"));
        }

        let func = JsFunction::Interpreted(Rc::new(InterpretedFunction {
            name: name.or_else(|| node.name()).map(CheapClone::cheap_clone),
            node: node.cheap_clone(),
            closure: self.cheap_clone(),
            is_arrow,
        }));

        let engine = self.engine();
        Ok(if is_arrow {
            engine.create_function(func)
        } else {
            engine.function_value(func, None)
        })
    }
}

impl InterpretedFunction {
    /// Run the function body in a fresh activation of the closure scope
    ///
    /// Arrows reuse the closure's `this` and get no `arguments` object.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(name = self.name.as_ref().map(JsString::as_str).unwrap_or("<anonymous>"))
    )]
    pub fn invoke(
        &self,
        this: JsValue,
        args: &[JsValue],
        _new_target: Option<&JsObjectRef>,
    ) -> Result<JsValue, JsError> {
        let this = if self.is_arrow {
            self.closure.this_value().clone()
        } else {
            this
        };
        let scope = self.closure.activation(this);

        if !self.is_arrow {
            let arguments = scope.engine().create_object();
            {
                let mut obj = arguments.borrow_mut();
                for (i, arg) in args.iter().enumerate() {
                    obj.set_data(i.to_string(), arg.clone());
                }
                obj.set_data("length", JsValue::Number(args.len() as f64));
            }
            scope.declare(JsString::from("arguments"), JsValue::Object(arguments), true);
        }

        scope.bind_parameters(&self.node.params, args)?;

        match &self.node.body {
            FunctionBody::Expression(expr) => scope.evaluate(expr),
            FunctionBody::Block(block) => {
                scope.hoist(&block.body);
                match scope.execute_statements(&block.body)? {
                    Completion::Return(value) => Ok(value),
                    Completion::Normal(_) => Ok(JsValue::Undefined),
                    Completion::Break => Err(scope.engine().internal_error("Illegal break statement")),
                    Completion::Continue => {
                        Err(scope.engine().internal_error("Illegal continue statement"))
                    }
                }
            }
        }
    }
}

impl Scope {
    /// Bind formal parameters; missing arguments read as undefined
    fn bind_parameters(&self, params: &[Pattern], args: &[JsValue]) -> Result<(), JsError> {
        for (index, param) in params.iter().enumerate() {
            match param {
                Pattern::Identifier(id) => {
                    let value = args.get(index).cloned().unwrap_or_default();
                    self.declare(id.name.cheap_clone(), value, true);
                }
                Pattern::Assignment(pattern) => {
                    let Pattern::Identifier(id) = pattern.left.as_ref() else {
                        return Err(self.engine().unsupported("destructuring parameter"));
                    };
                    let value = match args.get(index) {
                        Some(value) if !matches!(value, JsValue::Undefined) => value.clone(),
                        _ => self.evaluate_named(&pattern.right, &id.name)?,
                    };
                    self.declare(id.name.cheap_clone(), value, true);
                }
                Pattern::Rest(rest) => {
                    let Pattern::Identifier(id) = rest.argument.as_ref() else {
                        return Err(self.engine().unsupported("destructuring rest parameter"));
                    };
                    let remaining = args.get(index..).map(<[JsValue]>::to_vec).unwrap_or_default();
                    let array = self.engine().create_array(remaining);
                    self.declare(id.name.cheap_clone(), JsValue::Object(array), true);
                }
                Pattern::Unsupported => {
                    return Err(self.engine().unsupported("destructuring parameter"));
                }
            }
        }
        Ok(())
    }
}
