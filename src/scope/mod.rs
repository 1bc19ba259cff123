//! Lexical scopes and the tree-walking evaluator
//!
//! A [`Scope`] is a link in the binding chain. Statement execution lives in
//! [`statement`], expression evaluation in [`expression`] and function
//! activation in [`function`].

mod expression;
mod function;
mod hoist;
mod statement;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

pub use statement::Completion;

use crate::ast::Program;
use crate::config::ScopeConfig;
use crate::engine::Engine;
use crate::error::JsError;
use crate::value::{Binding, CheapClone, JsString, JsValue};

/// A lexical environment: bindings, a parent link and the `this` value
///
/// Cloning is cheap and yields a handle to the same environment.
#[derive(Clone)]
pub struct Scope(Rc<ScopeData>);

struct ScopeData {
    parent: Option<Scope>,
    variables: RefCell<FxHashMap<JsString, Binding>>,
    this_value: JsValue,
    engine: Rc<Engine>,
}

impl CheapClone for Scope {}

impl Scope {
    fn from_data(
        engine: Rc<Engine>,
        parent: Option<Scope>,
        this_value: JsValue,
    ) -> Self {
        Scope(Rc::new(ScopeData {
            parent,
            variables: RefCell::new(FxHashMap::default()),
            this_value,
            engine,
        }))
    }

    /// Root scope seeded with the standard globals, then `config.variables`
    pub fn global(engine: Rc<Engine>, config: ScopeConfig) -> Self {
        let scope = Self::from_data(engine, None, config.this_value);
        {
            let mut vars = scope.0.variables.borrow_mut();
            for (name, binding) in scope.0.engine.globals() {
                vars.insert(name.cheap_clone(), binding.clone());
            }
            for (name, value) in config.variables {
                vars.insert(
                    name,
                    Binding {
                        value,
                        mutable: true,
                    },
                );
            }
        }
        scope
    }

    /// Block scope: same `this`, new bindings
    pub fn child(&self) -> Self {
        Self::from_data(
            self.0.engine.cheap_clone(),
            Some(self.cheap_clone()),
            self.0.this_value.clone(),
        )
    }

    /// Function activation scope with its own `this`
    pub(crate) fn activation(&self, this_value: JsValue) -> Self {
        Self::from_data(
            self.0.engine.cheap_clone(),
            Some(self.cheap_clone()),
            this_value,
        )
    }

    pub fn engine(&self) -> &Rc<Engine> {
        &self.0.engine
    }

    pub fn this_value(&self) -> &JsValue {
        &self.0.this_value
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// Bind `name` in this scope, replacing any existing binding here
    pub fn declare(&self, name: JsString, value: JsValue, mutable: bool) {
        self.0
            .variables
            .borrow_mut()
            .insert(name, Binding { value, mutable });
    }

    /// Bind `name` to undefined unless this scope already binds it
    pub(crate) fn declare_if_absent(&self, name: JsString) {
        self.0
            .variables
            .borrow_mut()
            .entry(name)
            .or_insert(Binding {
                value: JsValue::Undefined,
                mutable: true,
            });
    }

    /// Value of the nearest binding for `name`; unbound names read as undefined
    pub fn lookup(&self, name: &str) -> JsValue {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(binding) = current.0.variables.borrow().get(name) {
                return binding.value.clone();
            }
            scope = current.parent();
        }
        JsValue::Undefined
    }

    /// Whether any scope on the chain binds `name`
    pub fn has_binding(&self, name: &str) -> bool {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if current.0.variables.borrow().contains_key(name) {
                return true;
            }
            scope = current.parent();
        }
        false
    }

    /// Overwrite the nearest binding for `name`
    ///
    /// Unbound names are a ReferenceError; `const` bindings a TypeError.
    pub fn assign(&self, name: &str, value: JsValue) -> Result<(), JsError> {
        self.write_binding(name, value, true)
    }

    /// `var` initializer write: a read-only binding such as the global
    /// `undefined` keeps its value instead of raising
    pub(crate) fn assign_var(&self, name: &str, value: JsValue) -> Result<(), JsError> {
        self.write_binding(name, value, false)
    }

    fn write_binding(
        &self,
        name: &str,
        value: JsValue,
        reject_read_only: bool,
    ) -> Result<(), JsError> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(binding) = current.0.variables.borrow_mut().get_mut(name) {
                if !binding.mutable {
                    if reject_read_only {
                        return Err(JsError::type_error("Assignment to constant variable."));
                    }
                    tracing::trace!(name, "var initializer ignored for read-only binding");
                    return Ok(());
                }
                binding.value = value;
                return Ok(());
            }
            scope = current.parent();
        }
        Err(JsError::reference_error(format!(
            "Assignment to undeclared variable {}",
            name
        )))
    }

    /// Run a whole program in this scope
    ///
    /// Yields the value of the last statement that produced one.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.body.len()))]
    pub fn evaluate_program(&self, program: &Program) -> Result<JsValue, JsError> {
        let engine = self.engine();
        engine.begin_execution();
        self.hoist(&program.body);

        let result = match self.execute_statements(&program.body) {
            Ok(Completion::Normal(value)) => Ok(value),
            Ok(Completion::Return(_)) => Err(engine.internal_error("Illegal return statement")),
            Ok(Completion::Break) => Err(engine.internal_error("Illegal break statement")),
            Ok(Completion::Continue) => Err(engine.internal_error("Illegal continue statement")),
            Err(err) => Err(engine.render_uncaught(err)),
        };
        if let Err(err) = &result {
            tracing::debug!(error = %err, "program terminated abruptly");
        }
        result
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values may hold closures over this very scope, so only names are shown
        let mut names: Vec<JsString> = self.0.variables.borrow().keys().cloned().collect();
        names.sort();
        let mut depth = 0;
        let mut parent = self.parent();
        while let Some(p) = parent {
            depth += 1;
            parent = p.parent();
        }
        f.debug_struct("Scope")
            .field("bindings", &names)
            .field("depth", &depth)
            .finish_non_exhaustive()
    }
}
