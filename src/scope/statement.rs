//! Statement execution

use super::Scope;
use crate::ast::{
    BlockStatement, ForInit, ForStatement, Pattern, Statement, SwitchStatement, TryStatement,
    VariableDeclaration, VariableKind,
};
use crate::error::JsError;
use crate::stack::ensure_sufficient_stack;
use crate::value::{CheapClone, JsValue};

/// Completion record for statement execution
#[derive(Debug, Clone)]
pub enum Completion {
    /// Ran to the end; carries the statement's value
    Normal(JsValue),
    Return(JsValue),
    Break,
    Continue,
}

/// What a loop does after its body completes
enum LoopControl {
    Next,
    Exit,
    Propagate(Completion),
}

impl LoopControl {
    fn from_body(completion: Completion) -> Self {
        match completion {
            Completion::Normal(_) | Completion::Continue => LoopControl::Next,
            Completion::Break => LoopControl::Exit,
            ret @ Completion::Return(_) => LoopControl::Propagate(ret),
        }
    }
}

impl Scope {
    /// Execute statements in order, stopping at the first non-normal completion
    pub fn execute_statements(&self, statements: &[Statement]) -> Result<Completion, JsError> {
        let mut result = JsValue::Undefined;
        for stmt in statements {
            match self.execute_statement(stmt)? {
                Completion::Normal(value) => result = value,
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal(result))
    }

    pub fn execute_statement(&self, stmt: &Statement) -> Result<Completion, JsError> {
        ensure_sufficient_stack(|| self.execute_statement_inner(stmt))
    }

    fn execute_statement_inner(&self, stmt: &Statement) -> Result<Completion, JsError> {
        match stmt {
            Statement::Expression(expr) => {
                let value = self.evaluate(&expr.expression)?;
                Ok(Completion::Normal(value))
            }

            Statement::VariableDeclaration(decl) => {
                self.execute_variable_declaration(decl)?;
                Ok(Completion::Normal(JsValue::Undefined))
            }

            Statement::FunctionDeclaration(func) => {
                let Some(name) = func.name() else {
                    return Err(self
                        .engine()
                        .internal_error("Function declaration without a name"));
                };
                let value = JsValue::Object(self.instantiate_function(func, false, None)?);
                // The name was pre-bound by hoisting
                if self.has_binding(name) {
                    self.assign(name, value)?;
                } else {
                    self.declare(name.cheap_clone(), value, true);
                }
                Ok(Completion::Normal(JsValue::Undefined))
            }

            Statement::Block(block) => self.execute_block(block),

            Statement::Empty => Ok(Completion::Normal(JsValue::Undefined)),

            Statement::If(if_stmt) => {
                let test = self.evaluate(&if_stmt.test)?;
                if test.to_boolean() {
                    self.execute_statement(&if_stmt.consequent)
                } else if let Some(alt) = &if_stmt.alternate {
                    self.execute_statement(alt)
                } else {
                    Ok(Completion::Normal(JsValue::Undefined))
                }
            }

            Statement::While(while_stmt) => {
                loop {
                    self.engine().check_timeout()?;
                    if !self.evaluate(&while_stmt.test)?.to_boolean() {
                        break;
                    }
                    match LoopControl::from_body(self.execute_statement(&while_stmt.body)?) {
                        LoopControl::Next => {}
                        LoopControl::Exit => break,
                        LoopControl::Propagate(completion) => return Ok(completion),
                    }
                }
                Ok(Completion::Normal(JsValue::Undefined))
            }

            Statement::DoWhile(do_while) => {
                loop {
                    self.engine().check_timeout()?;
                    match LoopControl::from_body(self.execute_statement(&do_while.body)?) {
                        LoopControl::Next => {}
                        LoopControl::Exit => break,
                        LoopControl::Propagate(completion) => return Ok(completion),
                    }
                    if !self.evaluate(&do_while.test)?.to_boolean() {
                        break;
                    }
                }
                Ok(Completion::Normal(JsValue::Undefined))
            }

            Statement::For(for_stmt) => self.execute_for(for_stmt),

            Statement::Switch(switch_stmt) => self.execute_switch(switch_stmt),

            Statement::Try(try_stmt) => self.execute_try(try_stmt),

            Statement::Return(ret) => {
                let value = match &ret.argument {
                    Some(arg) => self.evaluate(arg)?,
                    None => JsValue::Undefined,
                };
                Ok(Completion::Return(value))
            }

            Statement::Break(jump) => {
                if jump.label.is_some() {
                    return Err(self.engine().unsupported("labeled break"));
                }
                Ok(Completion::Break)
            }

            Statement::Continue(jump) => {
                if jump.label.is_some() {
                    return Err(self.engine().unsupported("labeled continue"));
                }
                Ok(Completion::Continue)
            }

            Statement::Throw(throw) => {
                let value = self.evaluate(&throw.argument)?;
                Err(self.engine().throw_value(value))
            }

            Statement::Unsupported => Err(self.engine().unsupported("statement")),
        }
    }

    /// Run a block in a fresh child scope
    pub fn execute_block(&self, block: &BlockStatement) -> Result<Completion, JsError> {
        self.child().execute_statements(&block.body)
    }

    fn execute_variable_declaration(&self, decl: &VariableDeclaration) -> Result<(), JsError> {
        for declarator in &decl.declarations {
            let Pattern::Identifier(id) = &declarator.id else {
                return Err(self.engine().unsupported("destructuring declaration"));
            };
            let name = &id.name;
            match decl.kind {
                VariableKind::Var => {
                    // `var x;` leaves the hoisted binding untouched
                    let Some(init) = &declarator.init else {
                        continue;
                    };
                    let value = self.evaluate_named(init, name)?;
                    if self.has_binding(name) {
                        self.assign_var(name, value)?;
                    } else {
                        self.declare(name.cheap_clone(), value, true);
                    }
                }
                VariableKind::Let | VariableKind::Const => {
                    let value = match &declarator.init {
                        Some(init) => self.evaluate_named(init, name)?,
                        None => JsValue::Undefined,
                    };
                    self.declare(name.cheap_clone(), value, decl.kind == VariableKind::Let);
                }
            }
        }
        Ok(())
    }

    /// C-style `for`: one child scope shared by every iteration
    fn execute_for(&self, for_stmt: &ForStatement) -> Result<Completion, JsError> {
        let loop_scope = self.child();

        match &for_stmt.init {
            Some(ForInit::Variable(decl)) => loop_scope.execute_variable_declaration(decl)?,
            Some(ForInit::Expression(expr)) => {
                loop_scope.evaluate(expr)?;
            }
            None => {}
        }

        loop {
            self.engine().check_timeout()?;
            if let Some(test) = &for_stmt.test
                && !loop_scope.evaluate(test)?.to_boolean()
            {
                break;
            }

            match LoopControl::from_body(loop_scope.execute_statement(&for_stmt.body)?) {
                LoopControl::Next => {}
                LoopControl::Exit => break,
                LoopControl::Propagate(completion) => return Ok(completion),
            }

            if let Some(update) = &for_stmt.update {
                loop_scope.evaluate(update)?;
            }
        }
        Ok(Completion::Normal(JsValue::Undefined))
    }

    /// `switch`: strict case matching, fallthrough, `default` when nothing matches
    fn execute_switch(&self, switch_stmt: &SwitchStatement) -> Result<Completion, JsError> {
        let discriminant = self.evaluate(&switch_stmt.discriminant)?;
        let switch_scope = self.child();

        let mut start = None;
        for (index, case) in switch_stmt.cases.iter().enumerate() {
            if let Some(test) = &case.test
                && switch_scope.evaluate(test)?.strict_equals(&discriminant)
            {
                start = Some(index);
                break;
            }
        }
        let start = start.or_else(|| switch_stmt.cases.iter().position(|c| c.test.is_none()));
        let Some(start) = start else {
            return Ok(Completion::Normal(JsValue::Undefined));
        };

        for case in switch_stmt.cases.iter().skip(start) {
            match switch_scope.execute_statements(&case.consequent)? {
                Completion::Normal(_) => {}
                Completion::Break => break,
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal(JsValue::Undefined))
    }

    /// `try`/`catch`/`finally`
    ///
    /// `catch` only sees catchable errors. A `finally` block that completes
    /// abruptly (return, break, continue or error) replaces the pending result.
    fn execute_try(&self, try_stmt: &TryStatement) -> Result<Completion, JsError> {
        let mut result = self.execute_block(&try_stmt.block);

        if let Some(handler) = &try_stmt.handler
            && let Err(err) = &result
            && err.is_catchable()
        {
            let catch_scope = self.child();
            if let Some(param) = &handler.param {
                let Pattern::Identifier(id) = param else {
                    return Err(self.engine().unsupported("destructuring catch parameter"));
                };
                let value = self
                    .engine()
                    .error_to_value(err)
                    .unwrap_or(JsValue::Undefined);
                catch_scope.declare(id.name.cheap_clone(), value, true);
            }
            result = catch_scope.execute_block(&handler.body);
        }

        if let Some(finalizer) = &try_stmt.finalizer {
            match self.execute_block(finalizer)? {
                Completion::Normal(_) => {}
                abrupt => return Ok(abrupt),
            }
        }
        result
    }
}
