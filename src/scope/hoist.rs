//! Hoisting of `var` and function declaration names
//!
//! Both kinds of declaration are bound (to undefined) at the top of the
//! enclosing function or program before any statement runs. The walk
//! descends into nested statements but never into function bodies, which are
//! separate scopes.

use super::Scope;
use crate::ast::{ForInit, Pattern, Statement, VariableDeclaration, VariableKind};
use crate::value::{CheapClone, JsString};

impl Scope {
    /// Pre-bind every hoisted name in `body` that this scope does not bind yet
    pub(crate) fn hoist(&self, body: &[Statement]) {
        let mut names = Vec::new();
        collect_hoisted_names(body, &mut names);
        for name in names {
            self.declare_if_absent(name);
        }
    }
}

/// Collect hoisted names from a statement list, in source order
pub(crate) fn collect_hoisted_names(statements: &[Statement], names: &mut Vec<JsString>) {
    for stmt in statements {
        collect_hoisted_names_stmt(stmt, names);
    }
}

fn collect_hoisted_names_stmt(stmt: &Statement, names: &mut Vec<JsString>) {
    match stmt {
        Statement::VariableDeclaration(decl) => {
            if decl.kind == VariableKind::Var {
                collect_hoisted_names_decl(decl, names);
            }
        }

        // The name hoists; the body is its own scope
        Statement::FunctionDeclaration(func) => {
            if let Some(name) = func.name() {
                names.push(name.cheap_clone());
            }
        }

        Statement::Block(block) => collect_hoisted_names(&block.body, names),

        Statement::If(if_stmt) => {
            collect_hoisted_names_stmt(&if_stmt.consequent, names);
            if let Some(alt) = &if_stmt.alternate {
                collect_hoisted_names_stmt(alt, names);
            }
        }

        Statement::For(for_stmt) => {
            if let Some(ForInit::Variable(decl)) = &for_stmt.init
                && decl.kind == VariableKind::Var
            {
                collect_hoisted_names_decl(decl, names);
            }
            collect_hoisted_names_stmt(&for_stmt.body, names);
        }

        Statement::While(while_stmt) => collect_hoisted_names_stmt(&while_stmt.body, names),

        Statement::DoWhile(do_while) => collect_hoisted_names_stmt(&do_while.body, names),

        Statement::Switch(switch_stmt) => {
            for case in &switch_stmt.cases {
                collect_hoisted_names(&case.consequent, names);
            }
        }

        Statement::Try(try_stmt) => {
            collect_hoisted_names(&try_stmt.block.body, names);
            if let Some(handler) = &try_stmt.handler {
                collect_hoisted_names(&handler.body.body, names);
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                collect_hoisted_names(&finalizer.body, names);
            }
        }

        Statement::Expression(_)
        | Statement::Empty
        | Statement::Return(_)
        | Statement::Break(_)
        | Statement::Continue(_)
        | Statement::Throw(_)
        | Statement::Unsupported => {}
    }
}

fn collect_hoisted_names_decl(decl: &VariableDeclaration, names: &mut Vec<JsString>) {
    for declarator in &decl.declarations {
        if let Pattern::Identifier(id) = &declarator.id {
            names.push(id.name.cheap_clone());
        }
    }
}
