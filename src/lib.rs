//! Tree-walking evaluator for a prototype-based, JavaScript-like language
//!
//! Programs arrive as ESTree JSON produced by an external parser and are
//! evaluated directly against a live object model.
//!
//! # Example
//!
//! ```
//! use jswalk::{JsValue, Runtime};
//!
//! // `1 + 2 * 3`
//! let json = r#"{"type": "Program", "body": [{"type": "ExpressionStatement", "expression": {
//!     "type": "BinaryExpression", "operator": "+",
//!     "left": {"type": "Literal", "value": 1},
//!     "right": {"type": "BinaryExpression", "operator": "*",
//!         "left": {"type": "Literal", "value": 2},
//!         "right": {"type": "Literal", "value": 3}}}}]}"#;
//!
//! let runtime = Runtime::new();
//! let result = runtime.eval_json(json).unwrap();
//! assert_eq!(result, JsValue::Number(7.0));
//! ```

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod scope;
pub mod stack;
pub mod value;

pub use ast::Program;
pub use config::{EngineOptions, ScopeConfig};
pub use engine::Engine;
pub use error::{JsError, StackFrame};
pub use platform::{BufferConsoleProvider, ConsoleLevel, ConsoleProvider, StdConsoleProvider};
pub use scope::{Completion, Scope};
pub use value::{CheapClone, HostObject, JsObjectRef, JsString, JsValue, PropertyDescriptor};

use std::rc::Rc;

/// An engine plus its global scope
///
/// Globals declared by one program stay visible to the next.
#[derive(Debug)]
pub struct Runtime {
    engine: Rc<Engine>,
    global: Scope,
}

impl Runtime {
    /// Create a runtime with default options and an empty global config
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default(), ScopeConfig::default())
    }

    pub fn with_options(options: EngineOptions, config: ScopeConfig) -> Self {
        let engine = Engine::new(options);
        let global = Scope::global(engine.cheap_clone(), config);
        Self { engine, global }
    }

    /// Evaluate a program in the global scope
    pub fn eval_program(&self, program: &Program) -> Result<JsValue, JsError> {
        self.global.evaluate_program(program)
    }

    /// Deserialize ESTree JSON and evaluate it
    pub fn eval_json(&self, json: &str) -> Result<JsValue, JsError> {
        let program = Program::from_json(json)?;
        self.eval_program(&program)
    }

    pub fn engine(&self) -> &Rc<Engine> {
        &self.engine
    }

    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    /// Current value of a global binding (undefined when unbound)
    pub fn get_global(&self, name: &str) -> JsValue {
        self.global.lookup(name)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
