//! Embedder-facing configuration

use std::fmt;
use std::rc::Rc;

use crate::platform::{ConsoleProvider, StdConsoleProvider};
use crate::value::{JsString, JsValue};

/// Default limit on nested script calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Engine-wide settings, fixed at construction
#[derive(Clone)]
pub struct EngineOptions {
    /// Nested script calls allowed before a RangeError is raised
    pub max_call_depth: usize,
    /// Wall-clock budget per top-level program; 0 disables the check
    pub timeout_ms: u64,
    /// Destination of `log(..)` and `console.*` output
    pub console: Rc<dyn ConsoleProvider>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_console(mut self, console: Rc<dyn ConsoleProvider>) -> Self {
        self.console = console;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            timeout_ms: 0,
            console: Rc::new(StdConsoleProvider::new()),
        }
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("max_call_depth", &self.max_call_depth)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

/// Per-global-scope settings
#[derive(Debug, Clone, Default)]
pub struct ScopeConfig {
    /// `this` at the top level of the program
    pub this_value: JsValue,
    /// Extra bindings installed after the standard globals, in order
    pub variables: Vec<(JsString, JsValue)>,
}

impl ScopeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_this(mut self, this_value: JsValue) -> Self {
        self.this_value = this_value;
        self
    }

    /// Add a mutable global binding; later entries shadow standard globals
    pub fn with_variable(mut self, name: impl Into<JsString>, value: JsValue) -> Self {
        self.variables.push((name.into(), value));
        self
    }
}
