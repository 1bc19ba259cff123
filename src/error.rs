//! Error types for the evaluator

use thiserror::Error;

use crate::value::JsValue;

/// Stack frame for error traces
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    pub function_name: Option<String>,
    /// Definition site of the function, when the syntax tree carried `loc`
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl std::fmt::Display for StackFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.function_name.as_deref().unwrap_or("<anonymous>");
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "    at {} (<eval>:{}:{})", name, line, column),
            _ => write!(f, "    at {}", name),
        }
    }
}

/// Main error type for the evaluator
///
/// The first four variants are catchable by script `try`/`catch`. `Internal`
/// (unsupported syntax, malformed trees) and `Timeout` always propagate to the
/// embedder.
#[derive(Debug, Error)]
pub enum JsError {
    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("ReferenceError: {message}")]
    ReferenceError { message: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    /// A script-level `throw` of an arbitrary value
    #[error("Uncaught {description}{}", format_stack(.stack))]
    Thrown {
        value: JsValue,
        /// Best-effort string rendering of `value`
        description: String,
        stack: Vec<StackFrame>,
    },

    #[error("Internal error: {message}{}", format_stack(.stack))]
    Internal {
        message: String,
        stack: Vec<StackFrame>,
    },

    #[error("Execution timeout: exceeded {timeout_ms}ms limit (elapsed: {elapsed_ms}ms)")]
    Timeout { timeout_ms: u64, elapsed_ms: u64 },

    #[error("Invalid syntax tree: {0}")]
    InvalidTree(#[from] serde_json::Error),
}

fn format_stack(stack: &[StackFrame]) -> String {
    stack.iter().map(|frame| format!("\n{}", frame)).collect()
}

impl JsError {
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::TypeError {
            message: message.into(),
        }
    }

    pub fn reference_error(message: impl Into<String>) -> Self {
        JsError::ReferenceError {
            message: message.into(),
        }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::RangeError {
            message: message.into(),
        }
    }

    /// Internal fault with no stack information
    pub fn internal(message: impl Into<String>) -> Self {
        JsError::Internal {
            message: message.into(),
            stack: Vec::new(),
        }
    }

    /// Whether script-level `catch` may intercept this error
    pub fn is_catchable(&self) -> bool {
        matches!(
            self,
            JsError::TypeError { .. }
                | JsError::ReferenceError { .. }
                | JsError::RangeError { .. }
                | JsError::Thrown { .. }
        )
    }

    /// The thrown value, for errors raised by a script `throw`
    pub fn thrown_value(&self) -> Option<&JsValue> {
        match self {
            JsError::Thrown { value, .. } => Some(value),
            _ => None,
        }
    }
}
