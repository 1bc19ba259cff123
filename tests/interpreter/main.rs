//! Integration tests for the evaluator, organized by feature
//!
//! Programs are assembled from ESTree JSON with the helpers in [`builder`]
//! and run through the public API.
//!
//! Set `RUST_LOG=jswalk=trace` to see engine tracing while a test runs.

mod function;
mod global;
mod object;

use std::rc::Rc;

use jswalk::{
    BufferConsoleProvider, EngineOptions, JsError, JsValue, Program, Runtime, ScopeConfig,
};
use serde_json::{Value, json};

/// Route engine tracing to the test output once per binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wrap statements in a `Program` node
#[allow(clippy::expect_used)]
pub fn program(body: Vec<Value>) -> Program {
    Program::from_value(json!({"type": "Program", "body": body}))
        .expect("test program should deserialize")
}

/// Runtime whose console output is captured
pub fn create_test_runtime(options: EngineOptions) -> (Runtime, Rc<BufferConsoleProvider>) {
    init_tracing();
    let console = Rc::new(BufferConsoleProvider::new());
    let runtime = Runtime::with_options(
        options.with_console(console.clone()),
        ScopeConfig::default(),
    );
    (runtime, console)
}

/// Evaluate statements and return the completion value
#[allow(clippy::expect_used)]
pub fn eval(body: Vec<Value>) -> JsValue {
    eval_result(body).expect("eval failed")
}

/// Evaluate and return the Result for error testing
pub fn eval_result(body: Vec<Value>) -> Result<JsValue, JsError> {
    let (runtime, _) = create_test_runtime(EngineOptions::default());
    runtime.eval_program(&program(body))
}

/// Evaluate and return the captured console lines alongside the result
pub fn eval_with_output(body: Vec<Value>) -> (Result<JsValue, JsError>, Vec<String>) {
    let (runtime, console) = create_test_runtime(EngineOptions::default());
    let result = runtime.eval_program(&program(body));
    (result, console.messages())
}

/// Whether evaluation fails with an error whose message contains `error_contains`
pub fn throws_error(body: Vec<Value>, error_contains: &str) -> bool {
    match eval_result(body) {
        Err(e) => e.to_string().contains(error_contains),
        Ok(_) => false,
    }
}
