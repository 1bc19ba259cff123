#![no_main]

use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use jswalk::platform::NoOpConsoleProvider;
use jswalk::{EngineOptions, Program, Runtime, ScopeConfig};

fuzz_target!(|data: &[u8]| {
    // Only process valid UTF-8
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    if json.len() > 10_000 {
        return;
    }

    // Most inputs are not ESTree; rejecting them must not panic either
    let Ok(program) = Program::from_json(json) else {
        return;
    };

    // Timeout guards against infinite loops, call depth against runaway recursion
    let options = EngineOptions::default()
        .with_timeout_ms(200)
        .with_max_call_depth(200)
        .with_console(Rc::new(NoOpConsoleProvider));
    let runtime = Runtime::with_options(options, ScopeConfig::default());

    // Errors are expected
    let _ = runtime.eval_program(&program);
});
