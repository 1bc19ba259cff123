//! Stack growth for deep recursion
//!
//! The evaluator recurses once per nested expression, statement and script
//! call. Host stack usage per script call is large, so every recursive entry
//! point goes through [`ensure_sufficient_stack`]; the script-visible depth
//! limit is enforced separately by the engine's call stack.

/// Grow when less than this remains (100KB)
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB)
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
