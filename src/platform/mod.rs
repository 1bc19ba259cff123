//! Platform abstraction for console output
//!
//! Script-visible `console.*` and `log(..)` calls are routed through a
//! [`ConsoleProvider`] so embedders decide where output goes.

mod std_impl;

use std::cell::RefCell;

pub use std_impl::StdConsoleProvider;

/// Log level for console output.
///
/// Maps to the different console methods: console.log(), console.warn(), etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    /// console.log() and the global log()
    Log,
    /// console.info()
    Info,
    /// console.debug()
    Debug,
    /// console.warn()
    Warn,
    /// console.error()
    Error,
}

/// Trait for handling console output.
pub trait ConsoleProvider {
    /// Write a message at the specified log level.
    fn write(&self, level: ConsoleLevel, message: &str);
}

/// A console provider that discards all output.
pub struct NoOpConsoleProvider;

impl ConsoleProvider for NoOpConsoleProvider {
    fn write(&self, _level: ConsoleLevel, _message: &str) {}
}

/// A console provider that records every line in memory.
///
/// Useful for tests and for hosts that forward output themselves.
#[derive(Debug, Default)]
pub struct BufferConsoleProvider {
    lines: RefCell<Vec<(ConsoleLevel, String)>>,
}

impl BufferConsoleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines with their levels
    pub fn entries(&self) -> Vec<(ConsoleLevel, String)> {
        self.lines.borrow().clone()
    }

    /// Recorded messages, ignoring levels
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl ConsoleProvider for BufferConsoleProvider {
    fn write(&self, level: ConsoleLevel, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}
