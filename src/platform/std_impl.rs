//! Standard library implementation of the console provider.

use super::{ConsoleLevel, ConsoleProvider};

/// Console provider writing to stdout/stderr.
pub struct StdConsoleProvider;

impl StdConsoleProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdConsoleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleProvider for StdConsoleProvider {
    fn write(&self, level: ConsoleLevel, message: &str) {
        match level {
            ConsoleLevel::Log | ConsoleLevel::Info | ConsoleLevel::Debug => {
                println!("{}", message);
            }
            ConsoleLevel::Warn | ConsoleLevel::Error => {
                eprintln!("{}", message);
            }
        }
    }
}
