use std::io::Write;
use std::sync::{Arc, Mutex};

/// Destination for access-log lines.
///
/// Implementations must not panic: lines are also emitted while a handler
/// panic is unwinding.
pub trait Logger: Send + Sync {
    fn log(&self, line: &str);
}

/// Writes each line to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrLogger;

impl Logger for StderrLogger {
    fn log(&self, line: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }
}

/// Keeps lines in memory; handy in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
