use crate::logging::Logger;
use tracing::info;

/// A logger implementation that uses the tracing crate
///
/// Each line becomes one `info` event with the line as its message.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, line: &str) {
        info!("{}", line);
    }
}
