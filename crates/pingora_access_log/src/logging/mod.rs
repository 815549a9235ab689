pub mod format;
pub mod logger;
pub mod logging_middleware;
pub mod options;
pub mod status_writer;
pub mod tracing_logger;

pub use format::{StatusClass, format_color, format_line, format_plain};
pub use logger::{Logger, MemoryLogger, StderrLogger};
pub use logging_middleware::{LoggingHandler, LoggingMiddleware};
pub use options::Options;
pub use status_writer::StatusWriter;
pub use tracing_logger::TracingLogger;
