//! Logging setup.

mod logging;

pub use logging::{log_filter, setup_logging_with_file};
pub use tracing_appender::non_blocking::WorkerGuard;
