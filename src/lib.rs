//! mlog - process-wide logger with console and rotating file sinks
//!
//! Every message goes through one [`Logger`]: it is checked against the
//! configured [`LogLevel`], formatted as a single line, appended to the active
//! log file when file logging is enabled, and printed to the console.
//!
//! ```no_run
//! mlog::logger().enable_log_to_file("MyApp", "/tmp/my-app/logs")?;
//! mlog::info!(target: "core.main", "Logger successfully created");
//! # Ok::<(), mlog::Error>(())
//! ```

pub mod config;
mod error;
pub mod file_writer;
pub mod layer;
pub mod level;
pub mod logger;
mod macros;
pub mod record;
pub mod rotation;
pub mod router;

#[cfg(test)]
mod test_support;

pub use config::{default_log_dir, LoggerConfig};
pub use error::{Error, Result};
pub use file_writer::{FileSinkState, LogFileInfo};
pub use layer::MlogLayer;
pub use level::LogLevel;
pub use logger::{logger, shared_logger, Logger, LOGGER_CATEGORY};
pub use record::LogRecord;
pub use rotation::{RotationPolicy, RotationSettings};
