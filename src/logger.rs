//! Process-wide logger state
//!
//! [`Logger`] owns the configuration (level, rotation, sink toggles) and the
//! file writer, and exposes [`Logger::emit`], the single funnel every message
//! goes through: level gate, format, file, console.
//!
//! Most programs use the shared instance returned by [`logger()`], created on
//! first access and kept until the process exits. Tests and embedders can
//! construct their own.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use chrono::Local;

use crate::config::default_log_dir;
use crate::error::{Error, Result};
use crate::file_writer::{FileSinkState, FileWriter, LogFileInfo};
use crate::level::LogLevel;
use crate::record::LogRecord;
use crate::rotation::{self, RotationPolicy, RotationSettings};
use crate::router::{self, Route};

/// Category used for the logger's own diagnostics
pub const LOGGER_CATEGORY: &str = "mlog.logger";

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

/// Get the process-wide logger, creating it on first use
pub fn logger() -> &'static Logger {
    GLOBAL.get_or_init(|| Arc::new(Logger::new())).as_ref()
}

/// Get a shared handle to the process-wide logger
pub fn shared_logger() -> Arc<Logger> {
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(Logger::new())))
}

/// Logger with a console sink and a rotating file sink
pub struct Logger {
    level: AtomicU8,
    console_enabled: AtomicBool,
    rotation: RwLock<RotationSettings>,
    writer: FileWriter,
    console: Mutex<Box<dyn Write + Send>>,
    /// Serializes enable/disable of the file sink
    reconfigure: Mutex<()>,
}

impl Logger {
    /// Create a logger that prints to stderr with the file sink disabled
    pub fn new() -> Self {
        Self::with_console_writer(Box::new(io::stderr()))
    }

    /// Create a logger whose console sink is `console`
    pub fn with_console_writer(console: Box<dyn Write + Send>) -> Self {
        Self {
            level: AtomicU8::new(LogLevel::default() as u8),
            console_enabled: AtomicBool::new(true),
            rotation: RwLock::new(RotationSettings::default()),
            writer: FileWriter::new(),
            console: Mutex::new(console),
            reconfigure: Mutex::new(()),
        }
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Set the verbosity ceiling
    pub fn set_log_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Choose how the file sink rotates on the next [`Logger::enable_log_to_file`]
    ///
    /// `retention` is the number of historical files kept besides the active one.
    pub fn set_log_rotation(&self, policy: RotationPolicy, retention: usize) {
        let policy = match policy {
            RotationPolicy::Timestamped { format }
                if !rotation::is_valid_timestamp_format(&format) =>
            {
                self.report(
                    LogLevel::Warning,
                    format_args!("Invalid timestamp format '{}', using default", format),
                );
                RotationPolicy::timestamped()
            }
            other => other,
        };
        if let Ok(mut settings) = self.rotation.write() {
            settings.policy = policy;
            settings.retention = retention;
        }
    }

    /// Set the log file extension, e.g. ".log" or ".txt"
    pub fn set_log_extension(&self, extension: impl Into<String>) {
        if let Ok(mut settings) = self.rotation.write() {
            settings.extension = extension.into();
        }
    }

    /// Current rotation settings
    pub fn rotation(&self) -> RotationSettings {
        self.rotation
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn enable_log_to_console(&self) {
        self.console_enabled.store(true, Ordering::Relaxed);
    }

    /// Stop printing to the console. The file sink is unaffected.
    pub fn disable_log_to_console(&self) {
        self.console_enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_console_enabled(&self) -> bool {
        self.console_enabled.load(Ordering::Relaxed)
    }

    /// Check whether a message at `level` would reach any sink
    ///
    /// Callers use this to skip formatting work for filtered messages.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        router::allowed(level, self.level())
            && (self.is_console_enabled() || self.writer.is_active())
    }

    /// Rotate existing logs for `app_name` in `directory` and start writing a fresh file
    ///
    /// The directory is created if missing. Each call retires the current file
    /// once, according to the configured rotation policy. Failures are printed
    /// through the logger itself and leave the file sink disabled; they are
    /// never fatal to the host.
    pub fn enable_log_to_file(
        &self,
        app_name: &str,
        directory: impl AsRef<Path>,
    ) -> Result<LogFileInfo> {
        let dir = directory.as_ref();
        let _guard = self
            .reconfigure
            .lock()
            .map_err(|_| Error::Rotation("reconfiguration lock poisoned".to_string()))?;

        self.writer.begin_opening();

        if !dir.exists() {
            self.report(LogLevel::Debug, format_args!("Creating logs directory"));
            if let Err(source) = fs::create_dir_all(dir) {
                self.writer.close();
                let err = Error::DirectoryCreateFailed {
                    path: dir.to_path_buf(),
                    source,
                };
                self.report(
                    LogLevel::Warning,
                    format_args!("Could not create logs directory! {}", err),
                );
                return Err(err);
            }
            self.report(LogLevel::Debug, format_args!("Directory was created successfully"));
        }

        let listing = rotation::scan_directory(dir).unwrap_or_else(|e| {
            self.report(
                LogLevel::Warning,
                format_args!("Could not list logs directory {}: {}", dir.display(), e),
            );
            Vec::new()
        });

        let settings = self.rotation();
        let plan = rotation::plan_rotation(&settings, &listing, app_name, Local::now());
        let outcome = rotation::apply_plan(dir, &plan);
        for skipped in &outcome.skipped {
            self.report(LogLevel::Debug, format_args!("{}", skipped));
        }
        for failed in &outcome.failed {
            self.report(LogLevel::Warning, format_args!("{}", failed));
        }

        let current = dir.join(&plan.current);
        let previous = plan
            .previous
            .as_ref()
            .map(|name| dir.join(name))
            .filter(|path| path.exists());

        self.report(
            LogLevel::Debug,
            format_args!("Opening log file {}", current.display()),
        );
        self.writer.open(&current, previous).map_err(|err| {
            self.report(
                LogLevel::Warning,
                format_args!("Could not open log file for writing! {}", err),
            );
            err
        })
    }

    /// Enable file logging in the platform documents directory
    pub fn enable_log_to_default_dir(&self, app_name: &str) -> Result<LogFileInfo> {
        self.enable_log_to_file(app_name, default_log_dir())
    }

    /// Stop writing to the log file. Console logging continues.
    ///
    /// The current and previous paths stay readable.
    pub fn disable_log_to_file(&self) {
        let _guard = self.reconfigure.lock();
        self.writer.close();
    }

    pub fn file_sink_state(&self) -> FileSinkState {
        self.writer.state()
    }

    pub fn is_file_enabled(&self) -> bool {
        self.writer.is_active()
    }

    /// Path of the active log file, `None` before the first successful enable
    pub fn current_log_path(&self) -> Option<PathBuf> {
        self.writer.current_path()
    }

    /// Path of the log retired by the last enable, if it exists
    pub fn previous_log_path(&self) -> Option<PathBuf> {
        self.writer.previous_path()
    }

    /// Current and previous paths read together
    pub fn log_file_info(&self) -> Option<LogFileInfo> {
        self.writer.info()
    }

    /// Emit a message
    ///
    /// Formatting happens only after the level gate passes.
    pub fn emit(
        &self,
        level: LogLevel,
        category: Option<&str>,
        location: &str,
        args: fmt::Arguments<'_>,
    ) {
        let Some(route) = self.route(level) else {
            return;
        };
        let record = LogRecord::new(level, location, args.to_string()).with_category(category);
        self.deliver(route, &record.format_line());
    }

    /// Emit an already built record
    pub fn log(&self, record: &LogRecord<'_>) {
        if let Some(route) = self.route(record.level) {
            self.deliver(route, &record.format_line());
        }
    }

    fn route(&self, level: LogLevel) -> Option<Route> {
        router::route(
            level,
            self.level(),
            self.is_console_enabled(),
            self.writer.is_active(),
        )
    }

    fn deliver(&self, route: Route, line: &str) {
        if route.file {
            // Not-ready and I/O failures only cost the file copy
            let _ = self.writer.append(line);
        }
        if route.console {
            if let Ok(mut console) = self.console.lock() {
                let _ = console.write_all(line.as_bytes());
                let _ = console.flush();
            }
        }
    }

    fn report(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.emit(level, Some(LOGGER_CATEGORY), module_path!(), args);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("console_enabled", &self.is_console_enabled())
            .field("file_sink", &self.file_sink_state())
            .field("rotation", &self.rotation())
            .finish()
    }
}
