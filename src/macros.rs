//! Logging macros
//!
//! Every macro checks [`Logger::is_enabled`](crate::Logger::is_enabled)
//! before its arguments are formatted. The source location is the calling
//! module path. An optional `target:` sets the category and an optional
//! `logger:` selects a logger other than the process-wide one.

/// Log a message at an explicit level
///
/// ```no_run
/// use mlog::LogLevel;
///
/// mlog::log!(LogLevel::Info, "listening on {}", 8080);
/// mlog::log!(target: "core.net", LogLevel::Warning, "peer {} dropped", "a");
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, target: $category:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = $logger;
        let level: $crate::LogLevel = $level;
        if logger.is_enabled(level) {
            logger.emit(
                level,
                ::core::option::Option::Some($category),
                ::core::module_path!(),
                ::core::format_args!($($arg)+),
            );
        }
    }};
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = $logger;
        let level: $crate::LogLevel = $level;
        if logger.is_enabled(level) {
            logger.emit(
                level,
                ::core::option::Option::None,
                ::core::module_path!(),
                ::core::format_args!($($arg)+),
            );
        }
    }};
    (target: $category:expr, $level:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::logger(), target: $category, $level, $($arg)+)
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::logger(), $level, $($arg)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr; logger: $logger:expr, target: $category:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, target: $category, $level, $($arg)+)
    };
    ($level:expr; logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $level, $($arg)+)
    };
    ($level:expr; target: $category:expr, $($arg:tt)+) => {
        $crate::log!(target: $category, $level, $($arg)+)
    };
    ($level:expr; $($arg:tt)+) => {
        $crate::log!($level, $($arg)+)
    };
}

/// Log at debug level
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__log_at!($crate::LogLevel::Debug; $($arg)+) };
}

/// Log at info level
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__log_at!($crate::LogLevel::Info; $($arg)+) };
}

/// Log at warning level
#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => { $crate::__log_at!($crate::LogLevel::Warning; $($arg)+) };
}

/// Log at critical level
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => { $crate::__log_at!($crate::LogLevel::Critical; $($arg)+) };
}

/// Log at fatal level. This does not abort the process.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => { $crate::__log_at!($crate::LogLevel::Fatal; $($arg)+) };
}
