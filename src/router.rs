//! Level gating and sink selection
//!
//! Pure decisions only. The logger consults these before paying for
//! formatting or I/O.

use crate::level::LogLevel;

/// Sinks a message should be delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub console: bool,
    pub file: bool,
}

/// Check whether a message at `level` passes the configured ceiling
///
/// A configured level of `None` blocks everything, including fatal messages.
pub fn allowed(level: LogLevel, configured: LogLevel) -> bool {
    level != LogLevel::None && level <= configured
}

/// Decide where a message goes, or `None` if it is dropped
pub fn route(
    level: LogLevel,
    configured: LogLevel,
    console_enabled: bool,
    file_enabled: bool,
) -> Option<Route> {
    if !allowed(level, configured) || !(console_enabled || file_enabled) {
        return None;
    }
    Some(Route {
        console: console_enabled,
        file: file_enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_matches_ordering() {
        for configured in LogLevel::ALL {
            for level in LogLevel::ALL {
                let expected = level != LogLevel::None && level <= configured;
                assert_eq!(allowed(level, configured), expected);
            }
        }
    }

    #[test]
    fn test_none_blocks_fatal() {
        assert!(!allowed(LogLevel::Fatal, LogLevel::None));
        assert!(allowed(LogLevel::Fatal, LogLevel::Fatal));
    }

    #[test]
    fn test_warning_ceiling() {
        let passed: Vec<LogLevel> = [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Critical,
            LogLevel::Fatal,
        ]
        .into_iter()
        .filter(|l| allowed(*l, LogLevel::Warning))
        .collect();
        assert_eq!(
            passed,
            vec![LogLevel::Warning, LogLevel::Critical, LogLevel::Fatal]
        );
    }

    #[test]
    fn test_route_sinks() {
        assert_eq!(
            route(LogLevel::Info, LogLevel::Debug, true, false),
            Some(Route {
                console: true,
                file: false
            })
        );
        assert_eq!(
            route(LogLevel::Info, LogLevel::Debug, true, true),
            Some(Route {
                console: true,
                file: true
            })
        );
        assert_eq!(route(LogLevel::Info, LogLevel::Debug, false, false), None);
        assert_eq!(route(LogLevel::Debug, LogLevel::Info, true, true), None);
    }
}
