//! Transient log records and line formatting

use chrono::{DateTime, Local};

use crate::level::LogLevel;

/// Timestamp layout used at the start of every line
pub const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A single emitted message
///
/// Records live only for the duration of one delivery.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    /// When the message was emitted
    pub timestamp: DateTime<Local>,
    /// Severity of the message
    pub level: LogLevel,
    /// Optional category tag (e.g. "core.logger")
    pub category: Option<&'a str>,
    /// Where the message came from, usually a module path
    pub location: &'a str,
    /// Message text
    pub message: String,
}

impl<'a> LogRecord<'a> {
    /// Create a new record stamped with the current local time
    pub fn new(level: LogLevel, location: &'a str, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            category: None,
            location,
            message: message.into(),
        }
    }

    /// Attach a category tag
    pub fn with_category(mut self, category: Option<&'a str>) -> Self {
        self.category = category.filter(|c| !c.is_empty());
        self
    }

    /// Render the record as one newline-terminated line
    ///
    /// Format: `<time>|<severity>[|<category>]|<location>: <message>`
    pub fn format_line(&self) -> String {
        let mut line = format!(
            "{}|{}",
            self.timestamp.format(LINE_TIME_FORMAT),
            self.level.as_str()
        );
        if let Some(category) = self.category {
            line.push('|');
            line.push_str(category);
        }
        line.push('|');
        line.push_str(self.location);
        line.push_str(": ");
        line.push_str(self.message.trim_end_matches('\n'));
        line.push('\n');
        line
    }
}
