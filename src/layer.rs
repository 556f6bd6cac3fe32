//! `tracing` integration
//!
//! Hosts that already instrument with `tracing` can install [`MlogLayer`] on
//! their subscriber to route events through a [`Logger`]. Nothing is
//! installed implicitly.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::level::LogLevel;
use crate::logger::{shared_logger, Logger};

/// A `tracing_subscriber` layer that forwards events to a [`Logger`]
#[derive(Debug, Clone)]
pub struct MlogLayer {
    logger: Arc<Logger>,
}

impl MlogLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Layer that forwards to the process-wide logger
    pub fn global() -> Self {
        Self::new(shared_logger())
    }
}

/// Collects the `message` field and renders the rest as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for MlogLayer {
    // Gate here rather than in `enabled` so level changes apply immediately
    // and other layers on the same subscriber still see every event.
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = LogLevel::from(*metadata.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let location = metadata.module_path().unwrap_or_else(|| metadata.target());
        let category = Some(metadata.target()).filter(|target| *target != location);
        self.logger.emit(
            level,
            category,
            location,
            format_args!("{}{}", visitor.message, visitor.fields),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capturing_logger;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_events_are_forwarded() {
        let (logger, console) = capturing_logger();
        let logger = Arc::new(logger);
        logger.set_log_level(LogLevel::Info);
        let subscriber = tracing_subscriber::registry().with(MlogLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("hello {}", 1);
            tracing::warn!(target: "net", peer = "a", "dropped");
            tracing::error!(code = 7, "failed");
            tracing::debug!("hidden");
        });

        let lines = console.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("|info|mlog::layer::tests: hello 1"));
        assert!(lines[1].ends_with("|warning|net|mlog::layer::tests: dropped peer=a"));
        assert!(lines[2].ends_with("|critical|mlog::layer::tests: failed code=7"));
    }

    #[test]
    fn test_level_changes_apply_to_seen_callsites() {
        let (logger, console) = capturing_logger();
        let logger = Arc::new(logger);
        let subscriber = tracing_subscriber::registry().with(MlogLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            for level in [LogLevel::None, LogLevel::Debug] {
                logger.set_log_level(level);
                tracing::info!("same callsite");
            }
        });

        assert_eq!(console.lines().len(), 1);
    }
}
