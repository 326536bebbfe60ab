// Event sink adapter that mirrors every event into the log facade

use fatmend_core::{EventSink, RepairEvent};
use log::{debug, info, warn};

/// Logs each event at a level matching its severity, then forwards it.
pub struct LoggingSink<S> {
    inner: S,
}

impl<S: EventSink> LoggingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for LoggingSink<S> {
    fn emit(&mut self, event: RepairEvent) {
        match &event {
            RepairEvent::InvalidAttributeType { .. } | RepairEvent::FieldViolation { .. } => {
                warn!("{}", event)
            }
            e if e.is_repair() => info!("{}", event),
            _ => debug!("{}", event),
        }
        self.inner.emit(event);
    }
}
