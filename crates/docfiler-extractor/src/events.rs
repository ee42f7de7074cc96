//! Attempt events emitted by the retry supervisor

use crate::error::AttemptError;
use docfiler_domain::FieldName;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Something that happened while extracting one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEvent {
    /// An attempt is about to query the backend
    Started {
        /// Field being extracted
        field: FieldName,
        /// Attempt number, from 1
        attempt: u32,
        /// Attempt budget
        max_attempts: u32,
    },

    /// An attempt failed; another may follow
    Failed {
        /// Field being extracted
        field: FieldName,
        /// Attempt number, from 1
        attempt: u32,
        /// Attempt budget
        max_attempts: u32,
        /// Why it failed
        error: AttemptError,
    },

    /// An attempt produced a value
    Succeeded {
        /// Field being extracted
        field: FieldName,
        /// Attempt number, from 1
        attempt: u32,
    },

    /// Every attempt failed
    Exhausted {
        /// Field being extracted
        field: FieldName,
        /// Attempts made
        attempts: u32,
    },
}

impl AttemptEvent {
    /// Field the event is about
    pub fn field(&self) -> FieldName {
        match self {
            AttemptEvent::Started { field, .. }
            | AttemptEvent::Failed { field, .. }
            | AttemptEvent::Succeeded { field, .. }
            | AttemptEvent::Exhausted { field, .. } => *field,
        }
    }
}

/// Receives attempt events; presentation is up to the implementation
pub trait AttemptObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &AttemptEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AttemptObserver for TracingObserver {
    fn on_event(&self, event: &AttemptEvent) {
        match event {
            AttemptEvent::Started {
                field,
                attempt,
                max_attempts,
            } => debug!(%field, attempt, max_attempts, "Extraction attempt started"),
            AttemptEvent::Failed {
                field,
                attempt,
                max_attempts,
                error,
            } => warn!(
                %field,
                attempt,
                max_attempts,
                kind = error.kind(),
                "Extraction attempt failed: {}",
                error
            ),
            AttemptEvent::Succeeded { field, attempt } => {
                debug!(%field, attempt, "Extraction attempt succeeded")
            }
            AttemptEvent::Exhausted { field, attempts } => {
                warn!(%field, attempts, "Giving up on field after {} attempts", attempts)
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<AttemptEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order
    pub fn events(&self) -> Vec<AttemptEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Failures recorded for one field
    pub fn failures_for(&self, field: FieldName) -> Vec<AttemptError> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                AttemptEvent::Failed {
                    field: f, error, ..
                } if f == field => Some(error),
                _ => None,
            })
            .collect()
    }
}

impl AttemptObserver for RecordingObserver {
    fn on_event(&self, event: &AttemptEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.on_event(&AttemptEvent::Started {
            field: FieldName::Date,
            attempt: 1,
            max_attempts: 3,
        });
        observer.on_event(&AttemptEvent::Failed {
            field: FieldName::Date,
            attempt: 1,
            max_attempts: 3,
            error: AttemptError::Transport("timeout".into()),
        });
        observer.on_event(&AttemptEvent::Succeeded {
            field: FieldName::Type,
            attempt: 1,
        });

        let events = observer.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].field(), FieldName::Type);
        assert_eq!(
            observer.failures_for(FieldName::Date),
            vec![AttemptError::Transport("timeout".into())]
        );
        assert!(observer.failures_for(FieldName::Type).is_empty());
    }

    #[test]
    fn test_tracing_observer_accepts_every_event() {
        let observer = TracingObserver;
        observer.on_event(&AttemptEvent::Exhausted {
            field: FieldName::Emitter,
            attempts: 3,
        });
    }
}
