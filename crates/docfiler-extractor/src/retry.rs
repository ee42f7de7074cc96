//! Bounded, sequential retries around a single field extraction

use crate::error::AttemptError;
use crate::events::{AttemptEvent, AttemptObserver};
use crate::types::{AttemptFailure, ExtractionAttempt, Supervised};
use docfiler_domain::FieldName;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Runs an attempt up to `max_attempts` times until one succeeds
///
/// Attempt errors never escape: each one is reported to the observer and
/// kept in the returned `Supervised`. A panicking attempt counts as a
/// transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySupervisor {
    max_attempts: u32,
}

impl RetrySupervisor {
    /// Default attempt budget
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Create a supervisor; a budget of 0 is raised to 1
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Attempt budget
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Call `attempt` (with the 1-based attempt number) until it succeeds or
    /// the budget is spent
    pub async fn run<F, Fut>(
        &self,
        field: FieldName,
        observer: &dyn AttemptObserver,
        mut attempt: F,
    ) -> Supervised
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ExtractionAttempt>,
    {
        let max_attempts = self.max_attempts;
        let mut failures = Vec::new();

        for number in 1..=max_attempts {
            observer.on_event(&AttemptEvent::Started {
                field,
                attempt: number,
                max_attempts,
            });

            let result = AssertUnwindSafe(attempt(number))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(panicked(payload.as_ref())));

            match result {
                Ok(value) => {
                    observer.on_event(&AttemptEvent::Succeeded {
                        field,
                        attempt: number,
                    });
                    return Supervised {
                        value: Some(value),
                        attempts: number,
                        failures,
                    };
                }
                Err(error) => {
                    observer.on_event(&AttemptEvent::Failed {
                        field,
                        attempt: number,
                        max_attempts,
                        error: error.clone(),
                    });
                    failures.push(AttemptFailure {
                        attempt: number,
                        error,
                    });
                }
            }
        }

        observer.on_event(&AttemptEvent::Exhausted {
            field,
            attempts: max_attempts,
        });
        Supervised {
            value: None,
            attempts: max_attempts,
            failures,
        }
    }
}

fn panicked(payload: &(dyn Any + Send)) -> AttemptError {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("no message");
    AttemptError::Transport(format!("attempt panicked: {}", message))
}

impl Default for RetrySupervisor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use docfiler_domain::FieldValue;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_fail_fail_succeed() {
        let supervisor = RetrySupervisor::default();
        let observer = RecordingObserver::new();

        let outcome = supervisor
            .run(FieldName::Date, &observer, |number| async move {
                if number < 3 {
                    Err(AttemptError::Transport(format!("failure {}", number)))
                } else {
                    Ok(FieldValue::new("2024-08-01"))
                }
            })
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.value, Some(FieldValue::new("2024-08-01")));
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(
            outcome.failures.iter().map(|f| f.attempt).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(observer.failures_for(FieldName::Date).len(), 2);
    }

    #[tokio::test]
    async fn test_always_failing_uses_exactly_the_budget() {
        let supervisor = RetrySupervisor::new(3);
        let observer = RecordingObserver::new();
        let calls = Cell::new(0u32);

        let outcome = supervisor
            .run(FieldName::Type, &observer, |_| {
                calls.set(calls.get() + 1);
                async { Err(AttemptError::SchemaViolation("'contrat' is not allowed".into())) }
            })
            .await;

        assert!(!outcome.is_success());
        assert_eq!(calls.get(), 3);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.failures.len(), 3);
        assert_eq!(
            observer.events().last(),
            Some(&AttemptEvent::Exhausted {
                field: FieldName::Type,
                attempts: 3,
            })
        );
    }

    #[tokio::test]
    async fn test_panicking_attempt_is_a_transport_failure() {
        let supervisor = RetrySupervisor::default();
        let observer = RecordingObserver::new();

        let outcome = supervisor
            .run(FieldName::Date, &observer, |number| async move {
                if number == 1 {
                    panic!("backend crashed");
                }
                Ok(FieldValue::new("2024-08-01"))
            })
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts, 2);
        assert_eq!(
            outcome.failures[0].error,
            AttemptError::Transport("attempt panicked: backend crashed".to_string())
        );
        assert_eq!(observer.failures_for(FieldName::Date).len(), 1);
    }

    #[tokio::test]
    async fn test_first_success_stops() {
        let supervisor = RetrySupervisor::new(5);
        let observer = RecordingObserver::new();
        let calls = Cell::new(0u32);

        let outcome = supervisor
            .run(FieldName::Emitter, &observer, |_| {
                calls.set(calls.get() + 1);
                async { Ok(FieldValue::new("EDF")) }
            })
            .await;

        assert_eq!(calls.get(), 1);
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.failures.is_empty());
        assert_eq!(
            observer.events(),
            vec![
                AttemptEvent::Started {
                    field: FieldName::Emitter,
                    attempt: 1,
                    max_attempts: 5,
                },
                AttemptEvent::Succeeded {
                    field: FieldName::Emitter,
                    attempt: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_reported_between_attempts() {
        let supervisor = RetrySupervisor::new(2);
        let observer = RecordingObserver::new();

        supervisor
            .run(FieldName::Subject, &observer, |_| async {
                Err(AttemptError::NoStructuredAnswer("free text".into()))
            })
            .await;

        let kinds: Vec<&str> = observer
            .events()
            .iter()
            .map(|event| match event {
                AttemptEvent::Started { .. } => "started",
                AttemptEvent::Failed { .. } => "failed",
                AttemptEvent::Succeeded { .. } => "succeeded",
                AttemptEvent::Exhausted { .. } => "exhausted",
            })
            .collect();
        assert_eq!(kinds, vec!["started", "failed", "started", "failed", "exhausted"]);
    }

    #[test]
    fn test_zero_budget_is_raised() {
        assert_eq!(RetrySupervisor::new(0).max_attempts(), 1);
    }
}
