//! Collaborator seams — execution, page analysis, navigation
//! verification.
//!
//! The engine consumes the live browser exclusively through these three
//! traits. Ordinary web failures (missing elements, timeouts) flow back
//! as data inside [`ActionOutcome`]; only a genuinely unexpected fault
//! is an `Err`, and only the analyzer can raise one.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::PageContext;
use crate::planner::intent::ActionIntent;

/// Ordinary ways an action can fail. These are data, not errors; the
/// phase-level policy decides what happens next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionErrorKind {
    ElementNotFound,
    NotInteractable,
    Timeout,
    NavigationFailed,
    Other(String),
}

impl ActionErrorKind {
    /// Transient kinds are worth a bounded retry; the rest are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, ActionErrorKind::Timeout | ActionErrorKind::NotInteractable)
    }
}

impl fmt::Display for ActionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionErrorKind::ElementNotFound => f.write_str("element not found"),
            ActionErrorKind::NotInteractable => f.write_str("element not interactable"),
            ActionErrorKind::Timeout => f.write_str("timed out"),
            ActionErrorKind::NavigationFailed => f.write_str("navigation failed"),
            ActionErrorKind::Other(reason) => f.write_str(reason),
        }
    }
}

/// Result of executing one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub succeeded: bool,
    /// Wall-clock the execution consumed.
    pub observed_duration: Duration,
    /// Populated when `succeeded` is false.
    pub error_kind: Option<ActionErrorKind>,
}

impl ActionOutcome {
    pub fn ok(observed: Duration) -> Self {
        Self {
            succeeded: true,
            observed_duration: observed,
            error_kind: None,
        }
    }

    pub fn failed(kind: ActionErrorKind, observed: Duration) -> Self {
        Self {
            succeeded: false,
            observed_duration: observed,
            error_kind: Some(kind),
        }
    }
}

/// Executes planned intents against the live page.
///
/// Implementations must not fail for ordinary conditions — a missing or
/// stale element is reported through `error_kind`, never a panic.
#[async_trait]
pub trait ActionExecutor: Send {
    async fn execute(&mut self, intent: &ActionIntent) -> ActionOutcome;
}

/// Produces fresh page snapshots. Called at least once per phase; must
/// be cheap enough for that cadence.
#[async_trait]
pub trait PageAnalyzer: Send {
    /// An `Err` here is an unexpected fault: the session finalizes its
    /// record and propagates it.
    async fn analyze(&mut self) -> anyhow::Result<PageContext>;
}

/// Confirms the browser landed where the session intended.
#[async_trait]
pub trait NavigationVerifier: Send {
    async fn verify(&mut self, expected_identifier: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_kinds_are_retryable() {
        assert!(ActionErrorKind::Timeout.is_transient());
        assert!(ActionErrorKind::NotInteractable.is_transient());
        assert!(!ActionErrorKind::ElementNotFound.is_transient());
        assert!(!ActionErrorKind::Other("page exploded".into()).is_transient());
    }

    #[test]
    fn outcome_constructors_agree_with_their_flags() {
        let ok = ActionOutcome::ok(Duration::from_millis(120));
        assert!(ok.succeeded && ok.error_kind.is_none());
        let failed = ActionOutcome::failed(ActionErrorKind::Timeout, Duration::from_secs(30));
        assert!(!failed.succeeded);
        assert_eq!(failed.error_kind, Some(ActionErrorKind::Timeout));
    }

    #[test]
    fn mock_executor_drives_through_the_trait() {
        use crate::planner::intent::{ActionIntent, ActionType};

        #[derive(Debug)]
        struct EchoExecutor;

        #[async_trait]
        impl ActionExecutor for EchoExecutor {
            async fn execute(&mut self, intent: &ActionIntent) -> ActionOutcome {
                ActionOutcome::ok(
                    intent
                        .params
                        .duration
                        .unwrap_or_else(|| Duration::from_secs(1)),
                )
            }
        }

        let mut executor = EchoExecutor;
        let intent = ActionIntent::bare(ActionType::WaitObserve, 0.5);
        let outcome = tokio_test::block_on(executor.execute(&intent));
        assert!(outcome.succeeded);
        assert_eq!(outcome.observed_duration, Duration::from_secs(1));
    }
}
