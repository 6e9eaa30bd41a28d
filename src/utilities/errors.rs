//! Error types for the session engine.
//!
//! Routine web failures (missing elements, timeouts, mismatched
//! navigations) are not errors: they are recorded on the session's
//! [`SessionRecord`](crate::session::SessionRecord) and resolved by the
//! phase-level fallback policy. The types here cover the few conditions
//! that genuinely escape.

use thiserror::Error;

use crate::session::phase::Phase;
use crate::session::record::SessionRecord;

/// Errors raised by the persona catalog.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// No archetype registered under the requested key.
    #[error("persona not found: {key}")]
    NotFound { key: String },

    /// A profile failed validation.
    #[error("invalid persona profile `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

/// Errors surfaced by a session run.
///
/// A faulted session still finalizes its record through the cleanup
/// path; the sealed record always travels with the error so the caller
/// never observes partial state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A collaborator failed outside the ordinary failure taxonomy
    /// (e.g. the page analyzer itself faulting).
    #[error("collaborator fault during {phase} phase: {source}")]
    Faulted {
        /// Phase the session was in when the fault occurred.
        phase: Phase,
        /// The finalized session record.
        record: Box<SessionRecord>,
        /// Underlying fault.
        #[source]
        source: anyhow::Error,
    },
}

impl SessionError {
    /// Borrow the sealed record carried by the error.
    pub fn record(&self) -> &SessionRecord {
        match self {
            SessionError::Faulted { record, .. } => record,
        }
    }
}
