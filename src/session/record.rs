//! Session diagnostics record.
//!
//! The record is appended to throughout a session and sealed exactly
//! once at termination. Mutation is crate-internal; callers receive the
//! sealed record by value and can only read it, so a sealed record is
//! immutable by construction. The exact on-disk schema belongs to the
//! surrounding application — this type only guarantees it serializes.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cognition::CognitiveSnapshot;
use crate::interfaces::ActionErrorKind;
use crate::planner::intent::ActionType;

use super::phase::Phase;

/// Terminal status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatus {
    Success,
    Failure,
    Cancelled,
}

/// Why a session terminated with `Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// The search surface never loaded, even after the retry.
    LoadFailed,
    /// Query submission was not acknowledged (hard precondition).
    QuerySubmissionFailed,
    /// No acquisition strategy matched and no fallback applied.
    TargetNotFound,
    /// The destination never verified, even after the recheck.
    NavigationMismatch,
    /// A phase-critical action kept failing past its retry allowance.
    ActionRetriesExhausted,
    /// A collaborator faulted outside the ordinary taxonomy.
    CollaboratorFault,
}

/// One executed action with its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub phase: Phase,
    pub action: ActionType,
    pub confidence: f64,
    pub succeeded: bool,
    pub observed: Duration,
    pub error_kind: Option<ActionErrorKind>,
}

/// A phase transition in the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub phase: Phase,
    /// Wall-clock offset from session start.
    pub offset: Duration,
}

/// Ordered trace of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    session_id: Uuid,
    persona_key: String,
    query: String,
    target: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    phases: Vec<PhaseEvent>,
    actions: Vec<ActionRecord>,
    refinements: u32,
    target_found: Option<bool>,
    final_state: Option<CognitiveSnapshot>,
    total_duration: Duration,
    status: Option<TerminalStatus>,
    failure_cause: Option<FailureCause>,
    #[serde(skip, default = "Instant::now")]
    started: Instant,
}

impl SessionRecord {
    pub(crate) fn begin(persona_key: &str, query: &str, target: &str) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            persona_key: persona_key.to_string(),
            query: query.to_string(),
            target: target.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            phases: Vec::new(),
            actions: Vec::new(),
            refinements: 0,
            target_found: None,
            final_state: None,
            total_duration: Duration::ZERO,
            status: None,
            failure_cause: None,
            started: Instant::now(),
        }
    }

    pub(crate) fn enter_phase(&mut self, phase: Phase) {
        debug_assert!(self.status.is_none(), "phase entered after seal");
        self.phases.push(PhaseEvent {
            phase,
            offset: self.started.elapsed(),
        });
    }

    pub(crate) fn push_action(&mut self, action: ActionRecord) {
        debug_assert!(self.status.is_none(), "action recorded after seal");
        self.actions.push(action);
    }

    pub(crate) fn note_refinement(&mut self) {
        self.refinements += 1;
    }

    pub(crate) fn mark_target(&mut self, found: bool) {
        self.target_found = Some(found);
    }

    /// Wall-clock elapsed since session start.
    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Finalize the record. Idempotent: the first seal wins.
    pub(crate) fn seal(
        &mut self,
        status: TerminalStatus,
        cause: Option<FailureCause>,
        final_state: CognitiveSnapshot,
    ) {
        if self.status.is_some() {
            return;
        }
        self.status = Some(status);
        self.failure_cause = cause;
        self.final_state = Some(final_state);
        self.ended_at = Some(Utc::now());
        self.total_duration = self.started.elapsed();
    }

    // ---- Read access ----

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn persona_key(&self) -> &str {
        &self.persona_key
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Phase transitions in visitation order.
    pub fn phases(&self) -> &[PhaseEvent] {
        &self.phases
    }

    /// Every issued intent with its outcome.
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn refinements(&self) -> u32 {
        self.refinements
    }

    /// `Some(true)` once the target was acquired, `Some(false)` when the
    /// session proceeded on an alternative result.
    pub fn target_found(&self) -> Option<bool> {
        self.target_found
    }

    pub fn final_state(&self) -> Option<&CognitiveSnapshot> {
        self.final_state.as_ref()
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// `None` until the record is sealed.
    pub fn status(&self) -> Option<TerminalStatus> {
        self.status
    }

    pub fn failure_cause(&self) -> Option<FailureCause> {
        self.failure_cause
    }

    pub fn is_sealed(&self) -> bool {
        self.status.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
