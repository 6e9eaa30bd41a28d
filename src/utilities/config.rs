//! Tunable engine configuration.
//!
//! The defaults reproduce the reference behavior; every table here is a
//! plausible humanlike default rather than a derived constant, so callers
//! are expected to tune them. All types deserialize, letting the
//! surrounding application load overrides from its own config source.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Weights of the session-continuation probability.
///
/// The four terms are interest, rest (`1 - fatigue`), clarity
/// (`1 - cognitive load`) and exploration satisfaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuationWeights {
    pub interest: f64,
    pub rest: f64,
    pub clarity: f64,
    pub satisfaction: f64,
}

impl Default for ContinuationWeights {
    fn default() -> Self {
        Self {
            interest: 0.4,
            rest: 0.3,
            clarity: 0.2,
            satisfaction: 0.1,
        }
    }
}

/// Anti-repetition tracker settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityConfig {
    /// How many recent selections damp a repeated category.
    pub window: usize,
    /// Selections between full window resets.
    pub reset_after: usize,
    /// Entries retained across a reset.
    pub retain: usize,
    /// Per-occurrence weight multiplier for recently chosen categories.
    pub damping: f64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            window: 10,
            reset_after: 50,
            retain: 20,
            damping: 0.5,
        }
    }
}

/// Top-level engine configuration, injected into the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Continuation probability weights.
    pub continuation: ContinuationWeights,
    /// Anti-repetition settings.
    pub diversity: DiversityConfig,
    /// Hard per-phase action ceiling (anti-runaway safeguard).
    pub max_phase_actions: u32,
    /// Upper bound on a single executed action.
    pub action_timeout: Duration,
    /// Retries granted to transient failures of phase-critical actions.
    pub transient_retries: u32,
    /// Minimum confidence for a target acquisition candidate to win.
    pub acquisition_threshold: f64,
    /// Global clamp on the exploration budget, seconds.
    pub budget_bounds: (f64, f64),
    /// Result-scanning sub-loop window, seconds.
    pub scan_window: (f64, f64),
    /// Settle time granted before the one navigation recheck, seconds.
    pub redirect_grace_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            continuation: ContinuationWeights::default(),
            diversity: DiversityConfig::default(),
            max_phase_actions: 25,
            action_timeout: Duration::from_secs(30),
            transient_retries: 2,
            acquisition_threshold: 0.5,
            budget_bounds: (30.0, 600.0),
            scan_window: (5.0, 15.0),
            redirect_grace_secs: 2.0,
        }
    }
}
