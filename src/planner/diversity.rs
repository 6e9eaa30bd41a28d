//! Anti-repetition weighting over recent action choices.

use crate::utilities::config::DiversityConfig;

use super::intent::ActionType;

/// Tracks recently chosen actions and damps their weights so sampled
/// behavior does not collapse into a repetitive loop.
///
/// Damping compounds per occurrence inside the window, so a category
/// chosen again and again becomes strictly less likely each time — until
/// the periodic window reset lifts the suppression.
#[derive(Debug, Clone)]
pub struct DiversityTracker {
    config: DiversityConfig,
    recent: Vec<ActionType>,
    /// Selections since the last reset.
    selections: usize,
}

impl DiversityTracker {
    pub fn new(config: DiversityConfig) -> Self {
        Self {
            config,
            recent: Vec::new(),
            selections: 0,
        }
    }

    /// Damping factor for `action`, in (0, 1]. Never negative, never
    /// amplifying.
    pub fn weight_factor(&self, action: ActionType) -> f64 {
        let window = self.config.window.min(self.recent.len());
        let occurrences = self.recent[self.recent.len() - window..]
            .iter()
            .filter(|a| **a == action)
            .count();
        self.config
            .damping
            .clamp(0.0, 1.0)
            .powi(occurrences as i32)
    }

    /// Record a selection. Every `reset_after` selections the window is
    /// truncated to its `retain` newest entries so no category stays
    /// suppressed forever.
    pub fn note_selection(&mut self, action: ActionType) {
        self.recent.push(action);
        self.selections += 1;
        if self.selections >= self.config.reset_after {
            let keep = self.config.retain.min(self.recent.len());
            self.recent.drain(..self.recent.len() - keep);
            self.selections = 0;
        }
    }

    pub fn recent(&self) -> &[ActionType] {
        &self.recent
    }
}

// ============================================================================
// Tests
// ============================================================================
