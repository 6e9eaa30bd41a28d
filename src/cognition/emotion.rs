//! Emotional state classification.

use serde::{Deserialize, Serialize};

/// Coarse emotional state, recomputed after every executed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    #[default]
    Neutral,
    Engaged,
    Frustrated,
    Bored,
    Overwhelmed,
}

impl EmotionalState {
    /// Fixed-precedence classification: fatigue dominates, then
    /// overload, then boredom, then engagement.
    pub fn classify(load: f64, fatigue: f64, interest: f64) -> Self {
        if fatigue > 0.7 {
            EmotionalState::Frustrated
        } else if load > 0.8 {
            EmotionalState::Overwhelmed
        } else if interest < 0.3 {
            EmotionalState::Bored
        } else if interest > 0.8 && load < 0.4 {
            EmotionalState::Engaged
        } else {
            EmotionalState::Neutral
        }
    }
}
