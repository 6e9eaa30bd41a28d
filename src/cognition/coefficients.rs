//! Per-persona coefficient lookup tables.
//!
//! Derived once at session start; the tables are plausible humanlike
//! defaults, not measured constants.

use crate::persona::{AttentionSpan, BrowsingSpeed, PersonaProfile, TechComfort};
use crate::planner::intent::ActionType;

/// Coefficients the cognitive engine derives from a persona.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CognitiveCoefficients {
    /// Interest lost per second of activity.
    pub attention_decay: f64,
    /// Baseline multiplier on decision latency.
    pub decision_speed: f64,
    /// Cognitive load added per unit of page complexity.
    pub complexity_load_gain: f64,
    /// Fatigue accrued per second.
    pub fatigue_rate: f64,
}

impl CognitiveCoefficients {
    pub fn for_persona(persona: &PersonaProfile) -> Self {
        let attention_decay = match persona.attention_span {
            AttentionSpan::Short => 0.05,
            AttentionSpan::Medium => 0.03,
            AttentionSpan::Long => 0.01,
        };
        let decision_speed = match persona.browsing_speed {
            BrowsingSpeed::Slow => 1.5,
            BrowsingSpeed::Medium => 1.0,
            BrowsingSpeed::Fast => 0.7,
        };
        let complexity_load_gain = match persona.tech_comfort {
            TechComfort::Low => 0.15,
            TechComfort::Medium => 0.10,
            TechComfort::High => 0.07,
        };
        let fatigue_rate = match persona.browsing_speed {
            BrowsingSpeed::Slow => 0.0012,
            BrowsingSpeed::Medium => 0.0010,
            BrowsingSpeed::Fast => 0.0008,
        };
        Self {
            attention_decay,
            decision_speed,
            complexity_load_gain,
            fatigue_rate,
        }
    }
}

/// Cognitive load delta for one executed action.
pub fn action_load_delta(action: ActionType) -> f64 {
    match action {
        ActionType::HoverLink | ActionType::HoverNavigation => 0.05,
        ActionType::HoverSearchResult => 0.07,
        ActionType::ClickLink => 0.15,
        ActionType::ClickSearchResult | ActionType::ClickTarget => 0.12,
        ActionType::ScrollDown | ActionType::ScrollUp => 0.02,
        ActionType::ReadContent => 0.10,
        ActionType::WaitObserve => -0.05,
        ActionType::SubmitQuery | ActionType::RefineQuery => 0.08,
        ActionType::LoadSearchPage => 0.03,
        ActionType::GoBack => 0.04,
        ActionType::PrepareToLeave => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaCatalog;

    #[test]
    fn long_attention_decays_slowest() {
        let catalog = PersonaCatalog::builtin();
        let researcher =
            CognitiveCoefficients::for_persona(&catalog.by_key("researcher").unwrap());
        let casual =
            CognitiveCoefficients::for_persona(&catalog.by_key("casual_browser").unwrap());
        assert!(researcher.attention_decay < casual.attention_decay);
        assert!(researcher.decision_speed > casual.decision_speed);
    }

    #[test]
    fn waiting_is_the_only_load_relief() {
        assert!(action_load_delta(ActionType::WaitObserve) < 0.0);
        assert!(action_load_delta(ActionType::ClickLink) > action_load_delta(ActionType::ScrollDown));
    }
}
