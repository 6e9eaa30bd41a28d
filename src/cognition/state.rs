//! Session-scoped cognitive state and its decision functions.
//!
//! Created at session start, folded forward after every executed action,
//! discarded at session end. Every method is total over its input
//! domain: inputs are clamped, nothing here can fail.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::persona::{AttentionSpan, PersonaProfile};
use crate::planner::intent::ActionType;
use crate::utilities::config::ContinuationWeights;
use crate::utilities::rng::BehaviorRng;

use super::coefficients::{action_load_delta, CognitiveCoefficients};
use super::emotion::EmotionalState;

/// One entry of the per-session action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: ActionType,
    /// Seconds since session start.
    pub offset_secs: f64,
    pub confidence: f64,
}

/// Serializable snapshot of the scalar state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveSnapshot {
    pub cognitive_load: f64,
    pub fatigue_level: f64,
    pub interest_level: f64,
    pub exploration_satisfaction: f64,
    pub emotional_state: EmotionalState,
}

/// Mutable cognitive scalars biasing action selection and continuation.
#[derive(Debug, Clone)]
pub struct CognitiveState {
    load: f64,
    fatigue: f64,
    interest: f64,
    satisfaction: f64,
    emotion: EmotionalState,
    history: Vec<HistoryEntry>,
    /// Accumulated activity seconds, stamping history entries.
    clock_secs: f64,
    coefficients: CognitiveCoefficients,
    attention_span: AttentionSpan,
    max_session_secs: f64,
    weights: ContinuationWeights,
}

impl CognitiveState {
    /// Fresh state for one session: no load, no fatigue, full interest.
    pub fn for_persona(persona: &PersonaProfile, weights: ContinuationWeights) -> Self {
        Self {
            load: 0.0,
            fatigue: 0.0,
            interest: 1.0,
            satisfaction: 0.0,
            emotion: EmotionalState::Neutral,
            history: Vec::new(),
            clock_secs: 0.0,
            coefficients: CognitiveCoefficients::for_persona(persona),
            attention_span: persona.attention_span,
            max_session_secs: persona.session_duration.1,
            weights,
        }
    }

    pub fn cognitive_load(&self) -> f64 {
        self.load
    }

    pub fn fatigue_level(&self) -> f64 {
        self.fatigue
    }

    pub fn interest_level(&self) -> f64 {
        self.interest
    }

    pub fn exploration_satisfaction(&self) -> f64 {
        self.satisfaction
    }

    pub fn emotional_state(&self) -> EmotionalState {
        self.emotion
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn snapshot(&self) -> CognitiveSnapshot {
        CognitiveSnapshot {
            cognitive_load: self.load,
            fatigue_level: self.fatigue,
            interest_level: self.interest,
            exploration_satisfaction: self.satisfaction,
            emotional_state: self.emotion,
        }
    }

    /// Append an issued action to the history log, stamped with the
    /// accumulated activity clock.
    pub fn log_action(&mut self, action: ActionType, confidence: f64) {
        self.history.push(HistoryEntry {
            action,
            offset_secs: self.clock_secs,
            confidence: confidence.clamp(0.0, 1.0),
        });
    }

    /// Fold one executed action into the scalars and recompute emotion.
    ///
    /// Load rises with the action and the page's complexity; fatigue
    /// rises with elapsed time and never falls; interest decays with
    /// time, nudged up by hover-family actions and down by passive
    /// waiting. Everything stays clamped to [0, 1].
    pub fn update(&mut self, action: ActionType, elapsed_secs: f64, page_complexity: f64) {
        let elapsed = elapsed_secs.max(0.0);
        let complexity = page_complexity.clamp(0.0, 1.0);
        self.clock_secs += elapsed;

        self.load = (self.load
            + action_load_delta(action)
            + complexity * self.coefficients.complexity_load_gain)
            .clamp(0.0, 1.0);

        self.fatigue = (self.fatigue + elapsed * self.coefficients.fatigue_rate).min(1.0);

        let mut interest = self.interest - self.coefficients.attention_decay * elapsed;
        if action.is_hover() {
            interest += 0.02;
        }
        if action == ActionType::WaitObserve {
            interest -= 0.01;
        }
        self.interest = interest.clamp(0.0, 1.0);

        if action.is_exploratory() {
            self.satisfaction = (self.satisfaction + 0.03).min(1.0);
        }

        self.emotion = EmotionalState::classify(self.load, self.fatigue, self.interest);
    }

    /// Pre-draw continuation probability, always within [0.1, 0.9].
    ///
    /// Exposed separately from [`should_continue`](Self::should_continue)
    /// so tests can assert on the probability itself.
    pub fn continue_probability(&self, session_elapsed: Duration) -> f64 {
        let w = &self.weights;
        let mut p = w.interest * self.interest
            + w.rest * (1.0 - self.fatigue)
            + w.clarity * (1.0 - self.load)
            + w.satisfaction * self.satisfaction;

        match self.attention_span {
            AttentionSpan::Long => p += 0.15,
            AttentionSpan::Short => p -= 0.15,
            AttentionSpan::Medium => {}
        }

        let actions = self.history.len();
        if actions > 25 {
            p -= 0.15;
        } else if actions < 5 {
            p += 0.1;
        }

        if session_elapsed.as_secs_f64() > self.max_session_secs {
            p -= 0.3;
        }

        p.clamp(0.1, 0.9)
    }

    /// Bernoulli draw against the continuation probability — never a
    /// hard threshold, so even a worn-down session occasionally keeps
    /// going and a fresh one occasionally wanders off.
    pub fn should_continue(&self, session_elapsed: Duration, rng: &mut BehaviorRng) -> bool {
        rng.chance(self.continue_probability(session_elapsed))
    }

    /// Confidence attached to the next planned action, in [0.1, 1.0].
    pub fn action_confidence(&self) -> f64 {
        (0.7 * (1.0 - self.fatigue * 0.3) * (1.0 - self.load * 0.2) * (1.0 + self.interest * 0.2))
            .clamp(0.1, 1.0)
    }

    /// Multiplier on action durations: slower when fatigued or
    /// overloaded, quicker when interested.
    pub fn timing_modifier(&self) -> f64 {
        self.coefficients.decision_speed
            * (1.0 + self.fatigue * 0.5)
            * (1.0 + self.load * 0.3)
            * (1.0 - self.interest * 0.2)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaCatalog;

    fn state_for(key: &str) -> CognitiveState {
        let persona = PersonaCatalog::builtin().by_key(key).unwrap();
        CognitiveState::for_persona(&persona, ContinuationWeights::default())
    }

    #[test]
    fn starts_fresh() {
        let state = state_for("professional");
        assert_eq!(state.cognitive_load(), 0.0);
        assert_eq!(state.fatigue_level(), 0.0);
        assert_eq!(state.interest_level(), 1.0);
        assert_eq!(state.emotional_state(), EmotionalState::Neutral);
        assert!(state.history().is_empty());
    }

    #[test]
    fn scalars_stay_clamped_and_fatigue_never_decreases() {
        let mut state = state_for("casual_browser");
        let actions = [
            ActionType::ClickLink,
            ActionType::WaitObserve,
            ActionType::ReadContent,
            ActionType::HoverLink,
            ActionType::ScrollDown,
            ActionType::ClickSearchResult,
        ];
        let mut previous_fatigue = 0.0;
        for round in 0..200 {
            let action = actions[round % actions.len()];
            state.update(action, 37.0, 0.9);
            assert!((0.0..=1.0).contains(&state.cognitive_load()));
            assert!((0.0..=1.0).contains(&state.fatigue_level()));
            assert!((0.0..=1.0).contains(&state.interest_level()));
            assert!(state.fatigue_level() >= previous_fatigue);
            previous_fatigue = state.fatigue_level();
        }
    }

    #[test]
    fn negative_elapsed_is_treated_as_zero() {
        let mut state = state_for("professional");
        state.update(ActionType::ScrollDown, -5.0, 0.0);
        assert_eq!(state.fatigue_level(), 0.0);
        assert_eq!(state.interest_level(), 1.0);
    }

    #[test]
    fn hovering_feeds_interest_waiting_drains_it() {
        let mut hovering = state_for("professional");
        let mut waiting = state_for("professional");
        hovering.update(ActionType::HoverLink, 1.0, 0.0);
        waiting.update(ActionType::WaitObserve, 1.0, 0.0);
        assert!(hovering.interest_level() > waiting.interest_level());
    }

    #[test]
    fn continue_probability_is_always_in_band() {
        let mut state = state_for("casual_browser");
        for secs in [0.0, 10.0, 100.0, 10_000.0] {
            let p = state.continue_probability(Duration::from_secs_f64(secs));
            assert!((0.1..=0.9).contains(&p), "p={p} at {secs}s");
            state.update(ActionType::ClickLink, 60.0, 1.0);
        }
        // Grind the state down and past every penalty threshold.
        for _ in 0..40 {
            state.log_action(ActionType::ClickLink, 0.5);
            state.update(ActionType::ClickLink, 120.0, 1.0);
        }
        let p = state.continue_probability(Duration::from_secs(100_000));
        assert_eq!(p, 0.1);
    }

    #[test]
    fn overtime_lowers_the_continuation_probability() {
        let persona = PersonaCatalog::builtin().by_key("professional").unwrap();
        let state = CognitiveState::for_persona(&persona, ContinuationWeights::default());
        let within = state.continue_probability(Duration::from_secs(10));
        let over = state.continue_probability(persona.max_session() + Duration::from_secs(1));
        assert!(over < within);
    }

    #[test]
    fn long_histories_lower_the_continuation_probability() {
        let mut state = state_for("professional");
        for _ in 0..10 {
            state.log_action(ActionType::ScrollDown, 0.7);
        }
        let at_ten = state.continue_probability(Duration::from_secs(1));
        for _ in 0..20 {
            state.log_action(ActionType::ScrollDown, 0.7);
        }
        let at_thirty = state.continue_probability(Duration::from_secs(1));
        assert!(at_thirty < at_ten);
    }

    #[test]
    fn confidence_shrinks_as_the_session_wears_on() {
        let mut state = state_for("professional");
        let fresh = state.action_confidence();
        for _ in 0..50 {
            state.update(ActionType::ClickLink, 120.0, 1.0);
        }
        let worn = state.action_confidence();
        assert!(worn < fresh);
        assert!((0.1..=1.0).contains(&worn));
    }

    #[test]
    fn fatigue_slows_the_timing_modifier() {
        let mut state = state_for("professional");
        let fresh = state.timing_modifier();
        for _ in 0..100 {
            state.update(ActionType::ReadContent, 200.0, 0.5);
        }
        assert!(state.timing_modifier() > fresh);
    }

    #[test]
    fn history_records_offsets_in_order() {
        let mut state = state_for("professional");
        state.log_action(ActionType::ScrollDown, 0.8);
        state.update(ActionType::ScrollDown, 3.0, 0.1);
        state.log_action(ActionType::ReadContent, 0.7);
        state.update(ActionType::ReadContent, 12.0, 0.1);
        state.log_action(ActionType::HoverLink, 0.6);
        let offsets: Vec<f64> = state.history().iter().map(|h| h.offset_secs).collect();
        assert_eq!(offsets, vec![0.0, 3.0, 15.0]);
    }
}
