//! Weighted, diversity-aware action planning.
//!
//! The planner combines four inputs — persona weights, cognitive state,
//! the current page snapshot, and the diversity tracker — into one
//! sampled [`ActionIntent`] per decision cycle.

pub mod diversity;
pub mod intent;
pub mod refine;

pub use diversity::DiversityTracker;
pub use intent::{ActionIntent, ActionParams, ActionType};

use std::sync::Arc;

use crate::cognition::CognitiveState;
use crate::context::{ElementCategory, PageContext, PageType};
use crate::persona::{BrowsingSpeed, PersonaProfile, ReadingPattern, TechComfort};
use crate::utilities::config::DiversityConfig;
use crate::utilities::rng::BehaviorRng;

/// Which action families the current phase may sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerMode {
    /// Result scanning: observation only, nothing that leaves the page.
    Scan,
    /// Site exploration: the full vocabulary.
    Explore,
}

/// Samples one intent per decision cycle.
#[derive(Debug)]
pub struct ActionPlanner {
    persona: Arc<PersonaProfile>,
    diversity: DiversityTracker,
}

impl ActionPlanner {
    pub fn new(persona: Arc<PersonaProfile>, diversity: DiversityConfig) -> Self {
        Self {
            persona,
            diversity: DiversityTracker::new(diversity),
        }
    }

    /// Sample the next action. Total: an empty candidate pool degrades
    /// to a plain observation intent rather than failing.
    pub fn plan(
        &mut self,
        ctx: &PageContext,
        state: &CognitiveState,
        mode: PlannerMode,
        rng: &mut BehaviorRng,
    ) -> ActionIntent {
        let mut pool = self.candidate_pool(ctx, state, mode);
        for (action, weight) in &mut pool {
            *weight *= self.diversity.weight_factor(*action);
        }

        let weights: Vec<f64> = pool.iter().map(|(_, w)| *w).collect();
        let action = match rng.weighted_index(&weights) {
            Some(i) => pool[i].0,
            None => ActionType::WaitObserve,
        };
        self.diversity.note_selection(action);

        ActionIntent {
            action,
            params: self.parameters(action, state, rng),
            confidence: state.action_confidence(),
        }
    }

    /// Weighted candidates for the current page and mode.
    fn candidate_pool(
        &self,
        ctx: &PageContext,
        state: &CognitiveState,
        mode: PlannerMode,
    ) -> Vec<(ActionType, f64)> {
        let persona = &self.persona;
        let mut pool: Vec<(ActionType, f64)> = Vec::with_capacity(12);

        if !ctx.hoverable.priority_links.is_empty() {
            pool.push((ActionType::HoverLink, persona.hover_tendency));
        }
        if ctx.page_type == PageType::SearchResults && !ctx.hoverable.search_results.is_empty() {
            pool.push((ActionType::HoverSearchResult, 0.8));
        }
        if !ctx.hoverable.navigation.is_empty() {
            pool.push((ActionType::HoverNavigation, 0.6));
        }

        // Baseline candidates, present on every page.
        pool.push((ActionType::ScrollDown, 0.7));
        pool.push((ActionType::ScrollUp, 0.2));
        pool.push((ActionType::ReadContent, persona.exploration_time));
        pool.push((ActionType::WaitObserve, 0.5));

        if mode == PlannerMode::Explore {
            if ctx.interactive.links > 0 {
                pool.push((ActionType::ClickLink, 0.3));
            }
            if ctx.page_type == PageType::SearchResults && ctx.has_results() {
                pool.push((ActionType::ClickSearchResult, 0.4));
            }
            pool.push((ActionType::GoBack, persona.back_button_usage * 0.3));
        }

        if state.fatigue_level() > 0.7 {
            for (action, weight) in &mut pool {
                if action.is_click() {
                    *weight *= 0.5;
                } else if action.is_passive() {
                    *weight *= 1.2;
                }
            }
        }
        if state.interest_level() < 0.3 {
            pool.push((ActionType::PrepareToLeave, 0.6));
        }

        pool
    }

    /// Concrete parameters for the sampled action, drawn from persona
    /// ranges and stretched by the cognitive timing modifier.
    fn parameters(
        &self,
        action: ActionType,
        state: &CognitiveState,
        rng: &mut BehaviorRng,
    ) -> ActionParams {
        let persona = &self.persona;
        let timing = state.timing_modifier();
        let mut params = ActionParams::default();

        match action {
            ActionType::ScrollDown | ActionType::ScrollUp => {
                let (lo, hi) = match persona.browsing_speed {
                    BrowsingSpeed::Fast => (400, 800),
                    BrowsingSpeed::Slow => (200, 400),
                    BrowsingSpeed::Medium => (300, 600),
                };
                params.amount = Some(rng.uniform_u32(lo, hi));
            }
            ActionType::HoverLink | ActionType::HoverSearchResult | ActionType::HoverNavigation => {
                params.duration = Some(rng.duration_between(persona.hover_duration).mul_f64(timing));
                params.category = Some(match action {
                    ActionType::HoverSearchResult => ElementCategory::SearchResults,
                    ActionType::HoverNavigation => ElementCategory::Navigation,
                    _ if persona.tech_comfort == TechComfort::High => {
                        ElementCategory::TechnicalLinks
                    }
                    _ => ElementCategory::GeneralLinks,
                });
                params.max_elements = Some(rng.uniform_u32(1, 3));
            }
            ActionType::ReadContent => {
                let range = match persona.reading_pattern {
                    ReadingPattern::Thorough => (20.0, 60.0),
                    ReadingPattern::Skimmer => (5.0, 15.0),
                    ReadingPattern::Normal | ReadingPattern::Scanner => (10.0, 30.0),
                };
                params.duration = Some(rng.duration_between(range).mul_f64(timing));
            }
            ActionType::WaitObserve | ActionType::PrepareToLeave => {
                params.duration = Some(rng.duration_between((2.0, 8.0)).mul_f64(timing));
            }
            ActionType::ClickLink | ActionType::ClickSearchResult | ActionType::ClickTarget => {
                params.pre_hover = Some(rng.duration_between((1.0, 3.0)).mul_f64(timing));
            }
            ActionType::GoBack
            | ActionType::LoadSearchPage
            | ActionType::SubmitQuery
            | ActionType::RefineQuery => {}
        }

        params
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContainerClass, ElementHandle, ResultEntry};
    use crate::persona::PersonaCatalog;
    use crate::utilities::config::ContinuationWeights;

    fn handle(id: u64) -> ElementHandle {
        ElementHandle {
            id,
            text: format!("link {id}"),
            href: Some(format!("https://example.org/{id}")),
        }
    }

    fn serp_context() -> PageContext {
        let mut ctx = PageContext::empty(PageType::SearchResults);
        ctx.interactive.links = 14;
        ctx.hoverable.priority_links = vec![handle(1), handle(2)];
        ctx.hoverable.search_results = vec![handle(3), handle(4), handle(5)];
        ctx.hoverable.navigation = vec![handle(6)];
        ctx.results = vec![ResultEntry {
            handle: handle(3),
            position: 0,
            container: ContainerClass::Primary,
            heading: "Example".into(),
            display_url: "example.org".into(),
        }];
        ctx
    }

    fn planner_and_state(key: &str) -> (ActionPlanner, CognitiveState) {
        let persona = PersonaCatalog::builtin().by_key(key).unwrap();
        let state = CognitiveState::for_persona(&persona, ContinuationWeights::default());
        let planner = ActionPlanner::new(persona, DiversityConfig::default());
        (planner, state)
    }

    #[test]
    fn scan_mode_never_plans_a_navigation() {
        let (mut planner, state) = planner_and_state("tech_savvy");
        let ctx = serp_context();
        let mut rng = BehaviorRng::seeded(31);
        for _ in 0..300 {
            let intent = planner.plan(&ctx, &state, PlannerMode::Scan, &mut rng);
            assert!(!intent.action.navigates(), "scan planned {}", intent.action);
        }
    }

    #[test]
    fn explore_mode_eventually_clicks() {
        let (mut planner, state) = planner_and_state("tech_savvy");
        let ctx = serp_context();
        let mut rng = BehaviorRng::seeded(32);
        let clicked = (0..300).any(|_| {
            planner
                .plan(&ctx, &state, PlannerMode::Explore, &mut rng)
                .action
                .is_click()
        });
        assert!(clicked);
    }

    #[test]
    fn empty_page_still_yields_an_intent() {
        let (mut planner, state) = planner_and_state("senior");
        let ctx = PageContext::empty(PageType::Unknown);
        let mut rng = BehaviorRng::seeded(33);
        for _ in 0..50 {
            let intent = planner.plan(&ctx, &state, PlannerMode::Scan, &mut rng);
            assert!(intent.action.is_passive(), "got {}", intent.action);
        }
    }

    #[test]
    fn fatigue_halves_click_weights() {
        let (planner, mut state) = planner_and_state("professional");
        let ctx = serp_context();
        let fresh_pool = planner.candidate_pool(&ctx, &state, PlannerMode::Explore);
        let fresh_click = fresh_pool
            .iter()
            .find(|(a, _)| *a == ActionType::ClickLink)
            .map(|(_, w)| *w)
            .unwrap();
        // Wear the state past the fatigue threshold.
        for _ in 0..20 {
            state.update(ActionType::ReadContent, 120.0, 1.0);
        }
        assert!(state.fatigue_level() > 0.7);
        let tired_pool = planner.candidate_pool(&ctx, &state, PlannerMode::Explore);
        let tired_click = tired_pool
            .iter()
            .find(|(a, _)| *a == ActionType::ClickLink)
            .map(|(_, w)| *w)
            .unwrap();
        assert!((tired_click - fresh_click * 0.5).abs() < 1e-9);
    }

    #[test]
    fn boredom_offers_an_exit() {
        let (planner, mut state) = planner_and_state("casual_browser");
        let ctx = serp_context();
        // Let interest decay below the boredom threshold.
        for _ in 0..30 {
            state.update(ActionType::ScrollDown, 30.0, 0.2);
        }
        assert!(state.interest_level() < 0.3);
        let pool = planner.candidate_pool(&ctx, &state, PlannerMode::Explore);
        assert!(pool.iter().any(|(a, _)| *a == ActionType::PrepareToLeave));
    }

    #[test]
    fn repeated_choices_are_damped_by_diversity() {
        let (mut planner, state) = planner_and_state("professional");
        let ctx = PageContext::empty(PageType::Article);
        let mut rng = BehaviorRng::seeded(34);
        let picks: Vec<ActionType> = (0..60)
            .map(|_| planner.plan(&ctx, &state, PlannerMode::Scan, &mut rng).action)
            .collect();
        let monotone_runs = picks
            .windows(6)
            .filter(|w| w.iter().all(|a| *a == w[0]))
            .count();
        assert_eq!(monotone_runs, 0, "six identical picks in a row: {picks:?}");
        let mut distinct = picks.clone();
        distinct.sort_by_key(|a| format!("{a}"));
        distinct.dedup();
        assert!(distinct.len() >= 3, "picks collapsed to {distinct:?}");
    }

    #[test]
    fn parameters_fit_the_action() {
        let (mut planner, state) = planner_and_state("researcher");
        let ctx = serp_context();
        let mut rng = BehaviorRng::seeded(35);
        for _ in 0..200 {
            let intent = planner.plan(&ctx, &state, PlannerMode::Explore, &mut rng);
            match intent.action {
                ActionType::ScrollDown | ActionType::ScrollUp => {
                    let amount = intent.params.amount.unwrap();
                    assert!((200..=400).contains(&amount), "slow scroll of {amount}px");
                }
                ActionType::ReadContent => {
                    let secs = intent.params.duration.unwrap().as_secs_f64();
                    assert!(secs >= 20.0 * 0.8, "thorough read of {secs}s");
                }
                a if a.is_hover() => {
                    assert!(intent.params.category.is_some());
                    let max = intent.params.max_elements.unwrap();
                    assert!((1..=3).contains(&max));
                }
                a if a.is_click() => assert!(intent.params.pre_hover.is_some()),
                _ => {}
            }
            assert!((0.0..=1.0).contains(&intent.confidence));
        }
    }
}
