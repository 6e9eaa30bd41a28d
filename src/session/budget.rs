//! Phase time budgets.

use std::time::Duration;

use crate::cognition::CognitiveState;
use crate::context::{ContentDensity, PageContext, PageType};
use crate::persona::{PersonaProfile, ReadingPattern};
use crate::utilities::rng::BehaviorRng;

/// Computes phase wall-clock budgets from persona, page characteristics
/// and cognitive state.
#[derive(Debug, Clone)]
pub struct BudgetAllocator {
    /// Global clamp on the main budget, seconds.
    bounds: (f64, f64),
    /// Base window for the scanning sub-loop, seconds.
    scan_window: (f64, f64),
}

impl BudgetAllocator {
    pub fn new(bounds: (f64, f64), scan_window: (f64, f64)) -> Self {
        Self {
            bounds,
            scan_window,
        }
    }

    /// Main exploration budget: a uniform draw over the persona's
    /// session range, scaled by page type, content density, reading
    /// pattern and cognitive state, clamped to the global bounds.
    pub fn main_budget(
        &self,
        persona: &PersonaProfile,
        ctx: &PageContext,
        state: &CognitiveState,
        rng: &mut BehaviorRng,
    ) -> Duration {
        let base = rng.uniform(persona.session_duration.0, persona.session_duration.1);
        let secs = base
            * page_type_multiplier(ctx.page_type)
            * density_multiplier(ctx.content_density)
            * reading_multiplier(persona.reading_pattern)
            * cognitive_multiplier(state);
        Duration::from_secs_f64(secs.clamp(self.bounds.0, self.bounds.1))
    }

    /// Short budget for the results-scanning sub-loop.
    pub fn scan_budget(&self, persona: &PersonaProfile, rng: &mut BehaviorRng) -> Duration {
        let base = rng.uniform(self.scan_window.0, self.scan_window.1);
        let secs = (base * reading_multiplier(persona.reading_pattern)).clamp(3.0, 30.0);
        Duration::from_secs_f64(secs)
    }
}

fn page_type_multiplier(page_type: PageType) -> f64 {
    match page_type {
        PageType::Homepage => 0.8,
        PageType::Article => 1.4,
        PageType::Ecommerce => 1.2,
        PageType::SearchResults => 0.7,
        PageType::Form => 1.1,
        PageType::Unknown => 1.0,
    }
}

fn density_multiplier(density: ContentDensity) -> f64 {
    match density {
        ContentDensity::High => 1.3,
        ContentDensity::Medium => 1.0,
        ContentDensity::Low => 0.8,
    }
}

fn reading_multiplier(pattern: ReadingPattern) -> f64 {
    match pattern {
        ReadingPattern::Thorough => 1.2,
        ReadingPattern::Normal => 1.0,
        ReadingPattern::Scanner => 0.9,
        ReadingPattern::Skimmer => 0.85,
    }
}

/// Continuous in both scalars: non-decreasing in interest,
/// non-increasing in fatigue. That monotonicity is a required property
/// of any replacement formula, not an accident of this one.
fn cognitive_multiplier(state: &CognitiveState) -> f64 {
    (0.85 + 0.3 * state.interest_level()) * (1.1 - 0.3 * state.fatigue_level())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaCatalog;
    use crate::planner::intent::ActionType;
    use crate::utilities::config::{ContinuationWeights, EngineConfig};

    fn allocator() -> BudgetAllocator {
        let config = EngineConfig::default();
        BudgetAllocator::new(config.budget_bounds, config.scan_window)
    }

    fn fresh_state(key: &str) -> CognitiveState {
        let persona = PersonaCatalog::builtin().by_key(key).unwrap();
        CognitiveState::for_persona(&persona, ContinuationWeights::default())
    }

    #[test]
    fn budget_always_respects_the_global_bounds() {
        let catalog = PersonaCatalog::builtin();
        let allocator = allocator();
        let mut rng = BehaviorRng::seeded(41);
        let page_types = [
            PageType::Homepage,
            PageType::Article,
            PageType::Ecommerce,
            PageType::SearchResults,
            PageType::Form,
            PageType::Unknown,
        ];
        for key in ["researcher", "casual_browser", "senior"] {
            let persona = catalog.by_key(key).unwrap();
            let mut state = fresh_state(key);
            for page_type in page_types {
                for density in [ContentDensity::Low, ContentDensity::Medium, ContentDensity::High] {
                    let mut ctx = PageContext::empty(page_type);
                    ctx.content_density = density;
                    let budget = allocator.main_budget(&persona, &ctx, &state, &mut rng);
                    let secs = budget.as_secs_f64();
                    assert!((30.0..=600.0).contains(&secs), "{key} {page_type:?} {secs}");
                    state.update(ActionType::ReadContent, 90.0, 0.8);
                }
            }
        }
    }

    #[test]
    fn interest_never_shrinks_the_budget() {
        let interested = fresh_state("professional");
        let mut bored = fresh_state("professional");
        // Decay interest without touching much else.
        for _ in 0..30 {
            bored.update(ActionType::ScrollDown, 20.0, 0.0);
        }
        assert!(bored.interest_level() < interested.interest_level());
        assert!(cognitive_multiplier(&interested) >= cognitive_multiplier(&bored));
    }

    #[test]
    fn fatigue_never_grows_the_budget() {
        let fresh = fresh_state("professional");
        let mut tired = fresh_state("professional");
        for _ in 0..60 {
            tired.update(ActionType::WaitObserve, 120.0, 0.0);
        }
        assert!(tired.fatigue_level() > fresh.fatigue_level());
        // Interest also decayed, so compare the fatigue factor directly.
        let fatigue_factor = |s: &CognitiveState| 1.1 - 0.3 * s.fatigue_level();
        assert!(fatigue_factor(&tired) <= fatigue_factor(&fresh));
    }

    #[test]
    fn short_span_homepage_budget_matches_the_documented_formula() {
        // Deterministic replay: the same seed drives the same base draw.
        let catalog = PersonaCatalog::builtin();
        let persona = catalog.by_key("casual_browser").unwrap();
        assert_eq!(persona.session_duration, (60.0, 300.0));
        let state = fresh_state("casual_browser");
        let ctx = PageContext::empty(PageType::Homepage);
        let allocator = allocator();

        let budget = allocator.main_budget(&persona, &ctx, &state, &mut BehaviorRng::seeded(42));
        let base = BehaviorRng::seeded(42).uniform(60.0, 300.0);
        let expected = (base * 0.8 * 1.0 * 0.85 * cognitive_multiplier(&state)).clamp(30.0, 600.0);
        assert!((budget.as_secs_f64() - expected).abs() < 1e-9);
    }

    #[test]
    fn scan_budget_stays_inside_its_window() {
        let catalog = PersonaCatalog::builtin();
        let allocator = allocator();
        let mut rng = BehaviorRng::seeded(43);
        for key in ["researcher", "casual_browser"] {
            let persona = catalog.by_key(key).unwrap();
            for _ in 0..100 {
                let secs = allocator.scan_budget(&persona, &mut rng).as_secs_f64();
                assert!((3.0..=30.0).contains(&secs), "{key}: {secs}");
            }
        }
    }
}
