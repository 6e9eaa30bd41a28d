//! Built-in persona archetypes and selection logic.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::utilities::errors::PersonaError;
use crate::utilities::rng::BehaviorRng;

use super::{
    AttentionSpan, BrowsingSpeed, DeviceAffinity, PersonaProfile, ReadingPattern, TechComfort,
};

use super::AttentionSpan::{Long, Medium as MediumSpan, Short};
use super::BrowsingSpeed::{Fast, Medium as MediumSpeed, Slow};
use super::DeviceAffinity::{Desktop, Laptop, Mobile, Tablet};

/// The built-in archetype table.
static ARCHETYPES: Lazy<Vec<Arc<PersonaProfile>>> = Lazy::new(|| {
    vec![
        Arc::new(PersonaProfile {
            key: "researcher".into(),
            name: "Dr. Academic".into(),
            age_range: (25, 65),
            device_affinities: vec![Desktop, Laptop],
            browsing_speed: Slow,
            attention_span: Long,
            tech_comfort: TechComfort::High,
            reading_pattern: ReadingPattern::Thorough,
            click_through_rate: 0.8,
            hover_tendency: 0.9,
            exploration_time: 0.8,
            form_completion_rate: 0.7,
            search_refinement_likelihood: 0.7,
            back_button_usage: 0.4,
            new_tab_usage: 0.8,
            session_duration: (300.0, 900.0),
            page_dwell: (60.0, 180.0),
            hover_duration: (2.0, 6.0),
        }),
        Arc::new(PersonaProfile {
            key: "casual_browser".into(),
            name: "Casual Surfer".into(),
            age_range: (18, 45),
            device_affinities: vec![Mobile, Tablet, Desktop],
            browsing_speed: Fast,
            attention_span: Short,
            tech_comfort: TechComfort::Medium,
            reading_pattern: ReadingPattern::Skimmer,
            click_through_rate: 0.6,
            hover_tendency: 0.6,
            exploration_time: 0.4,
            form_completion_rate: 0.3,
            search_refinement_likelihood: 0.3,
            back_button_usage: 0.7,
            new_tab_usage: 0.5,
            session_duration: (60.0, 300.0),
            page_dwell: (15.0, 60.0),
            hover_duration: (1.0, 3.0),
        }),
        Arc::new(PersonaProfile {
            key: "professional".into(),
            name: "Business Professional".into(),
            age_range: (25, 55),
            device_affinities: vec![Desktop, Laptop, Mobile],
            browsing_speed: MediumSpeed,
            attention_span: MediumSpan,
            tech_comfort: TechComfort::High,
            reading_pattern: ReadingPattern::Normal,
            click_through_rate: 0.7,
            hover_tendency: 0.7,
            exploration_time: 0.5,
            form_completion_rate: 0.8,
            search_refinement_likelihood: 0.5,
            back_button_usage: 0.5,
            new_tab_usage: 0.6,
            session_duration: (90.0, 300.0),
            page_dwell: (30.0, 90.0),
            hover_duration: (1.0, 4.0),
        }),
        Arc::new(PersonaProfile {
            key: "student".into(),
            name: "College Student".into(),
            age_range: (18, 25),
            device_affinities: vec![Laptop, Mobile, Tablet],
            browsing_speed: Fast,
            attention_span: MediumSpan,
            tech_comfort: TechComfort::High,
            reading_pattern: ReadingPattern::Normal,
            click_through_rate: 0.65,
            hover_tendency: 0.7,
            exploration_time: 0.5,
            form_completion_rate: 0.5,
            search_refinement_likelihood: 0.6,
            back_button_usage: 0.6,
            new_tab_usage: 0.9,
            session_duration: (60.0, 240.0),
            page_dwell: (20.0, 70.0),
            hover_duration: (1.0, 3.0),
        }),
        Arc::new(PersonaProfile {
            key: "senior".into(),
            name: "Senior Citizen".into(),
            age_range: (55, 80),
            device_affinities: vec![Desktop, Tablet],
            browsing_speed: Slow,
            attention_span: Long,
            tech_comfort: TechComfort::Low,
            reading_pattern: ReadingPattern::Thorough,
            click_through_rate: 0.5,
            hover_tendency: 0.5,
            exploration_time: 0.7,
            form_completion_rate: 0.4,
            search_refinement_likelihood: 0.4,
            back_button_usage: 0.8,
            new_tab_usage: 0.2,
            session_duration: (120.0, 480.0),
            page_dwell: (60.0, 180.0),
            hover_duration: (2.0, 5.0),
        }),
        Arc::new(PersonaProfile {
            key: "tech_savvy".into(),
            name: "Tech Expert".into(),
            age_range: (20, 50),
            device_affinities: vec![Desktop, Laptop, Mobile],
            browsing_speed: Fast,
            attention_span: MediumSpan,
            tech_comfort: TechComfort::High,
            reading_pattern: ReadingPattern::Scanner,
            click_through_rate: 0.7,
            hover_tendency: 0.8,
            exploration_time: 0.6,
            form_completion_rate: 0.8,
            search_refinement_likelihood: 0.6,
            back_button_usage: 0.5,
            new_tab_usage: 0.9,
            session_duration: (120.0, 450.0),
            page_dwell: (30.0, 90.0),
            hover_duration: (1.0, 4.0),
        }),
        Arc::new(PersonaProfile {
            key: "bargain_hunter".into(),
            name: "Deal Seeker".into(),
            age_range: (25, 50),
            device_affinities: vec![Mobile, Desktop, Tablet],
            browsing_speed: MediumSpeed,
            attention_span: MediumSpan,
            tech_comfort: TechComfort::Medium,
            reading_pattern: ReadingPattern::Normal,
            click_through_rate: 0.75,
            hover_tendency: 0.75,
            exploration_time: 0.6,
            form_completion_rate: 0.6,
            search_refinement_likelihood: 0.8,
            back_button_usage: 0.6,
            new_tab_usage: 0.7,
            session_duration: (90.0, 360.0),
            page_dwell: (25.0, 80.0),
            hover_duration: (1.0, 4.0),
        }),
    ]
});

#[derive(Debug, Default)]
struct RotationState {
    order: Vec<usize>,
    cursor: usize,
}

/// Read-only persona table with uniform and rotated selection.
///
/// Rotation pre-shuffles a full cycle and reshuffles only at cycle
/// boundaries, so consecutive sessions never reuse a persona; the fresh
/// shuffle is nudged so even the wraparound seam cannot repeat (unless
/// the catalog holds a single entry). The cursor is internally locked,
/// keeping a shared catalog safe across concurrent sessions.
#[derive(Debug)]
pub struct PersonaCatalog {
    entries: Vec<Arc<PersonaProfile>>,
    rotation: Mutex<RotationState>,
}

impl PersonaCatalog {
    /// Catalog of the built-in archetypes.
    pub fn builtin() -> Self {
        Self::new(ARCHETYPES.clone())
    }

    /// Catalog over caller-supplied profiles.
    ///
    /// # Panics
    /// Panics when `entries` is empty: a catalog with nothing to select
    /// is a construction error.
    pub fn new(entries: Vec<Arc<PersonaProfile>>) -> Self {
        assert!(!entries.is_empty(), "persona catalog cannot be empty");
        Self {
            entries,
            rotation: Mutex::new(RotationState::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of every registered archetype.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.key.as_str())
    }

    /// Look up a profile by its catalog key.
    pub fn by_key(&self, key: &str) -> Result<Arc<PersonaProfile>, PersonaError> {
        self.entries
            .iter()
            .find(|p| p.key == key)
            .cloned()
            .ok_or_else(|| PersonaError::NotFound {
                key: key.to_string(),
            })
    }

    /// Uniform draw across the catalog.
    pub fn random(&self, rng: &mut BehaviorRng) -> Arc<PersonaProfile> {
        let i = rng.uniform_u32(0, (self.entries.len() - 1) as u32) as usize;
        self.entries[i].clone()
    }

    /// Next profile of the rotation cycle.
    pub fn rotated(&self, rng: &mut BehaviorRng) -> Arc<PersonaProfile> {
        let mut rotation = self.rotation.lock();
        if rotation.cursor >= rotation.order.len() {
            let previous_last = rotation.order.last().copied();
            let mut order: Vec<usize> = (0..self.entries.len()).collect();
            rng.shuffle(&mut order);
            // Keep the wraparound seam repeat-free.
            if order.len() > 1 && order.first().copied() == previous_last {
                let last = order.len() - 1;
                order.swap(0, last);
            }
            rotation.order = order;
            rotation.cursor = 0;
        }
        let i = rotation.order[rotation.cursor];
        rotation.cursor += 1;
        self.entries[i].clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
