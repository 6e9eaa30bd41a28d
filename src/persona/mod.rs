//! Persona profiles — immutable behavioral trait bundles.
//!
//! A [`PersonaProfile`] parameterizes every decision one session makes:
//! action weights, timing ranges, and the coefficient tables the
//! cognitive engine derives at session start. Profiles are created once,
//! never mutated, and shared across concurrent sessions behind an `Arc`.

pub mod catalog;

pub use catalog::PersonaCatalog;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utilities::errors::PersonaError;

/// How quickly a persona moves through pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowsingSpeed {
    Slow,
    Medium,
    Fast,
}

/// How long a persona stays engaged before drifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttentionSpan {
    Short,
    Medium,
    Long,
}

/// Comfort with technical interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechComfort {
    Low,
    Medium,
    High,
}

/// Reading style, driving dwell durations and budget scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingPattern {
    Skimmer,
    Normal,
    Scanner,
    Thorough,
}

/// Device classes a persona favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceAffinity {
    Desktop,
    Laptop,
    Mobile,
    Tablet,
}

/// Closed `(min, max)` range in seconds, `min <= max`.
pub type SecondsRange = (f64, f64);

/// Immutable bundle of behavioral trait values parameterizing one
/// session's decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    // ---- Identity ----
    /// Stable catalog key.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Inclusive age range.
    pub age_range: (u8, u8),
    /// Devices this persona favors, most preferred first.
    pub device_affinities: Vec<DeviceAffinity>,

    // ---- Trait axes ----
    pub browsing_speed: BrowsingSpeed,
    pub attention_span: AttentionSpan,
    pub tech_comfort: TechComfort,
    pub reading_pattern: ReadingPattern,

    // ---- Behavioral weights, each in [0, 1] ----
    pub click_through_rate: f64,
    pub hover_tendency: f64,
    pub exploration_time: f64,
    pub form_completion_rate: f64,
    pub search_refinement_likelihood: f64,
    pub back_button_usage: f64,
    pub new_tab_usage: f64,

    // ---- Timing ranges, seconds ----
    pub session_duration: SecondsRange,
    pub page_dwell: SecondsRange,
    pub hover_duration: SecondsRange,
}

impl PersonaProfile {
    /// Check every profile invariant: probability fields in [0, 1],
    /// ranges non-negative with `min <= max`.
    pub fn validate(&self) -> Result<(), PersonaError> {
        let invalid = |reason: String| PersonaError::Invalid {
            key: self.key.clone(),
            reason,
        };

        let probabilities = [
            ("click_through_rate", self.click_through_rate),
            ("hover_tendency", self.hover_tendency),
            ("exploration_time", self.exploration_time),
            ("form_completion_rate", self.form_completion_rate),
            (
                "search_refinement_likelihood",
                self.search_refinement_likelihood,
            ),
            ("back_button_usage", self.back_button_usage),
            ("new_tab_usage", self.new_tab_usage),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{field} out of [0, 1]: {value}")));
            }
        }

        let ranges = [
            ("session_duration", self.session_duration),
            ("page_dwell", self.page_dwell),
            ("hover_duration", self.hover_duration),
        ];
        for (field, (min, max)) in ranges {
            if min < 0.0 || min > max {
                return Err(invalid(format!("{field} range invalid: ({min}, {max})")));
            }
        }

        if self.age_range.0 > self.age_range.1 {
            return Err(invalid(format!("age_range invalid: {:?}", self.age_range)));
        }
        if self.device_affinities.is_empty() {
            return Err(invalid("no device affinities".into()));
        }
        Ok(())
    }

    /// Upper bound of the persona's session duration range.
    pub fn max_session(&self) -> Duration {
        Duration::from_secs_f64(self.session_duration.1.max(0.0))
    }
}

// ============================================================================
// Tests
// ============================================================================
