//! Query refinement synthesis.
//!
//! When the target does not surface, a human rarely retypes the same
//! query — they sharpen it, date it, broaden it, or qualify it. The
//! strategies here synthesize that second attempt as plain text; the
//! submission itself belongs to the executor.

use serde::{Deserialize, Serialize};

use crate::utilities::rng::BehaviorRng;

/// How a refined query is derived from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementStrategy {
    AddSpecificity,
    AddRecency,
    Broaden,
    AddQualifier,
}

const SPECIFICITY_TERMS: &[&str] = &["guide", "tutorial", "how to", "best", "review"];
const RECENCY_TERMS: &[&str] = &["latest", "new", "updated"];
const RELATIONAL_TERMS: &[&str] = &["alternative", "similar", "related"];
const QUALIFIER_TERMS: &[&str] = &["cheap", "free", "professional", "beginner"];

/// Synthesize a refined query.
pub fn refine_query(original: &str, rng: &mut BehaviorRng) -> (String, RefinementStrategy) {
    let strategy = match rng.uniform_u32(0, 3) {
        0 => RefinementStrategy::AddSpecificity,
        1 => RefinementStrategy::AddRecency,
        2 => RefinementStrategy::Broaden,
        _ => RefinementStrategy::AddQualifier,
    };
    let original = original.trim();
    let refined = match strategy {
        RefinementStrategy::AddSpecificity => {
            format!("{original} {}", pick_term(SPECIFICITY_TERMS, rng))
        }
        RefinementStrategy::AddRecency => {
            format!("{original} {}", pick_term(RECENCY_TERMS, rng))
        }
        RefinementStrategy::Broaden => {
            let term = pick_term(RELATIONAL_TERMS, rng);
            match original.split_once(char::is_whitespace) {
                Some((_, rest)) => format!("{term} {rest}"),
                None => format!("{term} {original}"),
            }
        }
        RefinementStrategy::AddQualifier => {
            format!("{} {original}", pick_term(QUALIFIER_TERMS, rng))
        }
    };
    (refined, strategy)
}

fn pick_term<'a>(terms: &[&'a str], rng: &mut BehaviorRng) -> &'a str {
    rng.pick(terms).copied().unwrap_or("best")
}
