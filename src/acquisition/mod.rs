//! Target acquisition — locating the destination among page results.
//!
//! A strategy cascade runs most-specific-first over the snapshot's
//! result entries. The first strategy producing a candidate at or above
//! the confidence threshold wins; later strategies are not consulted
//! (short-circuit, not best-of-all-strategies).

use serde::{Deserialize, Serialize};

use crate::context::{ContainerClass, ElementHandle, PageContext, ResultEntry};

/// Strategy that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStrategy {
    /// The result's link resolves to exactly the canonical identifier.
    ExactIdentifier,
    /// The identifier appears verbatim in the result's heading or
    /// display URL.
    TextContainment,
    /// Loosened match on the identifier stem, ignoring incidental
    /// suffixes.
    PartialIdentifier,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAcquisitionResult {
    pub element: ElementHandle,
    pub strategy: AcquisitionStrategy,
    /// Deterministic score in [0, 1].
    pub confidence: f64,
    /// Position of the matched result.
    pub position: usize,
}

/// Link fragments marking a result as a tracking or redirect artifact
/// rather than a destination.
const TRACKING_MARKERS: &[&str] = &["webcache", "translate.", "/url?q=", "/redirect"];

/// Confidence-thresholded strategy cascade.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    threshold: f64,
}

impl TargetResolver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Locate the result matching `target` (a bare domain or canonical
    /// identifier). `None` when no strategy clears the threshold.
    pub fn resolve(&self, ctx: &PageContext, target: &str) -> Option<TargetAcquisitionResult> {
        let canonical = canonicalize(target);
        if canonical.is_empty() {
            return None;
        }
        let stem = identifier_stem(&canonical);

        for strategy in [
            AcquisitionStrategy::ExactIdentifier,
            AcquisitionStrategy::TextContainment,
            AcquisitionStrategy::PartialIdentifier,
        ] {
            if let Some(hit) = self.best_candidate(ctx, &canonical, stem, strategy) {
                if hit.confidence >= self.threshold {
                    return Some(hit);
                }
            }
        }
        None
    }

    /// Best-scoring candidate of one strategy, at most one.
    fn best_candidate(
        &self,
        ctx: &PageContext,
        canonical: &str,
        stem: &str,
        strategy: AcquisitionStrategy,
    ) -> Option<TargetAcquisitionResult> {
        ctx.results
            .iter()
            .filter(|entry| !is_tracking_link(entry))
            .filter_map(|entry| {
                matches_entry(entry, canonical, stem, strategy).map(|heading_hit| {
                    TargetAcquisitionResult {
                        element: entry.handle.clone(),
                        strategy,
                        confidence: score(entry, strategy, heading_hit),
                        position: entry.position,
                    }
                })
            })
            .max_by(|a, b| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Whether `entry` satisfies `strategy`; `Some(true)` when the match
/// occurred in the heading.
fn matches_entry(
    entry: &ResultEntry,
    canonical: &str,
    stem: &str,
    strategy: AcquisitionStrategy,
) -> Option<bool> {
    let href_host = entry.handle.href.as_deref().map(canonicalize);
    match strategy {
        AcquisitionStrategy::ExactIdentifier => {
            (href_host.as_deref() == Some(canonical)).then_some(false)
        }
        AcquisitionStrategy::TextContainment => {
            if entry.heading.to_lowercase().contains(canonical) {
                Some(true)
            } else if entry.display_url.to_lowercase().contains(canonical) {
                Some(false)
            } else {
                None
            }
        }
        AcquisitionStrategy::PartialIdentifier => {
            if entry.heading.to_lowercase().contains(stem) {
                Some(true)
            } else if href_host.is_some_and(|h| h.contains(stem)) {
                Some(false)
            } else {
                None
            }
        }
    }
}

/// Deterministic candidate score: strategy base, damped by structural
/// position, container class, and lifted by a heading-level match.
fn score(entry: &ResultEntry, strategy: AcquisitionStrategy, heading_hit: bool) -> f64 {
    let base = match strategy {
        AcquisitionStrategy::ExactIdentifier => 1.0,
        AcquisitionStrategy::TextContainment => 0.8,
        AcquisitionStrategy::PartialIdentifier => 0.6,
    };
    let position = 1.0 / (1.0 + 0.15 * entry.position as f64);
    let container = match entry.container {
        ContainerClass::Primary => 1.0,
        ContainerClass::Peripheral => 0.75,
    };
    let heading = if heading_hit { 1.1 } else { 1.0 };
    (base * position * container * heading).min(1.0)
}

fn is_tracking_link(entry: &ResultEntry) -> bool {
    entry
        .handle
        .href
        .as_deref()
        .is_some_and(|href| TRACKING_MARKERS.iter().any(|m| href.contains(m)))
}

/// Reduce an identifier or URL to its canonical host form: lowercase,
/// scheme-, `www.`-, port-, and path-insensitive.
pub(crate) fn canonicalize(identifier: &str) -> String {
    let s = identifier.trim().to_lowercase();
    let s = s.split_once("://").map_or(s.as_str(), |(_, rest)| rest);
    let s = s.split(['/', '?', '#']).next().unwrap_or(s);
    let s = s.strip_prefix("www.").unwrap_or(s);
    let s = s.split(':').next().unwrap_or(s);
    s.trim_end_matches('.').to_string()
}

/// Leading label of a canonical identifier: `example.com` → `example`.
fn identifier_stem(canonical: &str) -> &str {
    canonical.split('.').next().unwrap_or(canonical)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PageType;

    fn entry(
        position: usize,
        container: ContainerClass,
        heading: &str,
        display_url: &str,
        href: &str,
    ) -> ResultEntry {
        ResultEntry {
            handle: ElementHandle {
                id: position as u64,
                text: heading.to_string(),
                href: Some(href.to_string()),
            },
            position,
            container,
            heading: heading.to_string(),
            display_url: display_url.to_string(),
        }
    }

    fn serp(results: Vec<ResultEntry>) -> PageContext {
        let mut ctx = PageContext::empty(PageType::SearchResults);
        ctx.results = results;
        ctx
    }

    #[test]
    fn canonicalization_strips_incidentals() {
        assert_eq!(canonicalize("https://www.Example.com:8080/a/b?q=1"), "example.com");
        assert_eq!(canonicalize("example.com/"), "example.com");
        assert_eq!(canonicalize("  EXAMPLE.COM  "), "example.com");
    }

    #[test]
    fn exact_match_wins_with_high_confidence() {
        let resolver = TargetResolver::new(0.5);
        let ctx = serp(vec![
            entry(0, ContainerClass::Primary, "Other site", "other.net", "https://other.net/"),
            entry(1, ContainerClass::Primary, "Example", "example.com", "https://www.example.com/home"),
        ]);
        let hit = resolver.resolve(&ctx, "example.com").unwrap();
        assert_eq!(hit.strategy, AcquisitionStrategy::ExactIdentifier);
        assert!(hit.confidence >= 0.5, "{}", hit.confidence);
        assert_eq!(hit.position, 1);
    }

    #[test]
    fn text_containment_catches_renamed_links() {
        let resolver = TargetResolver::new(0.5);
        let ctx = serp(vec![entry(
            0,
            ContainerClass::Primary,
            "Why example.com is the reference site",
            "docs portal",
            "https://mirror.example-cdn.net/",
        )]);
        let hit = resolver.resolve(&ctx, "example.com").unwrap();
        assert_eq!(hit.strategy, AcquisitionStrategy::TextContainment);
    }

    #[test]
    fn fuzzy_match_falls_through_to_the_partial_strategy() {
        let resolver = TargetResolver::new(0.5);
        let ctx = serp(vec![entry(
            0,
            ContainerClass::Primary,
            "Acme store locator",
            "acme.co.uk",
            "https://acme.co.uk/",
        )]);
        let hit = resolver.resolve(&ctx, "acme.com").unwrap();
        assert_eq!(hit.strategy, AcquisitionStrategy::PartialIdentifier);
        assert!(hit.confidence >= 0.5);
    }

    #[test]
    fn weak_fuzzy_candidates_stay_below_the_threshold() {
        let resolver = TargetResolver::new(0.5);
        // Deep, peripheral, non-heading: partial base 0.6 decays under 0.5.
        let ctx = serp(vec![entry(
            9,
            ContainerClass::Peripheral,
            "Unrelated heading",
            "somewhere else",
            "https://acme-blog.net/",
        )]);
        assert!(resolver.resolve(&ctx, "acme.com").is_none());
    }

    #[test]
    fn tracking_links_are_never_candidates() {
        let resolver = TargetResolver::new(0.5);
        let ctx = serp(vec![entry(
            0,
            ContainerClass::Primary,
            "example.com cached copy",
            "example.com",
            "https://webcache.example-mirror.net/example.com",
        )]);
        assert!(resolver.resolve(&ctx, "example.com").is_none());
    }

    #[test]
    fn earlier_results_outscore_later_ones() {
        let early = entry(0, ContainerClass::Primary, "a", "example.com", "https://example.com/");
        let late = entry(8, ContainerClass::Primary, "a", "example.com", "https://example.com/");
        let s_early = score(&early, AcquisitionStrategy::ExactIdentifier, false);
        let s_late = score(&late, AcquisitionStrategy::ExactIdentifier, false);
        assert!(s_early > s_late);
    }

    #[test]
    fn primary_container_outscores_peripheral() {
        let primary = entry(2, ContainerClass::Primary, "a", "b", "https://example.com/");
        let peripheral = entry(2, ContainerClass::Peripheral, "a", "b", "https://example.com/");
        assert!(
            score(&primary, AcquisitionStrategy::TextContainment, false)
                > score(&peripheral, AcquisitionStrategy::TextContainment, false)
        );
    }

    #[test]
    fn empty_results_resolve_to_none() {
        let resolver = TargetResolver::new(0.5);
        let ctx = serp(vec![]);
        assert!(resolver.resolve(&ctx, "example.com").is_none());
        assert!(resolver.resolve(&serp(vec![]), "").is_none());
    }
}
