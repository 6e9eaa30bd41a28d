//! Page snapshot types produced by the analyzer collaborator.
//!
//! A [`PageContext`] is an ephemeral, read-only view of the current page:
//! produced fresh at least once per phase, consumed once per decision
//! cycle, never retained across navigations.

use serde::{Deserialize, Serialize};

/// Broad classification of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    SearchResults,
    Homepage,
    Article,
    Ecommerce,
    Form,
    Unknown,
}

/// Rough text density of the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentDensity {
    Low,
    #[default]
    Medium,
    High,
}

/// Element categories a hover or click intent can aim at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    SearchResults,
    Navigation,
    TechnicalLinks,
    GeneralLinks,
}

/// Opaque reference to an on-page element.
///
/// The `id` is scoped to the executor that produced the snapshot; the
/// engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Executor-scoped identifier.
    pub id: u64,
    /// Visible text, possibly truncated by the analyzer.
    pub text: String,
    /// Resolved link target, when the element navigates.
    pub href: Option<String>,
}

/// Interactive element counts by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCounts {
    pub links: u32,
    pub buttons: u32,
    pub inputs: u32,
    pub forms: u32,
}

impl ElementCounts {
    /// Total interactive elements on the page.
    pub fn total(&self) -> u32 {
        self.links + self.buttons + self.inputs + self.forms
    }
}

/// Bounded per-category inventories of hover candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverInventory {
    pub priority_links: Vec<ElementHandle>,
    pub search_results: Vec<ElementHandle>,
    pub navigation: Vec<ElementHandle>,
}

impl HoverInventory {
    pub fn is_empty(&self) -> bool {
        self.priority_links.is_empty()
            && self.search_results.is_empty()
            && self.navigation.is_empty()
    }

    /// Cap every inventory so a pathological page cannot bloat the
    /// snapshot.
    pub fn truncate_to(&mut self, cap: usize) {
        self.priority_links.truncate(cap);
        self.search_results.truncate(cap);
        self.navigation.truncate(cap);
    }
}

/// Which container a search result was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerClass {
    /// The main organic result list.
    Primary,
    /// Sidebars, carousels and other secondary containers.
    Peripheral,
}

/// One search result as seen by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub handle: ElementHandle,
    /// Zero-based position in the result list.
    pub position: usize,
    pub container: ContainerClass,
    /// Result title text.
    pub heading: String,
    /// Display URL line shown with the result.
    pub display_url: String,
}

/// Ephemeral snapshot of the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    pub page_type: PageType,
    pub interactive: ElementCounts,
    pub hoverable: HoverInventory,
    /// Ordered search results; empty off the results page.
    pub results: Vec<ResultEntry>,
    pub content_density: ContentDensity,
}

impl PageContext {
    /// A snapshot with nothing on it, for pages the analyzer could not
    /// inventory.
    pub fn empty(page_type: PageType) -> Self {
        Self {
            page_type,
            interactive: ElementCounts::default(),
            hoverable: HoverInventory::default(),
            results: Vec::new(),
            content_density: ContentDensity::default(),
        }
    }

    /// Perceived complexity in [0, 1]; saturates at 20 interactive
    /// elements.
    pub fn complexity(&self) -> f64 {
        (f64::from(self.interactive.total()) / 20.0).min(1.0)
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_saturates_at_one() {
        let mut ctx = PageContext::empty(PageType::Homepage);
        assert_eq!(ctx.complexity(), 0.0);
        ctx.interactive.links = 10;
        assert_eq!(ctx.complexity(), 0.5);
        ctx.interactive.buttons = 50;
        assert_eq!(ctx.complexity(), 1.0);
    }

    #[test]
    fn inventory_truncation_caps_every_category() {
        let handle = |id| ElementHandle {
            id,
            text: String::new(),
            href: None,
        };
        let mut inventory = HoverInventory {
            priority_links: (0..8).map(handle).collect(),
            search_results: (8..20).map(handle).collect(),
            navigation: vec![],
        };
        inventory.truncate_to(5);
        assert_eq!(inventory.priority_links.len(), 5);
        assert_eq!(inventory.search_results.len(), 5);
        assert!(inventory.navigation.is_empty());
    }
}
