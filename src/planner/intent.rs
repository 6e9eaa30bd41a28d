//! Action intents — the closed vocabulary of plannable interactions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::{ElementCategory, ElementHandle};

/// Closed set of actions the engine can plan.
///
/// Dispatch over this enum is exhaustive everywhere; there is no
/// string-keyed branching and no generic fallback branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    HoverLink,
    HoverSearchResult,
    HoverNavigation,
    ScrollDown,
    ScrollUp,
    ReadContent,
    WaitObserve,
    ClickLink,
    ClickSearchResult,
    ClickTarget,
    PrepareToLeave,
    GoBack,
    LoadSearchPage,
    SubmitQuery,
    RefineQuery,
}

impl ActionType {
    /// Hover-family actions nudge interest upward.
    pub fn is_hover(self) -> bool {
        matches!(
            self,
            ActionType::HoverLink | ActionType::HoverSearchResult | ActionType::HoverNavigation
        )
    }

    /// Click-family actions, damped under fatigue.
    pub fn is_click(self) -> bool {
        matches!(
            self,
            ActionType::ClickLink | ActionType::ClickSearchResult | ActionType::ClickTarget
        )
    }

    /// Passive actions, boosted under fatigue.
    pub fn is_passive(self) -> bool {
        matches!(
            self,
            ActionType::ScrollDown
                | ActionType::ScrollUp
                | ActionType::ReadContent
                | ActionType::WaitObserve
        )
    }

    /// Whether executing this action can change the current page.
    pub fn navigates(self) -> bool {
        matches!(
            self,
            ActionType::ClickLink
                | ActionType::ClickSearchResult
                | ActionType::ClickTarget
                | ActionType::GoBack
                | ActionType::LoadSearchPage
                | ActionType::SubmitQuery
                | ActionType::RefineQuery
        )
    }

    /// Actions that deepen exploration satisfaction.
    pub fn is_exploratory(self) -> bool {
        self.is_hover() || self.is_click() || self == ActionType::ReadContent
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::HoverLink => "hover_link",
            ActionType::HoverSearchResult => "hover_search_result",
            ActionType::HoverNavigation => "hover_navigation",
            ActionType::ScrollDown => "scroll_down",
            ActionType::ScrollUp => "scroll_up",
            ActionType::ReadContent => "read_content",
            ActionType::WaitObserve => "wait_observe",
            ActionType::ClickLink => "click_link",
            ActionType::ClickSearchResult => "click_search_result",
            ActionType::ClickTarget => "click_target",
            ActionType::PrepareToLeave => "prepare_to_leave",
            ActionType::GoBack => "go_back",
            ActionType::LoadSearchPage => "load_search_page",
            ActionType::SubmitQuery => "submit_query",
            ActionType::RefineQuery => "refine_query",
        };
        f.write_str(name)
    }
}

/// Parameters accompanying an intent. Executors read the fields that
/// apply to the action and ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionParams {
    /// How long the action should take (hover, read, observe).
    pub duration: Option<Duration>,
    /// Scroll distance in pixels.
    pub amount: Option<u32>,
    /// Element category the action aims at.
    pub category: Option<ElementCategory>,
    /// Concrete element to act on (resolved target, alternative result).
    pub element: Option<ElementHandle>,
    /// Text payload for query submission.
    pub text: Option<String>,
    /// Hover dwell before a click lands.
    pub pre_hover: Option<Duration>,
    /// Upper bound on elements touched by a multi-element hover pass.
    pub max_elements: Option<u32>,
}

/// One planned interaction, not yet executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionIntent {
    pub action: ActionType,
    pub params: ActionParams,
    /// Planner confidence in [0, 1].
    pub confidence: f64,
}

impl ActionIntent {
    /// Intent with no parameters.
    pub fn bare(action: ActionType, confidence: f64) -> Self {
        Self {
            action,
            params: ActionParams::default(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_partition_sensibly() {
        assert!(ActionType::HoverSearchResult.is_hover());
        assert!(ActionType::ClickTarget.is_click());
        assert!(ActionType::WaitObserve.is_passive());
        assert!(!ActionType::WaitObserve.is_exploratory());
        assert!(ActionType::GoBack.navigates());
        assert!(!ActionType::PrepareToLeave.navigates());
        assert!(!ActionType::ReadContent.navigates());
    }

    #[test]
    fn intents_serialize_with_snake_case_actions() {
        let intent = ActionIntent::bare(ActionType::HoverSearchResult, 0.8);
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("hover_search_result"), "{json}");
    }

    #[test]
    fn bare_clamps_confidence() {
        assert_eq!(ActionIntent::bare(ActionType::ScrollDown, 1.7).confidence, 1.0);
    }
}
