//! Session phases and their fixed progression order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One stage of the session state machine.
///
/// Phases progress monotonically in declaration order, with a single
/// allowed exception: one refinement loop-back from target acquisition
/// to the query phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Init,
    Navigate,
    Query,
    ScanResults,
    AcquireTarget,
    VisitTarget,
    ExploreSite,
}

impl Phase {
    /// Position in the canonical progression.
    pub fn rank(self) -> u8 {
        match self {
            Phase::Init => 0,
            Phase::Navigate => 1,
            Phase::Query => 2,
            Phase::ScanResults => 3,
            Phase::AcquireTarget => 4,
            Phase::VisitTarget => 5,
            Phase::ExploreSite => 6,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Navigate => "navigate",
            Phase::Query => "query",
            Phase::ScanResults => "scan_results",
            Phase::AcquireTarget => "acquire_target",
            Phase::VisitTarget => "visit_target",
            Phase::ExploreSite => "explore_site",
        };
        f.write_str(name)
    }
}
