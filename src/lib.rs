//! # meander
//!
//! Persona-driven behavioral decision engine for organic, multi-phase
//! browsing sessions.
//!
//! A session moves through search → result scan → target acquisition →
//! target visit → site exploration, looking like a person rather than a
//! script while tolerating the routine failures of live pages. The
//! engine owns the decisions — cognitive state, weighted action
//! sampling, phase sequencing, fallback policy — and consumes the
//! browser through three narrow collaborator traits
//! ([`ActionExecutor`], [`PageAnalyzer`], [`NavigationVerifier`]).
//! Everything stochastic draws from one seedable [`BehaviorRng`], so
//! tests replay sessions deterministically.

pub mod acquisition;
pub mod batch;
pub mod cognition;
pub mod context;
pub mod interfaces;
pub mod persona;
pub mod planner;
pub mod session;
pub mod utilities;

// Flat re-exports of the main surface.
pub use acquisition::{AcquisitionStrategy, TargetAcquisitionResult, TargetResolver};
pub use batch::{run_batch, BatchOptions, BatchSummary};
pub use cognition::{CognitiveSnapshot, CognitiveState, EmotionalState};
pub use context::{PageContext, PageType};
pub use interfaces::{
    ActionErrorKind, ActionExecutor, ActionOutcome, NavigationVerifier, PageAnalyzer,
};
pub use persona::{PersonaCatalog, PersonaProfile};
pub use planner::{ActionIntent, ActionPlanner, ActionType, DiversityTracker, PlannerMode};
pub use session::{
    BudgetAllocator, CancelToken, FailureCause, Phase, SessionGoal, SessionOrchestrator,
    SessionRecord, TerminalStatus,
};
pub use utilities::config::EngineConfig;
pub use utilities::errors::{PersonaError, SessionError};
pub use utilities::rng::BehaviorRng;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
