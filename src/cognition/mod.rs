//! Cognitive modeling — per-session mutable state and the decision
//! functions derived from it.

pub mod coefficients;
pub mod emotion;
pub mod state;

pub use coefficients::CognitiveCoefficients;
pub use emotion::EmotionalState;
pub use state::{CognitiveSnapshot, CognitiveState, HistoryEntry};
