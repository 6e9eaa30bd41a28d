//! Multi-session batch driving.
//!
//! Runs independent sessions over a list of goals, rotating personas
//! from the shared catalog and spacing session starts with a
//! persona-derived delay rather than a fixed constant. Sessions share
//! nothing mutable; the immutable profiles are the only cross-session
//! state.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::interfaces::{ActionExecutor, NavigationVerifier, PageAnalyzer};
use crate::persona::{BrowsingSpeed, DeviceAffinity, PersonaCatalog, PersonaProfile};
use crate::session::{SessionGoal, SessionOrchestrator, SessionRecord, TerminalStatus};
use crate::utilities::config::EngineConfig;
use crate::utilities::errors::SessionError;
use crate::utilities::rng::BehaviorRng;

/// Batch-level options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Worker-pool width; `1` runs strictly sequentially.
    pub concurrency: usize,
    /// Base spacing between session starts, seconds.
    pub base_delay_secs: f64,
    /// Clamp on the computed inter-session delay, seconds.
    pub delay_bounds: (f64, f64),
    /// Seed for the batch randomness source; `None` uses OS entropy.
    pub seed: Option<u64>,
    /// Engine configuration handed to every session.
    pub engine: EngineConfig,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            base_delay_secs: 120.0,
            delay_bounds: (60.0, 300.0),
            seed: None,
            engine: EngineConfig::default(),
        }
    }
}

/// Aggregate view of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub sessions: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Sessions that ended on the unexpected-fault path.
    pub faulted: usize,
    pub targets_found: usize,
    pub mean_duration: Duration,
}

impl BatchSummary {
    fn from_results(results: &[Result<SessionRecord, SessionError>]) -> Self {
        let mut summary = Self {
            sessions: results.len(),
            ..Self::default()
        };
        let mut total = Duration::ZERO;
        for result in results {
            let record = match result {
                Ok(record) => record,
                Err(error) => {
                    summary.faulted += 1;
                    error.record()
                }
            };
            match record.status() {
                Some(TerminalStatus::Success) => summary.succeeded += 1,
                Some(TerminalStatus::Failure) => summary.failed += 1,
                Some(TerminalStatus::Cancelled) => summary.cancelled += 1,
                None => {}
            }
            if record.target_found() == Some(true) {
                summary.targets_found += 1;
            }
            total += record.total_duration();
        }
        if !results.is_empty() {
            summary.mean_duration = total / results.len() as u32;
        }
        summary
    }
}

/// Spacing before session `index` starts: base delay scaled by the
/// persona's pace, a coarse simulated time-of-day preference, and
/// uniform jitter, clamped to the configured bounds.
pub fn inter_session_delay(
    persona: &PersonaProfile,
    index: usize,
    options: &BatchOptions,
    rng: &mut BehaviorRng,
) -> Duration {
    let pace = match persona.browsing_speed {
        BrowsingSpeed::Slow => 1.2,
        BrowsingSpeed::Medium => 1.0,
        BrowsingSpeed::Fast => 0.8,
    };
    // The batch index doubles as a coarse clock: desk-bound personas
    // lean into business hours, mobile-first ones into the evening.
    let hour = (index as f64 * 0.5) % 24.0;
    let daypart = match persona.device_affinities.first() {
        Some(DeviceAffinity::Desktop | DeviceAffinity::Laptop) => {
            if (9.0..=17.0).contains(&hour) {
                0.9
            } else {
                1.1
            }
        }
        _ => {
            if (18.0..=23.0).contains(&hour) {
                0.9
            } else {
                1.0
            }
        }
    };
    let jitter = rng.uniform(0.7, 1.3);
    let secs = (options.base_delay_secs * pace * daypart * jitter)
        .clamp(options.delay_bounds.0, options.delay_bounds.1);
    Duration::from_secs_f64(secs)
}

/// Run every goal as its own session and summarize the batch.
///
/// `factory` builds one session's collaborators, called once per goal in
/// order. With `concurrency > 1` up to that many sessions run at once on
/// a worker pool; starts are still spaced by the inter-session delay.
pub async fn run_batch<F, E, A, V>(
    catalog: &PersonaCatalog,
    goals: Vec<SessionGoal>,
    mut factory: F,
    options: BatchOptions,
) -> (Vec<Result<SessionRecord, SessionError>>, BatchSummary)
where
    F: FnMut(usize, &SessionGoal) -> (E, A, V),
    E: ActionExecutor + 'static,
    A: PageAnalyzer + 'static,
    V: NavigationVerifier + 'static,
{
    let mut rng = match options.seed {
        Some(seed) => BehaviorRng::seeded(seed),
        None => BehaviorRng::from_entropy(),
    };

    let width = options.concurrency.max(1);
    let mut pool: JoinSet<(usize, Result<SessionRecord, SessionError>)> = JoinSet::new();
    let mut finished: BTreeMap<usize, Result<SessionRecord, SessionError>> = BTreeMap::new();

    for (index, goal) in goals.into_iter().enumerate() {
        let persona = catalog.rotated(&mut rng);
        if index > 0 {
            let delay = inter_session_delay(&persona, index, &options, &mut rng);
            log::debug!("waiting {}s before session {index}", delay.as_secs());
            tokio::time::sleep(delay).await;
        }

        let (executor, analyzer, verifier) = factory(index, &goal);
        let orchestrator = SessionOrchestrator::new(persona, goal, executor, analyzer, verifier)
            .with_config(options.engine.clone())
            .with_rng(rng.fork());

        while pool.len() >= width {
            drain_one(&mut pool, &mut finished).await;
        }
        pool.spawn(async move { (index, orchestrator.run().await) });
    }
    while !pool.is_empty() {
        drain_one(&mut pool, &mut finished).await;
    }

    let results: Vec<Result<SessionRecord, SessionError>> =
        finished.into_values().collect();
    let summary = BatchSummary::from_results(&results);
    log::info!(
        "batch done: {}/{} succeeded, {} targets found",
        summary.succeeded,
        summary.sessions,
        summary.targets_found
    );
    (results, summary)
}

async fn drain_one(
    pool: &mut JoinSet<(usize, Result<SessionRecord, SessionError>)>,
    finished: &mut BTreeMap<usize, Result<SessionRecord, SessionError>>,
) {
    match pool.join_next().await {
        Some(Ok((index, result))) => {
            finished.insert(index, result);
        }
        Some(Err(join_error)) => log::warn!("session task aborted: {join_error}"),
        None => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
