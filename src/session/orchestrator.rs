//! The session state machine.
//!
//! Drives one session through
//! `Init → Navigate → Query → ScanResults → AcquireTarget →
//! {VisitTarget → ExploreSite} → terminal`, applying the centralized
//! retry and fallback policy. Execution is strictly sequential: at most
//! one intent is outstanding, and the orchestrator awaits its outcome
//! before planning the next.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::acquisition::{canonicalize, TargetResolver};
use crate::cognition::CognitiveState;
use crate::context::{ContainerClass, ElementHandle, PageContext, ResultEntry};
use crate::interfaces::{
    ActionErrorKind, ActionExecutor, ActionOutcome, NavigationVerifier, PageAnalyzer,
};
use crate::persona::PersonaProfile;
use crate::planner::intent::{ActionIntent, ActionParams, ActionType};
use crate::planner::refine::refine_query;
use crate::planner::{ActionPlanner, PlannerMode};
use crate::utilities::config::EngineConfig;
use crate::utilities::errors::SessionError;
use crate::utilities::rng::BehaviorRng;

use super::budget::BudgetAllocator;
use super::phase::Phase;
use super::record::{ActionRecord, FailureCause, SessionRecord, TerminalStatus};

/// What the session is trying to do: search a query, reach a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGoal {
    /// Query submitted to the search surface.
    pub query: String,
    /// Canonical identifier of the destination, typically a bare domain.
    pub target: String,
}

/// Cooperative cancellation flag.
///
/// Honored between actions and at phase boundaries — never mid-action.
/// A cancelled session finalizes with status `Cancelled`, distinct from
/// `Failure`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// How the acquisition phase resolved.
enum Acquisition {
    /// Target clicked; proceed to the visit.
    Clicked,
    /// A non-target result clicked; the session continues marked
    /// target-not-found.
    ClickedAlternative,
    /// Loop back to the query phase with a refined query.
    Refine(String),
    /// Nothing matched and no fallback applied.
    Abandon,
    /// The click kept failing past its retry allowance.
    ClickFailed,
}

/// Drives one session to its terminal status.
pub struct SessionOrchestrator<E, A, V> {
    persona: Arc<PersonaProfile>,
    goal: SessionGoal,
    config: EngineConfig,
    state: CognitiveState,
    planner: ActionPlanner,
    resolver: TargetResolver,
    budget: BudgetAllocator,
    executor: E,
    analyzer: A,
    verifier: V,
    rng: BehaviorRng,
    cancel: CancelToken,
    record: SessionRecord,
    /// Canonical identifier the visit phase verifies against.
    destination: String,
}

impl<E, A, V> SessionOrchestrator<E, A, V>
where
    E: ActionExecutor,
    A: PageAnalyzer,
    V: NavigationVerifier,
{
    /// Orchestrator with default configuration and OS-entropy randomness.
    pub fn new(
        persona: Arc<PersonaProfile>,
        goal: SessionGoal,
        executor: E,
        analyzer: A,
        verifier: V,
    ) -> Self {
        let config = EngineConfig::default();
        let record = SessionRecord::begin(&persona.key, &goal.query, &goal.target);
        Self {
            state: CognitiveState::for_persona(&persona, config.continuation),
            planner: ActionPlanner::new(persona.clone(), config.diversity),
            resolver: TargetResolver::new(config.acquisition_threshold),
            budget: BudgetAllocator::new(config.budget_bounds, config.scan_window),
            destination: canonicalize(&goal.target),
            persona,
            goal,
            config,
            executor,
            analyzer,
            verifier,
            rng: BehaviorRng::from_entropy(),
            cancel: CancelToken::new(),
            record,
        }
    }

    /// Replace the configuration, rebuilding every derived component.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.state = CognitiveState::for_persona(&self.persona, config.continuation);
        self.planner = ActionPlanner::new(self.persona.clone(), config.diversity);
        self.resolver = TargetResolver::new(config.acquisition_threshold);
        self.budget = BudgetAllocator::new(config.budget_bounds, config.scan_window);
        self.config = config;
        self
    }

    /// Replace the randomness source (seeded in tests and replays).
    pub fn with_rng(mut self, rng: BehaviorRng) -> Self {
        self.rng = rng;
        self
    }

    /// Attach an external cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for cancelling this session from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Drive the session to its terminal status.
    ///
    /// Always yields a sealed record: on the ordinary paths as the `Ok`
    /// value, on the unexpected-fault path inside the error.
    pub async fn run(mut self) -> Result<SessionRecord, SessionError> {
        match self.drive().await {
            Ok((status, cause)) => {
                self.finalize(status, cause);
                Ok(self.record)
            }
            Err((phase, source)) => {
                self.finalize(TerminalStatus::Failure, Some(FailureCause::CollaboratorFault));
                Err(SessionError::Faulted {
                    phase,
                    record: Box::new(self.record),
                    source,
                })
            }
        }
    }

    async fn drive(
        &mut self,
    ) -> Result<(TerminalStatus, Option<FailureCause>), (Phase, anyhow::Error)> {
        self.enter(Phase::Init);
        if self.cancelled() {
            return Ok((TerminalStatus::Cancelled, None));
        }

        self.enter(Phase::Navigate);
        if !self.navigate().await {
            return Ok((TerminalStatus::Failure, Some(FailureCause::LoadFailed)));
        }

        let mut query = self.goal.query.clone();
        let mut refined = false;
        loop {
            if self.cancelled() {
                return Ok((TerminalStatus::Cancelled, None));
            }
            self.enter(Phase::Query);
            if !self.submit_query(&query, refined).await {
                return Ok((
                    TerminalStatus::Failure,
                    Some(FailureCause::QuerySubmissionFailed),
                ));
            }

            if self.cancelled() {
                return Ok((TerminalStatus::Cancelled, None));
            }
            self.enter(Phase::ScanResults);
            let ctx = self.analyze(Phase::ScanResults).await?;
            self.scan_results(&ctx).await;

            if self.cancelled() {
                return Ok((TerminalStatus::Cancelled, None));
            }
            self.enter(Phase::AcquireTarget);
            match self.acquire_target(&ctx, !refined).await {
                Acquisition::Clicked | Acquisition::ClickedAlternative => break,
                Acquisition::Refine(next) => {
                    refined = true;
                    self.record.note_refinement();
                    query = next;
                }
                Acquisition::Abandon => {
                    return Ok((TerminalStatus::Failure, Some(FailureCause::TargetNotFound)));
                }
                Acquisition::ClickFailed => {
                    return Ok((
                        TerminalStatus::Failure,
                        Some(FailureCause::ActionRetriesExhausted),
                    ));
                }
            }
        }

        if self.cancelled() {
            return Ok((TerminalStatus::Cancelled, None));
        }
        self.enter(Phase::VisitTarget);
        if !self.verify_arrival().await {
            return Ok((
                TerminalStatus::Failure,
                Some(FailureCause::NavigationMismatch),
            ));
        }

        if self.cancelled() {
            return Ok((TerminalStatus::Cancelled, None));
        }
        self.enter(Phase::ExploreSite);
        let ctx = self.analyze(Phase::ExploreSite).await?;
        self.explore(ctx).await?;
        if self.cancelled() {
            return Ok((TerminalStatus::Cancelled, None));
        }
        Ok((TerminalStatus::Success, None))
    }

    // ---- Phase bodies ----

    /// Load the search surface; one bounded retry on failure.
    async fn navigate(&mut self) -> bool {
        let intent = ActionIntent {
            action: ActionType::LoadSearchPage,
            params: ActionParams::default(),
            confidence: self.state.action_confidence(),
        };
        let outcome = self.execute_once(Phase::Navigate, &intent, 0.0).await;
        if outcome.succeeded {
            return true;
        }
        log::debug!("search surface load failed, retrying once");
        self.execute_once(Phase::Navigate, &intent, 0.0)
            .await
            .succeeded
    }

    /// Submit the query. A failure here is a hard precondition failure:
    /// no retry, the phase policy terminates the session.
    async fn submit_query(&mut self, query: &str, refined: bool) -> bool {
        let action = if refined {
            ActionType::RefineQuery
        } else {
            ActionType::SubmitQuery
        };
        let intent = ActionIntent {
            action,
            params: ActionParams {
                text: Some(query.to_string()),
                ..ActionParams::default()
            },
            confidence: self.state.action_confidence(),
        };
        self.execute_once(Phase::Query, &intent, 0.0).await.succeeded
    }

    /// Planner-driven scanning sub-loop: duration-bounded, observation
    /// only. The action ceiling is a runaway guard, not the bound.
    async fn scan_results(&mut self, ctx: &PageContext) {
        let budget = self.budget.scan_budget(&self.persona, &mut self.rng);
        log::debug!("scanning results for {}s", budget.as_secs());
        let mut spent = Duration::ZERO;
        let mut issued = 0u32;
        while spent < budget && issued < self.config.max_phase_actions {
            if self.cancel.is_cancelled() {
                return;
            }
            if !self.state.should_continue(self.record.elapsed(), &mut self.rng) {
                break;
            }
            let intent = self
                .planner
                .plan(ctx, &self.state, PlannerMode::Scan, &mut self.rng);
            let outcome = self
                .execute_once(Phase::ScanResults, &intent, ctx.complexity())
                .await;
            spent += outcome.observed_duration;
            issued += 1;
        }
    }

    /// Resolve and click the target, or fall back: refine the query (at
    /// most once per session), proceed on an alternative result, or give
    /// up.
    async fn acquire_target(&mut self, ctx: &PageContext, allow_refine: bool) -> Acquisition {
        match self.resolver.resolve(ctx, &self.goal.target) {
            Some(hit) => {
                log::info!(
                    "target acquired via {:?} at position {} (confidence {:.2})",
                    hit.strategy,
                    hit.position,
                    hit.confidence
                );
                let href = hit.element.href.clone();
                if self.click_result(href, hit.element, hit.confidence).await {
                    self.record.mark_target(true);
                    Acquisition::Clicked
                } else {
                    Acquisition::ClickFailed
                }
            }
            None => {
                if allow_refine && self.rng.chance(self.persona.search_refinement_likelihood) {
                    let (next, strategy) = refine_query(&self.goal.query, &mut self.rng);
                    log::info!("target not found, refining query via {strategy:?}");
                    return Acquisition::Refine(next);
                }
                match self.alternative_result(ctx) {
                    Some(alternative) => {
                        log::info!(
                            "target not found, proceeding on alternative result at position {}",
                            alternative.position
                        );
                        let element = alternative.handle.clone();
                        let href = element.href.clone();
                        let confidence = self.state.action_confidence();
                        if self.click_result(href, element, confidence).await {
                            self.record.mark_target(false);
                            Acquisition::ClickedAlternative
                        } else {
                            Acquisition::ClickFailed
                        }
                    }
                    None => Acquisition::Abandon,
                }
            }
        }
    }

    /// Click a result element, retrying transient failures.
    async fn click_result(
        &mut self,
        href: Option<String>,
        element: ElementHandle,
        confidence: f64,
    ) -> bool {
        if let Some(href) = href {
            self.destination = canonicalize(&href);
        }
        let intent = ActionIntent {
            action: ActionType::ClickTarget,
            params: ActionParams {
                element: Some(element),
                pre_hover: Some(
                    self.rng
                        .duration_between((1.0, 3.0))
                        .mul_f64(self.state.timing_modifier()),
                ),
                ..ActionParams::default()
            },
            confidence,
        };
        self.execute_with_retry(
            Phase::AcquireTarget,
            &intent,
            0.3,
            self.config.transient_retries,
        )
        .await
    }

    /// Highest-ranked primary result that is not the target.
    fn alternative_result<'c>(&self, ctx: &'c PageContext) -> Option<&'c ResultEntry> {
        let target = canonicalize(&self.goal.target);
        ctx.results
            .iter()
            .filter(|entry| entry.container == ContainerClass::Primary)
            .find(|entry| {
                entry
                    .handle
                    .href
                    .as_deref()
                    .map(canonicalize)
                    .is_some_and(|host| !host.is_empty() && host != target)
            })
    }

    /// Confirm the destination, tolerating one slow redirect.
    async fn verify_arrival(&mut self) -> bool {
        if self.verifier.verify(&self.destination).await {
            return true;
        }
        log::debug!("destination mismatch, allowing one redirect grace period");
        let settle = ActionIntent {
            action: ActionType::WaitObserve,
            params: ActionParams {
                duration: Some(Duration::from_secs_f64(self.config.redirect_grace_secs)),
                ..ActionParams::default()
            },
            confidence: self.state.action_confidence(),
        };
        self.execute_once(Phase::VisitTarget, &settle, 0.0).await;
        self.verifier.verify(&self.destination).await
    }

    /// Exploration loop over the main budget. Exits early when the
    /// cognitive state opts out, on budget exhaustion, or at the hard
    /// action ceiling. Successful in-site navigations refresh the
    /// snapshot.
    async fn explore(&mut self, mut ctx: PageContext) -> Result<(), (Phase, anyhow::Error)> {
        let budget = self
            .budget
            .main_budget(&self.persona, &ctx, &self.state, &mut self.rng);
        log::info!(
            "exploring {} for up to {}s",
            self.destination,
            budget.as_secs()
        );
        let mut spent = Duration::ZERO;
        let mut issued = 0u32;
        while spent < budget && issued < self.config.max_phase_actions {
            if self.cancel.is_cancelled() {
                return Ok(());
            }
            if !self.state.should_continue(self.record.elapsed(), &mut self.rng) {
                log::debug!("cognitive state opted out after {issued} actions");
                break;
            }
            let intent = self
                .planner
                .plan(&ctx, &self.state, PlannerMode::Explore, &mut self.rng);
            let leaving = intent.action == ActionType::PrepareToLeave;
            let navigates = intent.action.navigates();
            let outcome = self
                .execute_once(Phase::ExploreSite, &intent, ctx.complexity())
                .await;
            spent += outcome.observed_duration;
            issued += 1;
            if leaving {
                break;
            }
            if navigates && outcome.succeeded {
                ctx = self.analyze(Phase::ExploreSite).await?;
            }
        }
        Ok(())
    }

    // ---- Shared machinery ----

    fn enter(&mut self, phase: Phase) {
        log::debug!("phase -> {phase}");
        self.record.enter_phase(phase);
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn analyze(&mut self, phase: Phase) -> Result<PageContext, (Phase, anyhow::Error)> {
        self.analyzer.analyze().await.map_err(|e| (phase, e))
    }

    /// Execute one intent under the per-action timeout, record the
    /// outcome, and fold it into the cognitive state. A timeout is an
    /// ordinary failure, not a fault.
    async fn execute_once(
        &mut self,
        phase: Phase,
        intent: &ActionIntent,
        page_complexity: f64,
    ) -> ActionOutcome {
        let outcome = match timeout(self.config.action_timeout, self.executor.execute(intent)).await
        {
            Ok(outcome) => outcome,
            Err(_) => ActionOutcome::failed(ActionErrorKind::Timeout, self.config.action_timeout),
        };
        if let Some(kind) = &outcome.error_kind {
            log::debug!("{} failed in {phase}: {kind}", intent.action);
        }
        self.record.push_action(ActionRecord {
            phase,
            action: intent.action,
            confidence: intent.confidence,
            succeeded: outcome.succeeded,
            observed: outcome.observed_duration,
            error_kind: outcome.error_kind.clone(),
        });
        self.state.log_action(intent.action, intent.confidence);
        self.state.update(
            intent.action,
            outcome.observed_duration.as_secs_f64(),
            page_complexity,
        );
        outcome
    }

    /// Retry transient failures a bounded number of times; any other
    /// failure escalates immediately.
    async fn execute_with_retry(
        &mut self,
        phase: Phase,
        intent: &ActionIntent,
        page_complexity: f64,
        retries: u32,
    ) -> bool {
        let mut attempts = 0;
        loop {
            let outcome = self.execute_once(phase, intent, page_complexity).await;
            if outcome.succeeded {
                return true;
            }
            let transient = outcome
                .error_kind
                .as_ref()
                .is_some_and(ActionErrorKind::is_transient);
            if !transient || attempts >= retries {
                return false;
            }
            attempts += 1;
            log::debug!("retrying {} ({attempts}/{retries})", intent.action);
        }
    }

    fn finalize(&mut self, status: TerminalStatus, cause: Option<FailureCause>) {
        self.record.seal(status, cause, self.state.snapshot());
        match cause {
            Some(cause) => log::info!("session sealed: {status:?} ({cause:?})"),
            None => log::info!("session sealed: {status:?}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
