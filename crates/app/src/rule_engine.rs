//! Rule engine — evaluates every rule once per pass and drives the mouse.
//!
//! The engine owns the configured rules together with their runtime state.
//! A pass walks the rules in declaration order; each rule queries the
//! [`TemplateLocator`] and, depending on its kind, clicks through the
//! [`ActionExecutor`]. Rules never look at each other's outcome.
//!
//! Failures are contained per rule: a missing template file counts as "not
//! visible", any other locator or executor error is logged and the pass moves
//! on to the next rule.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::Instrument as _;

use autoclick_domain::error::AutoclickError;
use autoclick_domain::geometry::{Point, Rect};
use autoclick_domain::id::{RuleId, TemplateId};
use autoclick_domain::region::SearchRegion;
use autoclick_domain::rule::{Rule, RuleKind, RuleState, validate_rule_set};
use autoclick_domain::template::{ColorMode, TemplateSet};

use crate::ports::{ActionExecutor, ScreenGeometry, TemplateLocator};

/// Pause between a click and the cursor restore so the target UI registers
/// the click before the pointer leaves.
pub const CLICK_SETTLE: Duration = Duration::from_millis(10);

/// A template found on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    /// Which alternate of the set matched.
    pub template: TemplateId,
    pub bounds: Rect,
    /// The named region it was found in (primary or fallback).
    pub region: SearchRegion,
}

/// What a rule did during one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Nothing to act on.
    Idle,
    /// Visible, but the rate limit has not expired yet.
    RateLimited,
    /// An action ran to completion and was counted.
    Completed,
    /// The trigger appeared but the target was not on screen; the edge is consumed.
    TargetMissing,
    /// A sequence stopped at this (1-indexed) step.
    Aborted { step: usize },
    /// The locator or executor failed; the error was logged.
    Failed,
}

/// Per-rule outcomes of one pass, in declaration order.
#[derive(Debug, Default)]
pub struct PassReport {
    pub outcomes: Vec<(RuleId, RuleOutcome)>,
}

impl PassReport {
    /// Rules that completed an action during the pass.
    pub fn completed(&self) -> impl Iterator<Item = &RuleId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == RuleOutcome::Completed)
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<&RuleOutcome> {
        self.outcomes
            .iter()
            .find(|(rule, _)| rule.as_str() == id)
            .map(|(_, outcome)| outcome)
    }
}

/// Final counter of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSummary {
    pub id: RuleId,
    pub kind: &'static str,
    pub success_count: u64,
}

/// Search parameters of a rule, with regions resolved against the screen.
#[derive(Debug, Clone, Copy)]
struct Search {
    primary: (SearchRegion, Rect),
    fallback: Option<(SearchRegion, Rect)>,
    confidence: f32,
    color_mode: ColorMode,
}

struct RuleSlot {
    rule: Rule,
    state: RuleState,
    search: Search,
}

struct Capabilities<L, E> {
    locator: L,
    executor: E,
}

/// Evaluates a fixed, ordered set of rules against the live screen.
pub struct RuleEngine<L, E> {
    slots: Vec<RuleSlot>,
    capabilities: Capabilities<L, E>,
}

impl<L, E> RuleEngine<L, E>
where
    L: TemplateLocator,
    E: ActionExecutor,
{
    /// Validate the rules, read the screen size once and create the runtime
    /// state of every rule.
    ///
    /// # Errors
    ///
    /// Returns [`AutoclickError::Validation`] for an invalid rule set and
    /// [`AutoclickError::Platform`] when the screen size cannot be read.
    pub fn new(
        rules: Vec<Rule>,
        screen: &impl ScreenGeometry,
        locator: L,
        executor: E,
    ) -> Result<Self, AutoclickError> {
        validate_rule_set(&rules)?;
        let size = screen.screen_size()?;

        let slots: Vec<_> = rules
            .into_iter()
            .map(|rule| {
                let search = Search {
                    primary: (rule.search_region, rule.search_region.resolve(size)),
                    fallback: rule
                        .fallback_region
                        .map(|region| (region, region.resolve(size))),
                    confidence: rule.confidence,
                    color_mode: rule.color_mode,
                };
                RuleSlot {
                    rule,
                    state: RuleState::new(),
                    search,
                }
            })
            .collect();

        tracing::info!(screen = %size, rules = slots.len(), "rule engine ready");

        Ok(Self {
            slots,
            capabilities: Capabilities { locator, executor },
        })
    }

    /// Evaluate every rule once, in declaration order.
    ///
    /// Never fails: per-rule errors are logged and reported as
    /// [`RuleOutcome::Failed`].
    pub async fn run_pass(&mut self) -> PassReport {
        let mut report = PassReport::default();

        for slot in &mut self.slots {
            let id = slot.rule.id.clone();
            let span = tracing::info_span!("rule", rule = %id);
            let outcome = match self.capabilities.evaluate(slot).instrument(span).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(rule = %id, error = ?err, "rule evaluation failed, continuing with next rule");
                    RuleOutcome::Failed
                }
            };
            report.outcomes.push((id, outcome));
        }

        report
    }

    /// Success counters of every rule, in declaration order.
    #[must_use]
    pub fn summary(&self) -> Vec<RuleSummary> {
        self.slots
            .iter()
            .map(|slot| RuleSummary {
                id: slot.rule.id.clone(),
                kind: slot.rule.kind.name(),
                success_count: slot.state.success_count(),
            })
            .collect()
    }

    /// Runtime state of the rule with the given id.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<&RuleState> {
        self.slots
            .iter()
            .find(|slot| slot.rule.id.as_str() == id)
            .map(|slot| &slot.state)
    }

    /// The configured rules, in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.slots.iter().map(|slot| &slot.rule)
    }
}

impl<L, E> Capabilities<L, E>
where
    L: TemplateLocator,
    E: ActionExecutor,
{
    async fn evaluate(&mut self, slot: &mut RuleSlot) -> Result<RuleOutcome, AutoclickError> {
        let RuleSlot {
            rule,
            state,
            search,
        } = slot;

        match &rule.kind {
            RuleKind::SimpleClick { target } => {
                let Some(found) = self.find(target, search)? else {
                    return Ok(RuleOutcome::Idle);
                };
                self.click_restoring(found.bounds.center()).await?;
                Ok(record_completed(state, &found))
            }
            RuleKind::DoubleClick {
                target,
                click_interval,
            } => {
                let Some(found) = self.find(target, search)? else {
                    return Ok(RuleOutcome::Idle);
                };
                self.double_click_restoring(found.bounds.center(), *click_interval)
                    .await?;
                Ok(record_completed(state, &found))
            }
            RuleKind::EdgeTriggeredClick { trigger, target } => {
                let seen = self.find(trigger, search)?;
                if !state.observe(seen.is_some()) {
                    return Ok(RuleOutcome::Idle);
                }
                let found = match target {
                    Some(target) => self.find(target, search)?,
                    None => seen,
                };
                let Some(found) = found else {
                    tracing::info!(
                        templates = %target.as_ref().unwrap_or(trigger),
                        "trigger appeared but target not found, waiting for the next appearance"
                    );
                    return Ok(RuleOutcome::TargetMissing);
                };
                self.click_restoring(found.bounds.center()).await?;
                Ok(record_completed(state, &found))
            }
            RuleKind::RateLimitedClick { target, rate_limit } => {
                let Some(found) = self.find(target, search)? else {
                    return Ok(RuleOutcome::Idle);
                };
                let now = Instant::now().into_std();
                if !state.rate_limit_elapsed(now, *rate_limit) {
                    tracing::debug!(template = %found.template, "visible but rate limited");
                    return Ok(RuleOutcome::RateLimited);
                }
                self.click_restoring(found.bounds.center()).await?;
                state.record_action(now);
                Ok(record_completed(state, &found))
            }
            RuleKind::EdgeTriggeredSequence {
                trigger,
                steps,
                step_delay,
            } => {
                let seen = self.find(trigger, search)?;
                if !state.observe(seen.is_some()) {
                    return Ok(RuleOutcome::Idle);
                }
                tracing::info!(steps = steps.len(), "trigger appeared, starting sequence");
                let outcome = self.run_sequence(steps, *step_delay, search).await?;
                if outcome == RuleOutcome::Completed {
                    state.record_success();
                    tracing::info!(count = state.success_count(), "sequence completed");
                }
                Ok(outcome)
            }
        }
    }

    /// Try the primary region, then the fallback region if nothing matched.
    fn find(
        &mut self,
        set: &TemplateSet,
        search: &Search,
    ) -> Result<Option<TemplateMatch>, AutoclickError> {
        if let Some(found) = self.find_in(set, search.primary, search)? {
            return Ok(Some(found));
        }
        match search.fallback {
            Some(fallback) => self.find_in(set, fallback, search),
            None => Ok(None),
        }
    }

    /// Try each alternate in declared order; the first match wins.
    fn find_in(
        &mut self,
        set: &TemplateSet,
        (region, rect): (SearchRegion, Rect),
        search: &Search,
    ) -> Result<Option<TemplateMatch>, AutoclickError> {
        for template in set {
            match self
                .locator
                .locate(template, rect, search.confidence, search.color_mode)
            {
                Ok(Some(bounds)) => {
                    tracing::debug!(%template, %region, %bounds, "template matched");
                    return Ok(Some(TemplateMatch {
                        template: template.clone(),
                        bounds,
                        region,
                    }));
                }
                Ok(None) => {}
                Err(AutoclickError::TemplateMissing(err)) => {
                    tracing::warn!(%err, "template file missing, treating as not visible");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    /// Click once, then put the cursor back where the user left it.
    async fn click_restoring(&mut self, point: Point) -> Result<(), AutoclickError> {
        let original = self.executor.cursor_position()?;
        let clicked = self.executor.click_at(point);
        sleep(CLICK_SETTLE).await;
        let restored = self.executor.move_cursor_to(original);
        clicked.and(restored)
    }

    async fn double_click_restoring(
        &mut self,
        point: Point,
        interval: Duration,
    ) -> Result<(), AutoclickError> {
        let original = self.executor.cursor_position()?;
        let clicked = self.click_twice(point, interval).await;
        let restored = self.executor.move_cursor_to(original);
        clicked.and(restored)
    }

    async fn click_twice(&mut self, point: Point, interval: Duration) -> Result<(), AutoclickError> {
        self.executor.click_at(point)?;
        sleep(interval).await;
        self.executor.click_at(point)?;
        sleep(CLICK_SETTLE).await;
        Ok(())
    }

    /// The cursor is restored once, after the last step or the abort.
    async fn run_sequence(
        &mut self,
        steps: &[TemplateSet],
        delay: Duration,
        search: &Search,
    ) -> Result<RuleOutcome, AutoclickError> {
        let original = self.executor.cursor_position()?;
        let outcome = self.click_steps(steps, delay, search).await;
        let restored = self.executor.move_cursor_to(original);
        outcome.and_then(|outcome| restored.map(|()| outcome))
    }

    async fn click_steps(
        &mut self,
        steps: &[TemplateSet],
        delay: Duration,
        search: &Search,
    ) -> Result<RuleOutcome, AutoclickError> {
        let total = steps.len();
        for (index, step) in steps.iter().enumerate() {
            let number = index + 1;
            if index > 0 {
                sleep(delay).await;
            }
            let Some(found) = self.find(step, search)? else {
                tracing::info!(step = number, total, templates = %step, "sequence step not found, aborting");
                return Ok(RuleOutcome::Aborted { step: number });
            };
            let point = found.bounds.center();
            self.executor.click_at(point)?;
            tracing::info!(step = number, total, template = %found.template, x = point.x, y = point.y, "sequence step clicked");
        }
        sleep(CLICK_SETTLE).await;
        Ok(RuleOutcome::Completed)
    }
}

fn record_completed(state: &mut RuleState, found: &TemplateMatch) -> RuleOutcome {
    state.record_success();
    let point = found.bounds.center();
    tracing::info!(
        template = %found.template,
        region = %found.region,
        x = point.x,
        y = point.y,
        count = state.success_count(),
        "clicked"
    );
    RuleOutcome::Completed
}
