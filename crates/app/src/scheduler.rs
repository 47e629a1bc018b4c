//! Scheduler — the fixed-interval polling loop.
//!
//! Runs one [`RuleEngine`] pass per tick and waits `interval` between the end
//! of one pass and the start of the next. Shutdown is observed during that
//! wait, so a pass in progress (including a running sequence) always
//! finishes before the loop stops.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::ports::{ActionExecutor, TemplateLocator};
use crate::rule_engine::{RuleEngine, RuleSummary};

/// Wait between passes when none is configured.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// What the loop did before it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub rules: Vec<RuleSummary>,
}

impl RunSummary {
    /// Sum of every rule's success counter.
    #[must_use]
    pub fn total_successes(&self) -> u64 {
        self.rules.iter().map(|rule| rule.success_count).sum()
    }
}

pub struct Scheduler<L, E> {
    engine: RuleEngine<L, E>,
    interval: Duration,
    ticks: u64,
}

impl<L, E> Scheduler<L, E>
where
    L: TemplateLocator,
    E: ActionExecutor,
{
    #[must_use]
    pub fn new(engine: RuleEngine<L, E>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            ticks: 0,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &RuleEngine<L, E> {
        &self.engine
    }

    /// Run passes until `shutdown` resolves, then report the counters.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> RunSummary {
        let mut shutdown = std::pin::pin!(shutdown);

        tracing::info!(
            interval_ms = self.interval.as_millis(),
            rules = self.engine.rules().count(),
            "scheduler started"
        );

        loop {
            self.tick().await;

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = sleep(self.interval) => {}
            }
        }

        let summary = self.summary();
        tracing::info!(
            ticks = summary.ticks,
            successes = summary.total_successes(),
            "scheduler stopped"
        );
        summary
    }

    /// Run exactly one pass.
    pub async fn tick(&mut self) {
        self.ticks += 1;
        let report = self.engine.run_pass().await;
        for id in report.completed() {
            tracing::debug!(tick = self.ticks, rule = %id, "rule completed");
        }
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            rules: self.engine.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::testing::{FakeLocator, FakeScreen, SpyExecutor};
    use autoclick_domain::rule::{Rule, RuleKind};
    use autoclick_domain::template::TemplateSet;

    fn scheduler(interval: Duration) -> Scheduler<FakeLocator, SpyExecutor> {
        let rule = Rule::builder()
            .id("equip")
            .kind(RuleKind::SimpleClick {
                target: TemplateSet::single("btn.png"),
            })
            .build()
            .unwrap();
        let mut locator = FakeLocator::default();
        locator.place("btn.png", 1500, 600);
        let engine = RuleEngine::new(
            vec![rule],
            &FakeScreen::default(),
            locator,
            SpyExecutor::default(),
        )
        .unwrap();
        Scheduler::new(engine, interval)
    }

    #[tokio::test(start_paused = true)]
    async fn should_run_one_pass_before_observing_shutdown() {
        let mut scheduler = scheduler(DEFAULT_TICK_INTERVAL);

        let summary = scheduler.run(std::future::ready(())).await;

        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.rules[0].success_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_after_first_pass_when_shutdown_requested_during_it() {
        let mut scheduler = scheduler(Duration::from_secs(1));
        // Due while the first click is still settling.
        let requested = tokio::time::sleep(Duration::from_millis(5));

        let summary = scheduler.run(requested).await;

        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.total_successes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_at_fixed_interval_until_shutdown() {
        let mut scheduler = scheduler(Duration::from_secs(1));
        let start = Instant::now();

        // Each pass clicks once and settles for 10ms, then waits 1s.
        let summary = scheduler
            .run(tokio::time::sleep_until(start + Duration::from_millis(3500)))
            .await;

        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.total_successes(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_counting_across_runs() {
        let mut scheduler = scheduler(DEFAULT_TICK_INTERVAL);

        scheduler.tick().await;
        scheduler.tick().await;

        let summary = scheduler.summary();
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.total_successes(), 2);
        assert_eq!(
            scheduler.engine().state("equip").map(|s| s.success_count()),
            Some(2)
        );
    }
}
