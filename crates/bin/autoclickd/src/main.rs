//! # autoclickd — screen-automation daemon
//!
//! Composition root that wires the desktop adapter into the rule engine and
//! runs the polling loop until interrupted.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Pick the monitor and open the input system (adapters)
//! - Construct the rule engine and scheduler, injecting adapters via port traits
//! - Stop on Ctrl+C / SIGTERM and print the per-rule counters
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod shutdown;

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use autoclick_adapter_desktop::{
    DesktopScreen, DryRunPointer, EnigoPointer, ImageLocator, TemplateStore,
};
use autoclick_app::ports::{ActionExecutor, ScreenGeometry, TemplateLocator};
use autoclick_app::rule_engine::RuleEngine;
use autoclick_app::scheduler::{RunSummary, Scheduler};
use autoclick_domain::rule::Rule;

use crate::shutdown::Shutdown;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).context("invalid log filter")?,
        )
        .init();

    let shutdown = Shutdown::install().context("failed to listen for termination signals")?;

    // Screen
    let screen = DesktopScreen::primary().context("failed to open the screen")?;
    let size = screen.screen_size()?;
    let templates = TemplateStore::new(config.templates.dir.clone());
    tracing::info!(dir = %templates.dir().display(), "loading templates");
    let locator = ImageLocator::new(screen, templates);

    let rules = config.effective_rules();
    let interval = config.interval();

    // Pointer
    let summary = if config.pointer.dry_run {
        tracing::warn!("dry run: clicks are logged, the mouse does not move");
        let engine = RuleEngine::new(rules, &size, locator, DryRunPointer::default())?;
        run(engine, interval, shutdown).await
    } else {
        let pointer = EnigoPointer::new().context("failed to open the input system")?;
        let engine = RuleEngine::new(rules, &size, locator, pointer)?;
        run(engine, interval, shutdown).await
    };

    print_summary(&summary);
    Ok(())
}

async fn run<L, E>(engine: RuleEngine<L, E>, interval: Duration, shutdown: Shutdown) -> RunSummary
where
    L: TemplateLocator,
    E: ActionExecutor,
{
    engine.rules().for_each(log_rule);
    let mut scheduler = Scheduler::new(engine, interval);
    scheduler.run(shutdown.wait()).await
}

fn log_rule(rule: &Rule) {
    tracing::info!(
        rule = %rule.id,
        kind = %rule.kind,
        region = %rule.search_region,
        confidence = rule.confidence,
        "rule loaded"
    );
}

fn print_summary(summary: &RunSummary) {
    println!("stopped after {} ticks", summary.ticks);
    for rule in &summary.rules {
        println!("  {:<24} {:<24} {}", rule.id.as_str(), rule.kind, rule.success_count);
    }
    println!("total successful actions: {}", summary.total_successes());
}
