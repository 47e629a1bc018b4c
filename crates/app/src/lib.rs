//! # autoclick-app
//!
//! Application layer — the polling loop and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `TemplateLocator` — find a template image in a screen region
//!   - `ActionExecutor` — click, read and move the mouse cursor
//!   - `ScreenGeometry` — report the screen size once at startup
//! - Provide the **use cases**:
//!   - `RuleEngine` — evaluate every rule once per pass and drive the executor
//!   - `Scheduler` — run passes at a fixed interval until shutdown
//! - Orchestrate domain objects without knowing *how* the screen is read
//!
//! ## Dependency rule
//! Depends on `autoclick-domain` only (plus `tokio::time` for delays).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod rule_engine;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;
