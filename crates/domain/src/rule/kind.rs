//! Rule kind — which click behaviour a rule runs and the data it needs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::template::TemplateSet;
use crate::time::{default_click_interval, default_step_delay, secs};

/// The closed set of click behaviours.
///
/// Serialized with a `kind` tag so a rule reads as one flat TOML table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// Click the target every tick it is visible.
    SimpleClick { target: TemplateSet },

    /// Click the target twice, `click_interval` apart, every tick it is visible.
    DoubleClick {
        target: TemplateSet,
        #[serde(
            rename = "click_interval_secs",
            with = "secs",
            default = "default_click_interval"
        )]
        click_interval: Duration,
    },

    /// Click the target once each time the trigger appears.
    EdgeTriggeredClick {
        trigger: TemplateSet,
        /// Defaults to the trigger itself.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<TemplateSet>,
    },

    /// Click the target while visible, at most once per `rate_limit`.
    RateLimitedClick {
        target: TemplateSet,
        #[serde(rename = "rate_limit_secs", with = "secs")]
        rate_limit: Duration,
    },

    /// Click every step in order each time the trigger appears.
    EdgeTriggeredSequence {
        trigger: TemplateSet,
        steps: Vec<TemplateSet>,
        #[serde(
            rename = "step_delay_secs",
            with = "secs",
            default = "default_step_delay"
        )]
        step_delay: Duration,
    },
}

impl RuleKind {
    /// Snake-case name of the kind, as written in configuration.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SimpleClick { .. } => "simple_click",
            Self::DoubleClick { .. } => "double_click",
            Self::EdgeTriggeredClick { .. } => "edge_triggered_click",
            Self::RateLimitedClick { .. } => "rate_limited_click",
            Self::EdgeTriggeredSequence { .. } => "edge_triggered_sequence",
        }
    }

    /// Check the kind-specific invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for empty template sets or a sequence
    /// with fewer than two steps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::SimpleClick { target }
            | Self::DoubleClick { target, .. }
            | Self::RateLimitedClick { target, .. } => target.validate("target"),
            Self::EdgeTriggeredClick { trigger, target } => {
                trigger.validate("trigger")?;
                if let Some(target) = target {
                    target.validate("target")?;
                }
                Ok(())
            }
            Self::EdgeTriggeredSequence { trigger, steps, .. } => {
                trigger.validate("trigger")?;
                if steps.len() < 2 {
                    return Err(ValidationError::SequenceTooShort { steps: steps.len() });
                }
                for (i, step) in steps.iter().enumerate() {
                    step.validate(&format!("step {}", i + 1))?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SimpleClick { target } => write!(f, "simple_click({target})"),
            Self::DoubleClick {
                target,
                click_interval,
            } => write!(f, "double_click({target}, {click_interval:?})"),
            Self::EdgeTriggeredClick { trigger, target } => match target {
                Some(target) => write!(f, "edge_triggered_click({trigger} -> {target})"),
                None => write!(f, "edge_triggered_click({trigger})"),
            },
            Self::RateLimitedClick { target, rate_limit } => {
                write!(f, "rate_limited_click({target}, every {rate_limit:?})")
            }
            Self::EdgeTriggeredSequence { trigger, steps, .. } => {
                write!(f, "edge_triggered_sequence({trigger} -> {} steps)", steps.len())
            }
        }
    }
}
