//! Rule — the unit of behaviour: what to look for, where, and how to click.
//!
//! A [`Rule`] pairs a [`RuleKind`] (the click behaviour and its templates)
//! with the search parameters shared by every kind. Its mutable bookkeeping
//! lives separately in [`RuleState`], owned by whoever evaluates the rule.

mod kind;
mod state;

pub use kind::RuleKind;
pub use state::RuleState;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AutoclickError, ValidationError};
use crate::id::RuleId;
use crate::region::SearchRegion;
use crate::template::ColorMode;

/// Confidence used when a rule does not set one.
pub const DEFAULT_CONFIDENCE: f32 = 0.8;

fn default_confidence() -> f32 {
    DEFAULT_CONFIDENCE
}

/// A configured screen-automation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(rename = "region", default)]
    pub search_region: SearchRegion,
    /// Searched only when nothing matched in `search_region`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_region: Option<SearchRegion>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub color_mode: ColorMode,
}

impl Rule {
    /// Create a builder for constructing a [`Rule`].
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AutoclickError::Validation`] when:
    /// - `id` is blank ([`ValidationError::EmptyId`])
    /// - `confidence` is outside `(0, 1]` ([`ValidationError::ConfidenceOutOfRange`])
    /// - the kind's templates or steps are invalid (see [`RuleKind::validate`])
    pub fn validate(&self) -> Result<(), AutoclickError> {
        if self.id.is_blank() {
            return Err(ValidationError::EmptyId.into());
        }
        if !(self.confidence > 0.0 && self.confidence <= 1.0) {
            return Err(ValidationError::ConfidenceOutOfRange(self.confidence).into());
        }
        self.kind.validate()?;
        Ok(())
    }
}

/// Validate every rule and check that ids are unique.
///
/// # Errors
///
/// Returns the first [`AutoclickError::Validation`] found, in declaration order.
pub fn validate_rule_set(rules: &[Rule]) -> Result<(), AutoclickError> {
    let mut seen = HashSet::new();
    for rule in rules {
        rule.validate()?;
        if !seen.insert(&rule.id) {
            return Err(ValidationError::DuplicateId(rule.id.clone()).into());
        }
    }
    Ok(())
}

/// Step-by-step builder for [`Rule`].
#[derive(Debug, Default)]
pub struct RuleBuilder {
    id: Option<RuleId>,
    kind: Option<RuleKind>,
    search_region: Option<SearchRegion>,
    fallback_region: Option<SearchRegion>,
    confidence: Option<f32>,
    color_mode: Option<ColorMode>,
}

impl RuleBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<RuleId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: RuleKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn search_region(mut self, region: SearchRegion) -> Self {
        self.search_region = Some(region);
        self
    }

    #[must_use]
    pub fn fallback_region(mut self, region: SearchRegion) -> Self {
        self.fallback_region = Some(region);
        self
    }

    #[must_use]
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    #[must_use]
    pub fn color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = Some(color_mode);
        self
    }

    /// Consume the builder, validate, and return a [`Rule`].
    ///
    /// # Errors
    ///
    /// Returns [`AutoclickError::Validation`] if the kind is missing or any
    /// invariant is broken.
    pub fn build(self) -> Result<Rule, AutoclickError> {
        let rule = Rule {
            id: self.id.unwrap_or_else(|| RuleId::new("")),
            kind: self.kind.ok_or(ValidationError::MissingKind)?,
            search_region: self.search_region.unwrap_or_default(),
            fallback_region: self.fallback_region,
            confidence: self.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            color_mode: self.color_mode.unwrap_or_default(),
        };
        rule.validate()?;
        Ok(rule)
    }
}
