//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AutoclickError`] via `#[from]` when crossing a port boundary.

use std::path::PathBuf;

use crate::id::{RuleId, TemplateId};

/// Base error for everything that crosses a port boundary.
#[derive(Debug, thiserror::Error)]
pub enum AutoclickError {
    /// A rule or rule set broke a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A template image is not present on disk.
    #[error("template missing")]
    TemplateMissing(#[from] TemplateMissingError),

    /// Screen capture, image decoding or input injection failed.
    #[error("platform error")]
    Platform(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("rule id must not be empty")]
    EmptyId,

    #[error("rule id {0} is used more than once")]
    DuplicateId(RuleId),

    #[error("rule kind is required")]
    MissingKind,

    #[error("{slot} must list at least one template")]
    EmptyTemplateSet {
        /// Which part of the rule the set belongs to (`target`, `trigger`, `step 2`, …).
        slot: String,
    },

    #[error("template name must not be empty")]
    EmptyTemplateName,

    #[error("confidence must be in (0, 1], got {0}")]
    ConfidenceOutOfRange(f32),

    #[error("a click sequence needs at least 2 steps, got {steps}")]
    SequenceTooShort { steps: usize },
}

/// A template identifier that does not resolve to a file.
#[derive(Debug, thiserror::Error)]
#[error("template {template} not found at {}", path.display())]
pub struct TemplateMissingError {
    pub template: TemplateId,
    pub path: PathBuf,
}
