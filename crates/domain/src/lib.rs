//! # autoclick-domain
//!
//! Pure domain model for the autoclick screen-automation loop.
//!
//! ## Responsibilities
//! - Foundational types: named identifiers, error conventions, geometry
//! - Define **Rules** (what to look for, where, and which click behaviour to run)
//! - Define **Template sets** (interchangeable renderings of one logical button)
//! - Define **Search regions** (named screen areas resolved against the screen size)
//! - Define **Rule state** transitions (rising edges, rate limits, success counters)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It never touches the screen, the mouse or the clock.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod geometry;
pub mod id;
pub mod region;
pub mod rule;
pub mod template;
pub mod time;
