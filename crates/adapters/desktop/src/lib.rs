//! # autoclick-adapter-desktop
//!
//! Desktop adapter — implements the screen and mouse ports against the real
//! display.
//!
//! ## How it works
//!
//! - [`DesktopScreen`] picks a monitor with `xcap` and reports its size.
//! - [`ImageLocator`] captures that monitor on every lookup, crops the
//!   searched region and scores templates with normalized cross-correlation.
//! - [`TemplateStore`] loads template images from a directory and caches them.
//! - [`EnigoPointer`] clicks and moves the cursor with `enigo`;
//!   [`DryRunPointer`] only logs.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `autoclick-app` and `autoclick-domain`.

mod error;
mod locator;
pub mod matcher;
mod pointer;
mod screen;
mod templates;

pub use error::DesktopError;
pub use locator::ImageLocator;
pub use pointer::{DryRunPointer, EnigoPointer};
pub use screen::{DesktopScreen, FrameSource};
pub use templates::TemplateStore;
