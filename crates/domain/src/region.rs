//! Named search regions.
//!
//! Regions are stored by name and resolved to pixel rectangles only once the
//! screen size is known, so a rule set stays valid on any resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, ScreenSize};

/// A named area of the screen to search for templates in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchRegion {
    /// The right half of the screen: `(width / 2, 0, width / 2, height)`.
    RightHalf,
    /// The whole screen.
    #[default]
    FullScreen,
}

impl SearchRegion {
    /// Resolve the region against the screen size.
    #[must_use]
    pub fn resolve(self, screen: ScreenSize) -> Rect {
        match self {
            Self::RightHalf => {
                let half = screen.width / 2;
                Rect::new(
                    i32::try_from(half).unwrap_or(i32::MAX),
                    0,
                    half,
                    screen.height,
                )
            }
            Self::FullScreen => Rect::new(0, 0, screen.width, screen.height),
        }
    }
}

impl fmt::Display for SearchRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RightHalf => f.write_str("right_half"),
            Self::FullScreen => f.write_str("full_screen"),
        }
    }
}
