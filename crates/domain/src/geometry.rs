//! Screen geometry value objects.

use std::fmt;

/// A point in global screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Size of the screen in pixels, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle: a search region or the bounding box of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center point, rounding half sizes down.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.left.saturating_add(half(self.width)),
            self.top.saturating_add(half(self.height)),
        )
    }

    /// Whether `other` lies fully inside this rectangle.
    #[must_use]
    pub fn encloses(&self, other: &Rect) -> bool {
        let (left, top) = (i64::from(self.left), i64::from(self.top));
        let (o_left, o_top) = (i64::from(other.left), i64::from(other.top));
        o_left >= left
            && o_top >= top
            && o_left + i64::from(other.width) <= left + i64::from(self.width)
            && o_top + i64::from(other.height) <= top + i64::from(self.height)
    }

    /// The same rectangle shifted by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left.saturating_add(dx),
            self.top.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}@({}, {})",
            self.width, self.height, self.left, self.top
        )
    }
}

fn half(len: u32) -> i32 {
    i32::try_from(len / 2).unwrap_or(i32::MAX)
}
