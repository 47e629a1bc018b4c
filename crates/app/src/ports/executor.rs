//! Action executor port — the physical mouse.

use autoclick_domain::error::AutoclickError;
use autoclick_domain::geometry::Point;

/// Moves the cursor and clicks, in global screen coordinates.
pub trait ActionExecutor {
    /// Move to `point` and click the primary button there.
    ///
    /// # Errors
    ///
    /// Returns [`AutoclickError::Platform`] when input injection fails.
    fn click_at(&mut self, point: Point) -> Result<(), AutoclickError>;

    /// Current cursor position.
    ///
    /// # Errors
    ///
    /// Returns [`AutoclickError::Platform`] when the position cannot be read.
    fn cursor_position(&mut self) -> Result<Point, AutoclickError>;

    /// Move the cursor without clicking.
    ///
    /// # Errors
    ///
    /// Returns [`AutoclickError::Platform`] when input injection fails.
    fn move_cursor_to(&mut self, point: Point) -> Result<(), AutoclickError>;
}
