//! Mouse control.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

use autoclick_app::ports::ActionExecutor;
use autoclick_domain::error::AutoclickError;
use autoclick_domain::geometry::Point;

use crate::error::DesktopError;

/// Drives the real pointer through the platform input API.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    /// # Errors
    ///
    /// Returns [`DesktopError::Connection`] when the input system refuses the
    /// connection (missing permissions, no display server).
    pub fn new() -> Result<Self, DesktopError> {
        let enigo = Enigo::new(&Settings::default())?;
        Ok(Self { enigo })
    }
}

impl ActionExecutor for EnigoPointer {
    fn click_at(&mut self, point: Point) -> Result<(), AutoclickError> {
        self.enigo
            .move_mouse(point.x, point.y, Coordinate::Abs)
            .map_err(DesktopError::from)?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(DesktopError::from)?;
        Ok(())
    }

    fn cursor_position(&mut self) -> Result<Point, AutoclickError> {
        let (x, y) = self.enigo.location().map_err(DesktopError::from)?;
        Ok(Point::new(x, y))
    }

    fn move_cursor_to(&mut self, point: Point) -> Result<(), AutoclickError> {
        self.enigo
            .move_mouse(point.x, point.y, Coordinate::Abs)
            .map_err(DesktopError::from)?;
        Ok(())
    }
}

/// Logs clicks instead of performing them.
///
/// Keeps a virtual cursor so restore moves stay consistent.
#[derive(Debug, Default)]
pub struct DryRunPointer {
    cursor: Point,
    clicks: u64,
}

impl DryRunPointer {
    #[must_use]
    pub fn clicks(&self) -> u64 {
        self.clicks
    }
}

impl ActionExecutor for DryRunPointer {
    fn click_at(&mut self, point: Point) -> Result<(), AutoclickError> {
        self.cursor = point;
        self.clicks += 1;
        tracing::info!(x = point.x, y = point.y, "dry run: click");
        Ok(())
    }

    fn cursor_position(&mut self) -> Result<Point, AutoclickError> {
        Ok(self.cursor)
    }

    fn move_cursor_to(&mut self, point: Point) -> Result<(), AutoclickError> {
        self.cursor = point;
        tracing::debug!(x = point.x, y = point.y, "dry run: move");
        Ok(())
    }
}
