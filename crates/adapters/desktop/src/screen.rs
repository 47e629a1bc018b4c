//! Monitor selection and capture.

use image::RgbaImage;
use xcap::Monitor;

use autoclick_app::ports::ScreenGeometry;
use autoclick_domain::error::AutoclickError;
use autoclick_domain::geometry::{Point, ScreenSize};

use crate::error::DesktopError;

/// Something that can photograph the screen.
///
/// Frames are in monitor pixels; `origin` places the frame's top-left corner
/// in global coordinates.
pub trait FrameSource {
    fn origin(&self) -> Point;

    /// # Errors
    ///
    /// Returns [`DesktopError::Capture`] when the capture fails.
    fn capture(&self) -> Result<RgbaImage, DesktopError>;
}

/// The monitor the rules run on.
pub struct DesktopScreen {
    monitor: Monitor,
    origin: Point,
    size: ScreenSize,
}

impl DesktopScreen {
    /// Pick the primary monitor, or the first one listed when none is
    /// flagged primary.
    ///
    /// # Errors
    ///
    /// Returns [`DesktopError::NoMonitor`] when the display server lists no
    /// monitor, [`DesktopError::Capture`] when it cannot be queried.
    pub fn primary() -> Result<Self, DesktopError> {
        let mut monitors = Monitor::all()?;
        if monitors.is_empty() {
            return Err(DesktopError::NoMonitor);
        }
        let index = monitors
            .iter()
            .position(|monitor| monitor.is_primary().unwrap_or(false))
            .unwrap_or(0);
        let monitor = monitors.swap_remove(index);

        let origin = Point::new(monitor.x()?, monitor.y()?);
        let size = ScreenSize::new(monitor.width()?, monitor.height()?);
        tracing::info!(
            name = monitor.name().unwrap_or_default(),
            %origin,
            %size,
            "using monitor"
        );

        Ok(Self {
            monitor,
            origin,
            size,
        })
    }
}

impl FrameSource for DesktopScreen {
    fn origin(&self) -> Point {
        self.origin
    }

    fn capture(&self) -> Result<RgbaImage, DesktopError> {
        Ok(self.monitor.capture_image()?)
    }
}

impl ScreenGeometry for DesktopScreen {
    fn screen_size(&self) -> Result<ScreenSize, AutoclickError> {
        Ok(self.size)
    }
}
