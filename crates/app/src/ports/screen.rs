//! Screen geometry port.

use autoclick_domain::error::AutoclickError;
use autoclick_domain::geometry::ScreenSize;

/// Reports the size of the screen the rules run on.
///
/// Queried once when the engine is built; named regions are resolved
/// against that size for the lifetime of the process.
pub trait ScreenGeometry {
    /// # Errors
    ///
    /// Returns [`AutoclickError::Platform`] when no screen can be queried.
    fn screen_size(&self) -> Result<ScreenSize, AutoclickError>;
}

/// A size measured up front, for when the screen handle itself has moved
/// into a locator.
impl ScreenGeometry for ScreenSize {
    fn screen_size(&self) -> Result<ScreenSize, AutoclickError> {
        Ok(*self)
    }
}
