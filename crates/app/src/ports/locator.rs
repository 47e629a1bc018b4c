//! Template locator port — "is this image on screen, and where?".

use autoclick_domain::error::AutoclickError;
use autoclick_domain::geometry::Rect;
use autoclick_domain::id::TemplateId;
use autoclick_domain::template::ColorMode;

/// Finds template images on the live screen.
///
/// Each call looks at the screen as it is *now*; two calls in a row may see
/// different content.
pub trait TemplateLocator {
    /// Search `region` (global screen coordinates) for `template`.
    ///
    /// Returns the bounding box of the best match scoring at least
    /// `confidence`, or `None` when the template is not visible.
    ///
    /// # Errors
    ///
    /// - [`AutoclickError::TemplateMissing`] when the template file does not
    ///   exist. Callers treat this as "not visible".
    /// - [`AutoclickError::Platform`] when capturing or decoding fails.
    fn locate(
        &mut self,
        template: &TemplateId,
        region: Rect,
        confidence: f32,
        color_mode: ColorMode,
    ) -> Result<Option<Rect>, AutoclickError>;
}
