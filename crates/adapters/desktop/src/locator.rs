//! Template locator backed by live screen captures.

use image::RgbaImage;

use autoclick_app::ports::TemplateLocator;
use autoclick_domain::error::AutoclickError;
use autoclick_domain::geometry::Rect;
use autoclick_domain::id::TemplateId;
use autoclick_domain::template::ColorMode;

use crate::matcher;
use crate::screen::{DesktopScreen, FrameSource};
use crate::templates::TemplateStore;

/// Captures the screen on every lookup and matches one template against
/// the requested region.
pub struct ImageLocator<S = DesktopScreen> {
    screen: S,
    templates: TemplateStore,
}

impl<S: FrameSource> ImageLocator<S> {
    #[must_use]
    pub fn new(screen: S, templates: TemplateStore) -> Self {
        Self { screen, templates }
    }
}

impl<S: FrameSource> TemplateLocator for ImageLocator<S> {
    fn locate(
        &mut self,
        template: &TemplateId,
        region: Rect,
        confidence: f32,
        color_mode: ColorMode,
    ) -> Result<Option<Rect>, AutoclickError> {
        let Some(needle) = self.templates.get(template)? else {
            return Ok(None);
        };

        let frame = self.screen.capture()?;
        let origin = self.screen.origin();
        let Some(local) = clip(
            region.translate(-origin.x, -origin.y),
            frame.width(),
            frame.height(),
        ) else {
            return Ok(None);
        };

        let view = crop(&frame, local);
        let Some(found) = matcher::best_match(&view, needle, color_mode, confidence) else {
            tracing::trace!(%template, %region, "no match");
            return Ok(None);
        };

        let bounds = Rect::new(
            origin.x + local.left + offset(found.x),
            origin.y + local.top + offset(found.y),
            needle.width(),
            needle.height(),
        );
        tracing::trace!(%template, %bounds, score = found.score, "match");
        Ok(Some(bounds))
    }
}

/// Intersect `region` (frame coordinates) with a `width`×`height` frame.
fn clip(region: Rect, width: u32, height: u32) -> Option<Rect> {
    let left = i64::from(region.left).max(0);
    let top = i64::from(region.top).max(0);
    let right = (i64::from(region.left) + i64::from(region.width)).min(i64::from(width));
    let bottom = (i64::from(region.top) + i64::from(region.height)).min(i64::from(height));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        i32::try_from(left).ok()?,
        i32::try_from(top).ok()?,
        u32::try_from(right - left).ok()?,
        u32::try_from(bottom - top).ok()?,
    ))
}

/// `clip` only returns rectangles inside the frame, so the corner is never negative.
fn crop(frame: &RgbaImage, rect: Rect) -> RgbaImage {
    let left = u32::try_from(rect.left).unwrap_or(0);
    let top = u32::try_from(rect.top).unwrap_or(0);
    image::imageops::crop_imm(frame, left, top, rect.width, rect.height).to_image()
}

fn offset(pixels: u32) -> i32 {
    i32::try_from(pixels).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::error::DesktopError;
    use autoclick_domain::geometry::Point;

    struct StillFrame {
        origin: Point,
        image: RgbaImage,
    }

    impl FrameSource for StillFrame {
        fn origin(&self) -> Point {
            self.origin
        }

        fn capture(&self) -> Result<RgbaImage, DesktopError> {
            Ok(self.image.clone())
        }
    }

    fn noise(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(97) ^ y.wrapping_mul(193)).wrapping_mul(2_654_435_761);
            Rgba([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, 255])
        })
    }

    fn locator(origin: Point) -> ImageLocator<StillFrame> {
        let image = noise(80, 60);
        let button = image::imageops::crop_imm(&image, 50, 20, 8, 6).to_image();
        let mut templates = TemplateStore::new("/nonexistent/autoclick-templates");
        templates.preload("btn.png", button);
        ImageLocator::new(StillFrame { origin, image }, templates)
    }

    #[test]
    fn should_return_global_bounds_of_match() {
        let mut locator = locator(Point::new(0, 0));

        let found = locator
            .locate(&TemplateId::new("btn.png"), Rect::new(0, 0, 80, 60), 0.8, ColorMode::Color)
            .unwrap();

        assert_eq!(found, Some(Rect::new(50, 20, 8, 6)));
    }

    #[test]
    fn should_offset_bounds_by_region_and_monitor_origin() {
        let mut locator = locator(Point::new(100, 10));

        // Right half of the monitor, in global coordinates.
        let found = locator
            .locate(&TemplateId::new("btn.png"), Rect::new(140, 10, 40, 60), 0.8, ColorMode::Color)
            .unwrap();

        assert_eq!(found, Some(Rect::new(150, 30, 8, 6)));
    }

    #[test]
    fn should_not_find_template_outside_region() {
        let mut locator = locator(Point::new(0, 0));

        let found = locator
            .locate(&TemplateId::new("btn.png"), Rect::new(0, 0, 40, 60), 0.8, ColorMode::Color)
            .unwrap();

        assert_eq!(found, None);
    }

    #[test]
    fn should_report_missing_template_file() {
        let mut locator = locator(Point::new(0, 0));

        let result = locator.locate(
            &TemplateId::new("other.png"),
            Rect::new(0, 0, 80, 60),
            0.8,
            ColorMode::Color,
        );

        assert!(matches!(result, Err(AutoclickError::TemplateMissing(_))));
    }

    #[test]
    fn should_clip_region_to_frame() {
        assert_eq!(
            clip(Rect::new(-10, 5, 50, 100), 30, 40),
            Some(Rect::new(0, 5, 30, 35))
        );
    }

    #[test]
    fn should_return_none_for_region_outside_frame() {
        assert_eq!(clip(Rect::new(40, 0, 10, 10), 30, 40), None);
        assert_eq!(clip(Rect::new(0, 0, 0, 10), 30, 40), None);
    }
}
