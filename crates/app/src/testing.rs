//! In-memory port implementations shared by the unit tests.

use std::collections::{HashMap, HashSet};

use tokio::time::Instant;

use autoclick_domain::error::{AutoclickError, TemplateMissingError};
use autoclick_domain::geometry::{Point, Rect, ScreenSize};
use autoclick_domain::id::TemplateId;
use autoclick_domain::template::ColorMode;

use crate::ports::{ActionExecutor, ScreenGeometry, TemplateLocator};

pub(crate) const SCREEN: ScreenSize = ScreenSize::new(1920, 1080);

// ── Screen ─────────────────────────────────────────────────────────

pub(crate) struct FakeScreen(pub ScreenSize);

impl Default for FakeScreen {
    fn default() -> Self {
        Self(SCREEN)
    }
}

impl ScreenGeometry for FakeScreen {
    fn screen_size(&self) -> Result<ScreenSize, AutoclickError> {
        Ok(self.0)
    }
}

// ── Scripted locator ───────────────────────────────────────────────

/// A "screen" whose content the test edits between passes.
///
/// A placed template is found when its whole box lies inside the searched
/// region and its score reaches the requested confidence.
#[derive(Default)]
pub(crate) struct FakeLocator {
    placed: HashMap<TemplateId, (Rect, f32)>,
    missing: HashSet<TemplateId>,
    failing: HashSet<TemplateId>,
    pub queries: Vec<(TemplateId, Rect)>,
}

impl FakeLocator {
    /// Show `template` with its center at `(x, y)` and a perfect score.
    pub fn place(&mut self, template: &str, x: i32, y: i32) {
        self.place_scored(template, x, y, 1.0);
    }

    pub fn place_scored(&mut self, template: &str, x: i32, y: i32, score: f32) {
        let bounds = Rect::new(x - 20, y - 10, 40, 20);
        self.placed.insert(TemplateId::new(template), (bounds, score));
    }

    pub fn hide(&mut self, template: &str) {
        self.placed.remove(&TemplateId::new(template));
    }

    /// Pretend the template file does not exist.
    pub fn mark_missing(&mut self, template: &str) {
        self.missing.insert(TemplateId::new(template));
    }

    /// Make every lookup of `template` fail with a platform error.
    pub fn mark_failing(&mut self, template: &str) {
        self.failing.insert(TemplateId::new(template));
    }

    pub fn recover(&mut self, template: &str) {
        self.failing.remove(&TemplateId::new(template));
    }

    pub fn queried(&self) -> Vec<&str> {
        self.queries.iter().map(|(t, _)| t.as_str()).collect()
    }
}

impl TemplateLocator for FakeLocator {
    fn locate(
        &mut self,
        template: &TemplateId,
        region: Rect,
        confidence: f32,
        _color_mode: ColorMode,
    ) -> Result<Option<Rect>, AutoclickError> {
        self.queries.push((template.clone(), region));
        if self.failing.contains(template) {
            return Err(AutoclickError::Platform(Box::new(std::io::Error::other(
                "capture failed",
            ))));
        }
        if self.missing.contains(template) {
            return Err(TemplateMissingError {
                template: template.clone(),
                path: template.as_str().into(),
            }
            .into());
        }
        Ok(self
            .placed
            .get(template)
            .filter(|(bounds, score)| region.encloses(bounds) && *score >= confidence)
            .map(|(bounds, _)| *bounds))
    }
}

// ── Spy executor ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerEvent {
    Click(Point),
    Move(Point),
}

/// Records every pointer call with the (virtual) time it happened at.
pub(crate) struct SpyExecutor {
    pub cursor: Point,
    pub events: Vec<(Instant, PointerEvent)>,
    pub fail_clicks: bool,
    /// Clicks that succeed before every later one fails.
    pub clicks_before_failure: Option<usize>,
}

pub(crate) const USER_CURSOR: Point = Point::new(5, 5);

impl Default for SpyExecutor {
    fn default() -> Self {
        Self {
            cursor: USER_CURSOR,
            events: Vec::new(),
            fail_clicks: false,
            clicks_before_failure: None,
        }
    }
}

impl SpyExecutor {
    pub fn clicks(&self) -> Vec<Point> {
        self.events
            .iter()
            .filter_map(|(_, e)| match e {
                PointerEvent::Click(p) => Some(*p),
                PointerEvent::Move(_) => None,
            })
            .collect()
    }

    pub fn click_times(&self) -> Vec<Instant> {
        self.events
            .iter()
            .filter(|(_, e)| matches!(e, PointerEvent::Click(_)))
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn kinds(&self) -> Vec<PointerEvent> {
        self.events.iter().map(|(_, e)| *e).collect()
    }
}

impl ActionExecutor for SpyExecutor {
    fn click_at(&mut self, point: Point) -> Result<(), AutoclickError> {
        let exhausted = self
            .clicks_before_failure
            .is_some_and(|allowed| self.clicks().len() >= allowed);
        if self.fail_clicks || exhausted {
            return Err(AutoclickError::Platform(Box::new(std::io::Error::other(
                "input blocked",
            ))));
        }
        self.cursor = point;
        self.events.push((Instant::now(), PointerEvent::Click(point)));
        Ok(())
    }

    fn cursor_position(&mut self) -> Result<Point, AutoclickError> {
        Ok(self.cursor)
    }

    fn move_cursor_to(&mut self, point: Point) -> Result<(), AutoclickError> {
        self.cursor = point;
        self.events.push((Instant::now(), PointerEvent::Move(point)));
        Ok(())
    }
}
