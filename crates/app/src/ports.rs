//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! All calls are blocking and made in-line from the single polling loop.

pub mod executor;
pub mod locator;
pub mod screen;

pub use executor::ActionExecutor;
pub use locator::TemplateLocator;
pub use screen::ScreenGeometry;
