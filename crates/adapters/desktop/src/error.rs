//! Desktop adapter error types.

use std::path::PathBuf;

use autoclick_domain::error::AutoclickError;

/// Errors specific to the desktop adapter.
#[derive(Debug, thiserror::Error)]
pub enum DesktopError {
    /// The display server reports no monitor.
    #[error("no monitor available")]
    NoMonitor,

    /// Listing monitors or capturing the screen failed.
    #[error("screen capture failed")]
    Capture(#[from] xcap::XCapError),

    /// The input system could not be opened.
    #[error("could not connect to the input system")]
    Connection(#[from] enigo::NewConError),

    /// Moving, clicking or reading the pointer failed.
    #[error("pointer input failed")]
    Input(#[from] enigo::InputError),

    /// A template file exists but is not a readable image.
    #[error("failed to decode template {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl DesktopError {
    /// Convert into an [`AutoclickError::Platform`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> AutoclickError {
        AutoclickError::Platform(Box::new(self))
    }
}

impl From<DesktopError> for AutoclickError {
    fn from(err: DesktopError) -> Self {
        err.into_domain()
    }
}
