//! Template images, loaded from disk on first use and cached.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::RgbaImage;

use autoclick_domain::error::{AutoclickError, TemplateMissingError};
use autoclick_domain::id::TemplateId;

use crate::error::DesktopError;

/// Resolves template ids to image files under one directory.
///
/// A missing file is reported once as [`AutoclickError::TemplateMissing`];
/// later lookups return `Ok(None)` until the file shows up.
pub struct TemplateStore {
    dir: PathBuf,
    loaded: HashMap<TemplateId, RgbaImage>,
    reported_missing: HashSet<TemplateId>,
}

impl TemplateStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            loaded: HashMap::new(),
            reported_missing: HashSet::new(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_of(&self, template: &TemplateId) -> PathBuf {
        self.dir.join(template.as_str())
    }

    /// The decoded template, or `None` when its file is (still) missing.
    ///
    /// # Errors
    ///
    /// - [`AutoclickError::TemplateMissing`] the first time a file is found missing.
    /// - [`AutoclickError::Platform`] when the file cannot be decoded.
    pub fn get(&mut self, template: &TemplateId) -> Result<Option<&RgbaImage>, AutoclickError> {
        if !self.loaded.contains_key(template) {
            let path = self.path_of(template);
            if !path.is_file() {
                if self.reported_missing.insert(template.clone()) {
                    return Err(TemplateMissingError {
                        template: template.clone(),
                        path,
                    }
                    .into());
                }
                return Ok(None);
            }

            let image = image::open(&path)
                .map_err(|source| DesktopError::Decode {
                    path: path.clone(),
                    source,
                })?
                .into_rgba8();
            tracing::debug!(
                %template,
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                "template loaded"
            );
            self.reported_missing.remove(template);
            self.loaded.insert(template.clone(), image);
        }
        Ok(self.loaded.get(template))
    }

    #[cfg(test)]
    pub(crate) fn preload(&mut self, template: &str, image: RgbaImage) {
        self.loaded.insert(TemplateId::new(template), image);
    }
}
