//! Template sets and matching modes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::id::TemplateId;

/// How the locator compares a template with the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Color,
    Grayscale,
}

/// Interchangeable renderings of one logical button (logical OR).
///
/// The locator tries the templates in declared order and the first match is
/// authoritative. In configuration a single name is accepted as shorthand
/// for a one-element set:
///
/// ```toml
/// target = "btn.png"
/// target = ["btn.png", "btn_hover.png"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TemplateSet(Vec<TemplateId>);

impl TemplateSet {
    /// A set with exactly one template.
    #[must_use]
    pub fn single(template: impl Into<TemplateId>) -> Self {
        Self(vec![template.into()])
    }

    /// Iterate the alternates in declared order.
    pub fn iter(&self) -> std::slice::Iter<'_, TemplateId> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that the set is usable; `slot` names it in the error.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTemplateSet`] when the set is empty and
    /// [`ValidationError::EmptyTemplateName`] when a name is blank.
    pub fn validate(&self, slot: &str) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            return Err(ValidationError::EmptyTemplateSet {
                slot: slot.to_string(),
            });
        }
        if self.0.iter().any(TemplateId::is_blank) {
            return Err(ValidationError::EmptyTemplateName);
        }
        Ok(())
    }
}

impl<T: Into<TemplateId>> FromIterator<T> for TemplateSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a TemplateSet {
    type Item = &'a TemplateId;
    type IntoIter = std::slice::Iter<'a, TemplateId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'de> Deserialize<'de> for TemplateSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(TemplateId),
            Many(Vec<TemplateId>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(template) => Self(vec![template]),
            Repr::Many(templates) => Self(templates),
        })
    }
}

impl fmt::Display for TemplateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, template) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{template}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        target: TemplateSet,
    }

    #[test]
    fn should_parse_single_name_as_one_element_set() {
        let holder: Holder = toml::from_str("target = 'btn.png'").unwrap();
        assert_eq!(holder.target, TemplateSet::single("btn.png"));
    }

    #[test]
    fn should_parse_list_keeping_declared_order() {
        let holder: Holder = toml::from_str("target = ['a.png', 'b.png']").unwrap();
        let names: Vec<_> = holder.target.iter().map(TemplateId::as_str).collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }

    #[test]
    fn should_reject_empty_set() {
        let set: TemplateSet = Vec::<TemplateId>::new().into_iter().collect();
        assert_eq!(
            set.validate("target"),
            Err(ValidationError::EmptyTemplateSet {
                slot: "target".to_string()
            })
        );
    }

    #[test]
    fn should_reject_blank_template_name() {
        let set: TemplateSet = ["ok.png", " "].into_iter().collect();
        assert_eq!(set.validate("target"), Err(ValidationError::EmptyTemplateName));
    }

    #[test]
    fn should_display_alternates_separated_by_bar() {
        let set: TemplateSet = ["a.png", "b.png"].into_iter().collect();
        assert_eq!(set.to_string(), "a.png | b.png");
    }

    #[test]
    fn should_default_to_color_mode() {
        assert_eq!(ColorMode::default(), ColorMode::Color);
    }
}
