//! Named identifier newtypes.
//!
//! Rules and templates are named by the operator in the configuration file,
//! so identifiers are plain strings rather than generated values.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_name {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a name.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the underlying name.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// `true` when the name is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name!(
    /// Stable identifier of a [`Rule`](crate::rule::Rule), used for counters and logs.
    RuleId
);

define_name!(
    /// Name of a template image, relative to the template directory (e.g. `btn.png`).
    TemplateId
);
