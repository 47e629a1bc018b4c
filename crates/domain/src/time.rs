//! Duration helpers.
//!
//! Configuration writes durations as (fractional) seconds; [`secs`] is the
//! serde adapter used by every duration field of a rule.

use std::time::Duration;

/// Delay between the two clicks of a double click.
pub const DEFAULT_CLICK_INTERVAL: Duration = Duration::from_secs(1);

/// Delay between two steps of a click sequence.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(500);

pub(crate) fn default_click_interval() -> Duration {
    DEFAULT_CLICK_INTERVAL
}

pub(crate) fn default_step_delay() -> Duration {
    DEFAULT_STEP_DELAY
}

/// `#[serde(with = "secs")]` for [`Duration`] fields written as seconds.
pub mod secs {
    use std::time::Duration;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as fractional seconds.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    /// Deserialize from a non-negative number of seconds.
    ///
    /// # Errors
    ///
    /// Fails on negative, NaN or overflowing values.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(value).map_err(|_| {
            D::Error::custom(format!(
                "invalid duration {value}: expected a non-negative number of seconds"
            ))
        })
    }
}
