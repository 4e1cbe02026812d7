//! Whole-second timestamps.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::util::datetime::{format_timestamp_rfc3339, parse_timestamp_rfc3339, DateTimeParseError};

/// A point in time with one-second resolution.
///
/// The wire format stores signed seconds since the Unix epoch, so any
/// sub-second component is dropped on conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    seconds: i64,
}

impl Timestamp {
    /// The Unix epoch.
    pub const UNIX_EPOCH: Timestamp = Timestamp { seconds: 0 };

    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    pub const fn unix_seconds(&self) -> i64 {
        self.seconds
    }

    /// Current wall-clock time, truncated to the second.
    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// Converts back to a [`SystemTime`].
    pub fn to_system_time(&self) -> SystemTime {
        let magnitude = Duration::from_secs(self.seconds.unsigned_abs());
        if self.seconds >= 0 {
            UNIX_EPOCH + magnitude
        } else {
            UNIX_EPOCH - magnitude
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let seconds = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs() as i64,
            // Before the epoch: round toward negative infinity
            Err(before) => {
                let d = before.duration();
                let whole = d.as_secs() as i64;
                if d.subsec_nanos() > 0 {
                    -whole - 1
                } else {
                    -whole
                }
            }
        };
        Self { seconds }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_timestamp_rfc3339(self.seconds))
    }
}

impl FromStr for Timestamp {
    type Err = DateTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_timestamp_rfc3339(s).map(Timestamp::from_unix_seconds)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
