//! Timeframe definitions for price sampling.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sampling interval in whole minutes.
///
/// Serialized as its display form (`"5m"`, `"1h"`), which is also the
/// interval string sent to price providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    minutes: u32,
}

impl Timeframe {
    /// Create a timeframe from a number of minutes.
    pub fn from_minutes(minutes: u32) -> Self {
        assert!(minutes > 0, "Timeframe must be at least one minute");
        Self { minutes }
    }

    /// Length of one bar in minutes.
    #[inline]
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Length of one bar as a duration.
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }

    /// The timeframes watched by default: 5, 15 and 30 minutes.
    pub fn defaults() -> Vec<Timeframe> {
        vec![
            Timeframe::from_minutes(5),
            Timeframe::from_minutes(15),
            Timeframe::from_minutes(30),
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes >= 60 && self.minutes % 60 == 0 {
            write!(f, "{}h", self.minutes / 60)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        let value: u32 = digits
            .parse()
            .map_err(|_| format!("Invalid timeframe: {}", s))?;

        let minutes = match unit {
            "" | "m" | "min" | "mins" => Some(value),
            "h" | "hour" | "hours" => value.checked_mul(60),
            _ => return Err(format!("Invalid timeframe unit: {}", s)),
        };

        match minutes {
            Some(m) if m > 0 => Ok(Timeframe { minutes: m }),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.to_string()
    }
}
