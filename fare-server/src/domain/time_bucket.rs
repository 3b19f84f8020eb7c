//! Coarse time-of-day buckets used as a fare-model input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown time bucket.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time bucket {value:?}: must be one of morning, afternoon, night")]
pub struct InvalidTimeBucket {
    value: String,
}

/// Time of day at which the trip starts.
///
/// This is a closed set: the scoring model was trained on exactly these
/// three categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Night,
}

impl TimeBucket {
    /// All buckets, in declaration order.
    pub const ALL: [TimeBucket; 3] = [TimeBucket::Morning, TimeBucket::Afternoon, TimeBucket::Night];

    /// Parse a bucket from its lowercase name.
    ///
    /// Matching is exact: `"Morning"` and `" night"` are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_server::domain::TimeBucket;
    ///
    /// assert_eq!(TimeBucket::parse("night").unwrap(), TimeBucket::Night);
    /// assert!(TimeBucket::parse("noon").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidTimeBucket> {
        match s {
            "morning" => Ok(TimeBucket::Morning),
            "afternoon" => Ok(TimeBucket::Afternoon),
            "night" => Ok(TimeBucket::Night),
            other => Err(InvalidTimeBucket {
                value: other.to_string(),
            }),
        }
    }

    /// The lowercase name passed to the scoring model.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Night => "night",
        }
    }
}

impl FromStr for TimeBucket {
    type Err = InvalidTimeBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for bucket in TimeBucket::ALL {
            assert_eq!(TimeBucket::parse(bucket.as_str()).unwrap(), bucket);
        }
    }

    #[test]
    fn reject_unknown_and_case_variants() {
        assert!(TimeBucket::parse("noon").is_err());
        assert!(TimeBucket::parse("Morning").is_err());
        assert!(TimeBucket::parse(" night").is_err());
        assert!(TimeBucket::parse("").is_err());
    }

    #[test]
    fn error_names_the_value() {
        let err = TimeBucket::parse("noon").unwrap_err();
        assert!(err.to_string().contains("\"noon\""));
    }

    #[test]
    fn serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&TimeBucket::Afternoon).unwrap(), "\"afternoon\"");
        let b: TimeBucket = serde_json::from_str("\"night\"").unwrap();
        assert_eq!(b, TimeBucket::Night);
    }
}
