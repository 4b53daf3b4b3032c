//! Calendar arithmetic for collection schedules
//!
//! Due dates are plain calendar dates stepped by the loan's collection
//! frequency. Whenever a date has to become an instant (timestamps,
//! comparisons against "now" in the operator's zone) it is pinned to a
//! fixed reference time of day, noon UTC, so that daylight-saving or
//! UTC/local boundaries can never shift a due date by a day.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Unknown collection frequency: {0}")]
    UnknownFrequency(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Collection frequency for installment loans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    /// Every 7 days
    Weekly,
    /// Every 14 days
    Biweekly,
    /// Same day of month, clipped to month length
    Monthly,
}

impl Frequency {
    /// Advances a date by `periods` collection steps
    ///
    /// Weekly and biweekly steps are exact day counts. Monthly steps keep
    /// the day-of-month and clip to the target month's length (Jan 31 +
    /// one month = Feb 28/29).
    pub fn advance(&self, date: NaiveDate, periods: u32) -> NaiveDate {
        match self {
            Frequency::Weekly => date + Duration::weeks(i64::from(periods)),
            Frequency::Biweekly => date + Duration::weeks(2 * i64::from(periods)),
            Frequency::Monthly => date
                .checked_add_months(Months::new(periods))
                .expect("due date out of calendar range"),
        }
    }

    /// Returns the wire name used by the API and database
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "WEEKLY",
            Frequency::Biweekly => "BIWEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEEKLY" => Ok(Frequency::Weekly),
            "BIWEEKLY" => Ok(Frequency::Biweekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            other => Err(TemporalError::UnknownFrequency(other.to_string())),
        }
    }
}

/// Pins a business date to the fixed reference instant (noon UTC)
///
/// Noon keeps the instant a full half-day away from both midnight
/// boundaries, so converting back to a date in any operating timezone
/// yields the same calendar day.
pub fn reference_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0)
        .expect("noon is always a valid time")
        .and_utc()
}

/// Timezone of the lender's operating region
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name
    pub fn parse(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(name.to_string()))
    }

    /// The business date of an instant in this zone
    ///
    /// This is the date a payment "happened on" from the office's point
    /// of view, regardless of where the server clock lives.
    pub fn business_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Today's business date
    pub fn today(&self) -> NaiveDate {
        self.business_date(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}
