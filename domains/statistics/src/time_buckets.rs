use std::fmt;

use chrono::{
    Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime,
};
use serde::{Deserialize, Serialize};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
pub const INDIVIDUAL_KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Granularity used to group orders into report buckets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BucketMode {
    #[default]
    Day,
    Week,
    Month,
    Individual,
}

impl BucketMode {
    pub const ALL: [BucketMode; 4] = [
        BucketMode::Day,
        BucketMode::Week,
        BucketMode::Month,
        BucketMode::Individual,
    ];

    /// Maps a request parameter to a mode. Anything unrecognised buckets by
    /// day.
    pub fn from_param(mode: &str) -> Self {
        match mode {
            "week" => BucketMode::Week,
            "month" => BucketMode::Month,
            "individual" => BucketMode::Individual,
            _ => BucketMode::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketMode::Day => "day",
            BucketMode::Week => "week",
            BucketMode::Month => "month",
            BucketMode::Individual => "individual",
        }
    }

    /// Start of the bucket containing `timestamp`. Day and individual
    /// buckets keep the timestamp as is; the key format does the rest.
    pub fn bucket_start(&self, timestamp: NaiveDateTime) -> NaiveDateTime {
        match self {
            BucketMode::Day | BucketMode::Individual => timestamp,
            BucketMode::Week => {
                timestamp
                    - Days::new(
                        timestamp.weekday().num_days_from_monday() as u64,
                    )
            }
            BucketMode::Month => {
                (timestamp.date() - Days::new(timestamp.day0() as u64))
                    .and_time(NaiveTime::MIN)
            }
        }
    }

    pub fn bucket_key(&self, timestamp: NaiveDateTime) -> String {
        match self {
            BucketMode::Individual => {
                timestamp.format(INDIVIDUAL_KEY_FORMAT).to_string()
            }
            _ => day_key(self.bucket_start(timestamp).date()),
        }
    }
}

impl From<&str> for BucketMode {
    fn from(mode: &str) -> Self { BucketMode::from_param(mode) }
}

impl fmt::Display for BucketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Monday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_monday() as u64)
}

/// First and last representable instant of a calendar day.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::microseconds(1);
    (start, end)
}
