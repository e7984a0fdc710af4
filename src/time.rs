use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

pub type Timestamp = DateTime<Utc>;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub fn unix_millis_to_timestamp(millis: i64) -> Option<Timestamp> {
    Utc.timestamp_millis_opt(millis).single()
}

pub trait TimestampFormat {
    fn to_timestamp_string(&self) -> String;
}

impl TimestampFormat for Timestamp {
    fn to_timestamp_string(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
