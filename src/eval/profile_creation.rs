use bson::Bson;

use crate::time::{unix_millis_to_timestamp, Timestamp, MILLIS_PER_DAY};

use super::{first_field, Error, EvalFunc, Result};

/// FHR `profileCreation` is in whole days since the epoch. The result is plain UTC arithmetic,
/// with no calendar or time zone involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCreationTime;

impl ProfileCreationTime {
    pub const NAME: &'static str = "ProfileCreationTime";

    pub fn new() -> Self {
        Self
    }

    pub fn exec_timestamp(&self, input: Option<&[Bson]>) -> Result<Option<Timestamp>> {
        let Some(millis) = self.exec(input)? else {
            return Ok(None);
        };
        unix_millis_to_timestamp(millis)
            .map(Some)
            .ok_or(Error::TimestampOverflow { days: millis / MILLIS_PER_DAY })
    }
}

impl EvalFunc for ProfileCreationTime {
    type Output = i64;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn exec(&self, input: Option<&[Bson]>) -> Result<Option<i64>> {
        match first_field(input) {
            Some(value) => days_to_unix_millis(day_count(value)?).map(Some),
            None => Ok(None),
        }
    }
}

/// [`ProfileCreationTime`] with the result as a UTC timestamp. Rows beyond chrono's range
/// fail with [`Error::TimestampOverflow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCreationTimestamp;

impl EvalFunc for ProfileCreationTimestamp {
    type Output = Timestamp;

    fn name(&self) -> &str {
        "ProfileCreationTimestamp"
    }

    fn exec(&self, input: Option<&[Bson]>) -> Result<Option<Timestamp>> {
        ProfileCreationTime.exec_timestamp(input)
    }
}

pub fn days_to_unix_millis(days: i64) -> Result<i64> {
    days.checked_mul(MILLIS_PER_DAY)
        .ok_or(Error::TimestampOverflow { days })
}

pub fn day_count(value: &Bson) -> Result<i64> {
    let days = match value {
        Bson::Int32(days) => Some(i64::from(*days)),
        Bson::Int64(days) => Some(*days),
        Bson::Double(days) => truncate(*days),
        Bson::String(text) => parse_days(text),
        _ => None,
    };
    days.ok_or_else(|| Error::DateParse {
        element_type: value.element_type(),
        value: value.to_string(),
    })
}

fn truncate(days: f64) -> Option<i64> {
    // `as` saturates, so huge finite values surface later as an overflow
    days.is_finite().then(|| days.trunc() as i64)
}

fn parse_days(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(truncate))
}
