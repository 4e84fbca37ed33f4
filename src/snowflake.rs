use chrono::{DateTime, Local, TimeZone};
use std::fmt;

// First second of 2015, the epoch Discord snowflakes count from
pub const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = MS_PER_MINUTE * 60;
const MS_PER_DAY: u64 = MS_PER_HOUR * 24;
const MS_PER_MONTH: u64 = MS_PER_DAY * 30;
const MS_PER_YEAR: u64 = MS_PER_DAY * 365;

/// Unix time in milliseconds at which the snowflake was minted.
///
/// The top 42 bits of a snowflake hold the milliseconds since the Discord epoch,
/// so shifting off the low 22 bits is the same as dividing by 4_194_304.
pub fn created_at_ms(id: u64) -> u64 {
    (id >> 22) + DISCORD_EPOCH_MS
}

/// `M/D/YYYY` in the local time zone, the way the Discord client shows dates
pub fn human_date(unix_ms: u64) -> String {
    human_date_in(unix_ms, &Local)
}

pub fn human_date_in<Tz>(unix_ms: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match DateTime::from_timestamp_millis(unix_ms as i64) {
        Some(utc) => utc.with_timezone(tz).format("%-m/%-d/%Y").to_string(),
        None => "unknown date".to_string(),
    }
}

/// Coarse "how long ago" text for the span between `previous` and `current`.
///
/// Each bucket is picked by successive threshold comparison and the count is
/// whole units only, so 59_999ms is still "59 seconds ago". Months are 30 days
/// and years 365 days, hence the "approximately" on the larger buckets.
pub fn time_difference(current_ms: u64, previous_ms: u64) -> String {
    let elapsed = current_ms.saturating_sub(previous_ms);

    if elapsed < MS_PER_MINUTE {
        format!("{} seconds ago", elapsed / MS_PER_SECOND)
    } else if elapsed < MS_PER_HOUR {
        format!("{} minutes ago", elapsed / MS_PER_MINUTE)
    } else if elapsed < MS_PER_DAY {
        format!("{} hours ago", elapsed / MS_PER_HOUR)
    } else if elapsed < MS_PER_MONTH {
        format!("approximately {} days ago", elapsed / MS_PER_DAY)
    } else if elapsed < MS_PER_YEAR {
        format!("approximately {} months ago", elapsed / MS_PER_MONTH)
    } else {
        format!("approximately {} years ago", elapsed / MS_PER_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn snowflake_to_unix_ms() {
        // id 0 is the epoch itself
        assert_eq!(created_at_ms(0), DISCORD_EPOCH_MS);
        assert_eq!(created_at_ms(1 << 22), DISCORD_EPOCH_MS + 1);
        // the low 22 bits (worker, process, increment) are ignored
        assert_eq!(created_at_ms((5 << 22) | 0x3F_FFFF), DISCORD_EPOCH_MS + 5);
        // example from the Discord developer docs
        assert_eq!(created_at_ms(175_928_847_299_117_063), 1_462_015_105_796);
    }

    #[test]
    fn human_date_is_unpadded() {
        assert_eq!(human_date_in(DISCORD_EPOCH_MS, &Utc), "1/1/2015");
        assert_eq!(human_date_in(1_462_015_105_796, &Utc), "4/30/2016");
        assert_eq!(human_date_in(1_702_425_600_000, &Utc), "12/13/2023");
    }

    #[test]
    fn seconds_bucket() {
        assert_eq!(time_difference(0, 0), "0 seconds ago");
        assert_eq!(time_difference(999, 0), "0 seconds ago");
        assert_eq!(time_difference(1_000, 0), "1 seconds ago");
        assert_eq!(time_difference(59_999, 0), "59 seconds ago");
    }

    #[test]
    fn minute_hour_day_boundaries() {
        assert_eq!(time_difference(60_000, 0), "1 minutes ago");
        assert_eq!(time_difference(MS_PER_HOUR - 1, 0), "59 minutes ago");
        assert_eq!(time_difference(MS_PER_HOUR, 0), "1 hours ago");
        assert_eq!(time_difference(MS_PER_DAY - 1, 0), "23 hours ago");
        assert_eq!(time_difference(MS_PER_DAY, 0), "approximately 1 days ago");
        assert_eq!(time_difference(MS_PER_MONTH - 1, 0), "approximately 29 days ago");
    }

    #[test]
    fn month_and_year_boundaries() {
        assert_eq!(time_difference(MS_PER_MONTH, 0), "approximately 1 months ago");
        // 364 days is still 12 thirty-day months
        assert_eq!(time_difference(MS_PER_YEAR - 1, 0), "approximately 12 months ago");
        assert_eq!(time_difference(MS_PER_YEAR, 0), "approximately 1 years ago");
        assert_eq!(time_difference(MS_PER_YEAR * 8 + MS_PER_DAY, 0), "approximately 8 years ago");
    }

    #[test]
    fn offset_previous_and_future_timestamps() {
        let created = created_at_ms(175_928_847_299_117_063);
        assert_eq!(time_difference(created + 90_000, created), "1 minutes ago");
        assert_eq!(time_difference(created, created + 5_000), "0 seconds ago");
    }
}
