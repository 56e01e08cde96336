use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use odbc_api::sys::{Date, Time, Timestamp};

/// Transform an ODBC date into its chrono counterpart. `None` if the driver reports a date which
/// does not exist.
pub fn odbc_to_date(date: &Date) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year.into(), date.month.into(), date.day.into())
}

pub fn odbc_to_time(time: &Time) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(time.hour.into(), time.minute.into(), time.second.into())
}

/// `fraction` is reported in nanoseconds.
pub fn odbc_to_timestamp(from: &Timestamp) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(from.year.into(), from.month.into(), from.day.into())?;
    date.and_hms_nano_opt(
        from.hour.into(),
        from.minute.into(),
        from.second.into(),
        from.fraction,
    )
}

/// Date literal as understood by the driver, e.g. `2021-03-04`.
pub fn date_to_text(date: &NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Time literal, e.g. `12:30:00`. SQL `TIME` carries whole seconds, so any fraction is dropped.
pub fn time_to_text(time: &NaiveTime) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

/// Timestamp literal with millisecond precision, e.g. `2021-03-04 12:30:00.250`. Advantage stores
/// timestamps with millisecond precision, so the fraction is truncated to milliseconds. A leap
/// second is rendered as `59.999`.
pub fn timestamp_to_text(timestamp: &NaiveDateTime) -> String {
    // chrono represents a leap second as a nanosecond value above 999_999_999
    let millis = (timestamp.nanosecond() / 1_000_000).min(999);
    format!(
        "{} {}.{millis:03}",
        date_to_text(&timestamp.date()),
        time_to_text(&timestamp.time()),
    )
}
