//! Calendar helpers shared by the ephemeris, scanner and timing services.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// MJD of the J2000.0 epoch (2000-01-01 12:00 TT, treated as UTC here).
pub const MJD_J2000: f64 = 51544.5;

/// MJD 40587.0 is the Unix epoch.
const MJD_UNIX_EPOCH: f64 = 40587.0;

/// Modified Julian Date of an instant.
pub fn mjd_from_datetime(dt: DateTime<Utc>) -> f64 {
    let secs = dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9;
    secs / 86400.0 + MJD_UNIX_EPOCH
}

/// Days elapsed since J2000.0 at 12:00 UTC on `date`.
pub fn days_since_j2000(date: NaiveDate) -> f64 {
    mjd_from_datetime(noon_utc(date)) - MJD_J2000
}

/// 12:00 UTC on `date`, the instant daily positions are evaluated at.
pub fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    at_hours(date, 12.0)
}

/// `date` at a fractional hour of the UTC day.
pub fn at_hours(date: NaiveDate, hours: f64) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    midnight + chrono::Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Every calendar day from `start` to `end` inclusive; empty when `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}
