use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

/// Offset of the zone every human-entered time is read in (UTC+4).
pub const REFERENCE_OFFSET_SECS: i32 = 4 * 3600;

const MINUTES_PER_DAY: f64 = 1440.0;

pub fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).expect("reference offset is within one day")
}

/// Parses `H:mm` / `HH:mm` (one or two hour digits, exactly two minute digits).
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let (hours, minutes) = raw.trim().split_once(':')?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Combines a calendar date and a local `HH:mm` into an absolute instant.
pub fn local_to_instant(date: NaiveDate, hhmm: &str) -> Option<DateTime<Utc>> {
    let time = parse_hhmm(hhmm)?;

    reference_offset()
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Inverse of [`local_to_instant`]: `("HH:mm", local calendar date)`.
pub fn instant_to_local(instant: &DateTime<Utc>) -> (String, NaiveDate) {
    let local = instant.with_timezone(&reference_offset());
    (local.format("%H:%M").to_string(), local.date_naive())
}

/// Today's calendar date in the reference zone.
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&reference_offset()).date_naive()
}

/// Midnight of `date` in the reference zone. This is the storage key of a day record.
pub fn day_key(date: NaiveDate) -> DateTime<Utc> {
    reference_offset()
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN).and_utc())
}

/// Calendar date (reference zone) a stored `day` instant stands for.
pub fn calendar_date(day: &DateTime<Utc>) -> NaiveDate {
    day.with_timezone(&reference_offset()).date_naive()
}

/// Spreadsheet cells store time as a fraction of a day.
///
/// Values of 1 or more come from summary/duration cells and are decoded
/// with the same formula, so `1.25` is 30 elapsed hours (`"30:00"`), not a
/// wall-clock `06:00`.
pub fn numeric_time_to_local(value: f64) -> Option<String> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    let minutes = (value * MINUTES_PER_DAY).round() as i64;
    Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

pub fn seconds_to_hhmm(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}

/// `"HH:mm"` duration to decimal hours. Hours are not capped at 23.
pub fn hhmm_to_hours(raw: &str) -> Option<f64> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes > 59 {
        return None;
    }

    Some(hours as f64 + minutes as f64 / 60.0)
}

pub fn minutes_of_day(time: &NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Wire dates are `DD/MM/YYYY`; ISO `YYYY-MM-DD` is accepted on input.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

pub fn format_wire_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
