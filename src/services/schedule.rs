use std::sync::OnceLock;

use chrono::{Duration, NaiveTime, Timelike};
use regex::Regex;

use crate::models::activity::Activity;

/// Time given to the first activity of a day whenever times are recomputed.
pub const SENTINEL_START_TIME: &str = "9:00 AM";
pub const HOURS_BETWEEN_ACTIVITIES: i64 = 2;

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(AM|PM)?").expect("clock pattern is valid")
    })
}

/// Reads "9:00 AM", "9:00pm" or a 24-hour "14:30". Without a period the hour
/// is taken on the 24-hour clock.
pub fn parse_clock_time(time: &str) -> Option<NaiveTime> {
    let captures = clock_pattern().captures(time)?;
    let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = captures.get(2)?.as_str().parse().ok()?;

    let hour = match captures.get(3).map(|m| m.as_str().to_uppercase()) {
        Some(period) => {
            if hour > 12 {
                return None;
            }
            (hour % 12) + if period == "PM" { 12 } else { 0 }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Formats on the 12-hour clock with an unpadded hour, e.g. "1:05 PM".
pub fn format_clock_time(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

/// Moves a display time forward, wrapping around midnight. An empty time
/// starts at the sentinel; a time that cannot be read is left as it is.
pub fn advance_time(time: &str, hours: i64) -> String {
    if time.trim().is_empty() {
        return SENTINEL_START_TIME.to_string();
    }

    match parse_clock_time(time) {
        Some(parsed) => {
            let (advanced, _) = parsed.overflowing_add_signed(Duration::hours(hours));
            format_clock_time(advanced)
        }
        None => time.to_string(),
    }
}

/// Reassigns every time in the list: the sentinel first, then two hours apart.
pub fn recompute_times(activities: &mut [Activity]) {
    let mut previous: Option<String> = None;
    for activity in activities.iter_mut() {
        let time = match &previous {
            None => SENTINEL_START_TIME.to_string(),
            Some(prev) => advance_time(prev, HOURS_BETWEEN_ACTIVITIES),
        };
        activity.time = time.clone();
        previous = Some(time);
    }
}
