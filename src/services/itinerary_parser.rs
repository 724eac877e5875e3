//! Turns generated itinerary prose into days and activities.
//!
//! Parsing is best-effort: lines that match neither the timed nor the bullet
//! form are skipped, so a day made only of prose yields no activities and the
//! caller shows its raw content instead.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::activity::{Activity, ActivityCategory};
use crate::models::day::DayPlan;

/// Checked in order, first match wins. "market" sits in both the restaurant
/// and shopping groups and must resolve to restaurant.
const CATEGORY_KEYWORDS: &[(ActivityCategory, &[&str])] = &[
    (
        ActivityCategory::Restaurant,
        &["restaurant", "lunch", "dinner", "food", "cuisine", "market"],
    ),
    (
        ActivityCategory::Museum,
        &["museum", "temple", "shrine", "pavilion", "art"],
    ),
    (ActivityCategory::Park, &["park", "garden", "nature", "scenic"]),
    (
        ActivityCategory::Shopping,
        &["shopping", "market", "boutique", "store"],
    ),
    (ActivityCategory::Nightlife, &["nightlife", "bar", "club", "lounge"]),
    (ActivityCategory::Hotel, &["hotel", "accommodation", "stay"]),
];

const FALLBACK_DAY_TITLE: &str = "Day 1";

fn day_heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)Day\s*\d+").expect("day heading pattern is valid"))
}

fn timed_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(\d{1,2}:\d{2}\s*(?:AM|PM)?)\s*-\s*(.+)")
            .expect("timed line pattern is valid")
    })
}

/// Splits text on "Day N" headings. Text before the first heading is dropped;
/// text with no heading at all becomes a single "Day 1".
pub fn split_into_days(text: &str) -> Vec<DayPlan> {
    let headings: Vec<_> = day_heading_pattern().find_iter(text).collect();

    if headings.is_empty() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        return vec![DayPlan::new(FALLBACK_DAY_TITLE, trimmed)];
    }

    headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let end = headings
                .get(i + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            DayPlan::new(heading.as_str(), text[heading.end()..end].trim())
        })
        .collect()
}

/// Extracts activities from one day's content, one line at a time.
///
/// `9:00 AM - Place: what to do` gives a timed activity (the description is
/// optional). `- Place: what to do` gives an untimed one; a bullet without a
/// colon is dropped.
pub fn extract_activities(content: &str) -> Vec<Activity> {
    content.lines().filter_map(parse_activity_line).collect()
}

fn parse_activity_line(line: &str) -> Option<Activity> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    if let Some(captures) = timed_line_pattern().captures(trimmed) {
        let time = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let rest = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        let (location, description) = match rest.split_once(':') {
            Some((location, description)) => (location.trim(), description.trim()),
            None => (rest, ""),
        };
        return Some(activity(time, location, description));
    }

    if let Some(bullet) = trimmed.strip_prefix('-') {
        let (location, description) = bullet.trim().split_once(':')?;
        return Some(activity("", location.trim(), description.trim()));
    }

    None
}

fn activity(time: &str, location: &str, description: &str) -> Activity {
    Activity::new(
        time,
        location,
        description,
        infer_activity_type(location, description),
    )
}

/// Classifies an activity by keywords found in its location and description.
pub fn infer_activity_type(location: &str, description: &str) -> ActivityCategory {
    let text = format!("{} {}", location, description).to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(ActivityCategory::Activity)
}

/// Splits the text into days and fills each day's activities.
pub fn parse_itinerary(text: &str) -> Vec<DayPlan> {
    let mut days = split_into_days(text);
    for day in days.iter_mut() {
        day.activities = extract_activities(&day.content);
    }
    days
}
