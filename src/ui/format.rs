use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

use crate::calendar::Event;
use crate::layout::DayWindow;

static WORD_START_RE: OnceLock<Regex> = OnceLock::new();

fn word_start_pattern() -> &'static Regex {
    WORD_START_RE.get_or_init(|| {
        Regex::new(r"\b\w")
            .expect("invalid word start regex")
    })
}

pub const CONTINUES: &str = "(continues)";
pub const ALL_DAY_CONTINUES: &str = "All Day (continues)";

fn twelve_hour(hour: u32) -> (u32, &'static str) {
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    (display, suffix)
}

pub fn format_hour(hour: u32) -> String {
    let (display, suffix) = twelve_hour(hour);
    format!("{}:00 {}", display, suffix)
}

pub fn format_time(time: NaiveDateTime) -> String {
    let (display, suffix) = twelve_hour(time.hour());
    format!("{}:{:02} {}", display, time.minute(), suffix)
}

/// Time label for an event as seen on one day, marking the ends that spill
/// over into neighbouring days.
pub fn format_event_time_for_day(event: &Event, window: &DayWindow) -> String {
    let starts_before = event.start < window.start();
    let ends_after = event.end.is_some_and(|end| end > window.end());

    match event.end {
        _ if starts_before && ends_after => ALL_DAY_CONTINUES.to_string(),
        Some(end) if starts_before => format!("{} - {}", CONTINUES, format_time(end)),
        Some(_) if ends_after => format!("{} - {}", format_time(event.start), CONTINUES),
        Some(end) => format!("{} - {}", format_time(event.start), format_time(end)),
        None => format_time(event.start),
    }
}

/// `BIRTHDAY` -> `Birthday`, `IN_PROGRESS` -> `In Progress`.
pub fn format_event_type(tag: &str) -> String {
    let spaced = tag.replacen('_', " ", 1).to_lowercase();
    word_start_pattern()
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
