use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::calendar::Event;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Local midnight through 23:59:59.999 of one calendar date. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayWindow {
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        Self {
            date,
            start,
            end: start + Duration::milliseconds(MILLIS_PER_DAY - 1),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// `[hh:00:00.000, hh:59:59.999]` of this day, or `None` for hours past 23.
    pub fn hour_bounds(&self, hour: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let from = self.date.and_hms_opt(hour, 0, 0)?;
        Some((from, from + Duration::milliseconds(60 * 60 * 1000 - 1)))
    }

    /// Whether the event's raw interval touches this day. Point events only
    /// count on the day they start.
    pub fn includes(&self, event: &Event) -> bool {
        event.touches(self.start, self.end)
    }
}

/// The part of an event that is visible inside a [`DayWindow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedInterval<'a> {
    pub event: &'a Event,
    pub display_start: NaiveDateTime,
    pub display_end: NaiveDateTime,
}

impl<'a> ClippedInterval<'a> {
    pub fn event_id(&self) -> &'a str {
        &self.event.id
    }

    pub fn duration(&self) -> Duration {
        self.display_end - self.display_start
    }

    pub fn overlaps(&self, other: &ClippedInterval<'_>) -> bool {
        self.display_start < other.display_end && self.display_end > other.display_start
    }

    pub fn starts_before_window(&self, window: &DayWindow) -> bool {
        self.event.start < window.start()
    }

    pub fn continues_past_window(&self, window: &DayWindow) -> bool {
        self.event.end.is_some_and(|end| end > window.end())
    }
}

/// Clips an event to the day window. Returns `None` when the event's raw interval
/// lies entirely outside the day.
pub fn clip<'a>(event: &'a Event, window: &DayWindow) -> Option<ClippedInterval<'a>> {
    if !window.includes(event) {
        return None;
    }

    let display_start = event.start.max(window.start());
    let display_end = event.display_end().min(window.end()).max(display_start);

    Some(ClippedInterval {
        event,
        display_start,
        display_end,
    })
}
