use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::layout::columns::ColumnSlot;
use crate::layout::window::ClippedInterval;

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Fixed pixel scale of the hourly grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMetrics {
    pub hour_height: f64,
    pub timeline_start_hour: u32,
    pub event_min_height: f64,
    /// Vertical shift lining event blocks up with the hour labels.
    pub time_offset: f64,
    pub available_width: f64,
    pub column_gap: f64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            hour_height: 60.0,
            timeline_start_hour: 0,
            event_min_height: 20.0,
            time_offset: 15.0,
            available_width: 280.0,
            column_gap: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerticalSpan {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalSpan {
    pub left: f64,
    pub width: f64,
}

impl GridMetrics {
    /// Offset of a wall-clock time from the top of the grid, before `time_offset`.
    fn offset_of(&self, time: NaiveTime) -> f64 {
        let hours = time.hour() as f64 - self.timeline_start_hour as f64;
        hours * self.hour_height + (time.minute() as f64 / 60.0) * self.hour_height
    }

    pub fn map_vertical(&self, interval: &ClippedInterval<'_>) -> VerticalSpan {
        let top = self.offset_of(interval.display_start.time()) + self.time_offset;
        let duration_hours = interval.duration().num_milliseconds() as f64 / MILLIS_PER_HOUR;

        VerticalSpan {
            top,
            height: self.event_min_height.max(duration_hours * self.hour_height),
        }
    }

    pub fn map_horizontal(&self, slot: ColumnSlot) -> HorizontalSpan {
        self.map_horizontal_within(slot, self.available_width)
    }

    pub fn map_horizontal_within(&self, slot: ColumnSlot, available_width: f64) -> HorizontalSpan {
        let column_width = available_width / slot.total_columns.max(1) as f64;

        HorizontalSpan {
            left: slot.column as f64 * column_width,
            width: column_width - self.column_gap,
        }
    }

    /// Position of the "now" marker. The grid container already carries the
    /// alignment offset, so none is added here.
    /// Negative before `timeline_start_hour`.
    pub fn current_time_top(&self, now: NaiveTime) -> f64 {
        self.offset_of(now)
    }

    pub fn half_hour_line_top(&self, hour: u32) -> f64 {
        (hour as f64 - self.timeline_start_hour as f64) * self.hour_height + self.hour_height / 2.0
    }

    /// Hours drawn on the grid, from `timeline_start_hour` through 23.
    pub fn visible_hours(&self) -> std::ops::Range<u32> {
        self.timeline_start_hour.min(24)..24
    }

    /// Total drawable height of a full day grid.
    pub fn grid_height(&self) -> f64 {
        24u32.saturating_sub(self.timeline_start_hour) as f64 * self.hour_height
    }
}
