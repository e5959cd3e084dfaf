use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::app::AppState;
use crate::calendar::{EventTiming, EventType};
use crate::ui::format::{format_date, format_event_time_for_day, format_event_type, format_hour};
use crate::ui::theme::event_color_hex;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub title: String,
    pub is_today: bool,
    pub grid_height: f64,
    pub current_time_top: Option<f64>,
    pub hours: Vec<HourRow>,
    pub blocks: Vec<EventBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRow {
    pub hour: u32,
    pub label: String,
    pub half_hour_top: f64,
    pub event_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBlock {
    pub event_id: String,
    pub title: String,
    pub event_type: EventType,
    pub type_label: String,
    pub color: &'static str,
    pub time_label: String,
    pub timing: EventTiming,
    pub location: Option<String>,
    pub created_by: Option<String>,
    pub display_start: NaiveDateTime,
    pub display_end: NaiveDateTime,
    pub column: usize,
    pub total_columns: usize,
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
}

pub fn calculate_layout(state: &AppState) -> DayLayout {
    calculate_layout_at(state, Local::now().naive_local())
}

/// Lays out the selected day as seen at `now`, which drives the today flag,
/// the current time marker and each block's timing.
pub fn calculate_layout_at(state: &AppState, now: NaiveDateTime) -> DayLayout {
    let timeline = state.timeline();
    let window = *timeline.window();
    let metrics = &state.metrics;
    let is_today = state.is_today(now.date());

    let blocks = timeline
        .place(metrics)
        .into_iter()
        .map(|placed| {
            let event = placed.interval.event;
            EventBlock {
                event_id: event.id.clone(),
                title: event.title.clone(),
                event_type: event.event_type,
                type_label: format_event_type(event.event_type.as_str()),
                color: event_color_hex(event.event_type),
                time_label: format_event_time_for_day(event, &window),
                timing: event.timing_at(now),
                location: event.location.clone(),
                created_by: event.creator_name(),
                display_start: placed.interval.display_start,
                display_end: placed.interval.display_end,
                column: placed.slot.column,
                total_columns: placed.slot.total_columns,
                top: placed.vertical.top,
                height: placed.vertical.height,
                left: placed.horizontal.left,
                width: placed.horizontal.width,
            }
        })
        .collect();

    let hours = metrics
        .visible_hours()
        .map(|hour| HourRow {
            hour,
            label: format_hour(hour),
            half_hour_top: metrics.half_hour_line_top(hour),
            event_ids: timeline
                .events_for_hour(hour)
                .into_iter()
                .map(|event| event.id.clone())
                .collect(),
        })
        .collect();

    DayLayout {
        date: window.date(),
        title: format_date(window.date()),
        is_today,
        grid_height: metrics.grid_height(),
        current_time_top: is_today
            .then(|| metrics.current_time_top(now.time()))
            .filter(|top| *top >= 0.0),
        hours,
        blocks,
    }
}
