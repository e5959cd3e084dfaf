use chrono::{Local, NaiveDate};
use std::collections::HashMap;

use crate::calendar::Event;
use crate::layout::{DayTimeline, DayWindow, GridMetrics};
use crate::ui::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Handle for one issued fetch. Only the most recently issued ticket may apply
/// its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub date: NaiveDate,
}

pub struct AppState {
    pub selected_date: NaiveDate,
    pub events: HashMap<String, Event>,
    pub status: LoadStatus,
    pub theme: Theme,
    pub metrics: GridMetrics,
    latest_ticket: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            selected_date: Local::now().date_naive(),
            events: HashMap::new(),
            status: LoadStatus::Idle,
            theme: Theme::default(),
            metrics: GridMetrics::default(),
            latest_ticket: 0,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_metrics(mut self, metrics: GridMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.selected_date = date;
        self
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.insert(event.id.clone(), event);
    }

    pub fn replace_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events = events
            .into_iter()
            .map(|event| (event.id.clone(), event))
            .collect();
    }

    pub fn day_window(&self) -> DayWindow {
        DayWindow::for_date(self.selected_date)
    }

    /// Events touching the selected day, by start time then id.
    pub fn day_events(&self) -> Vec<&Event> {
        let window = self.day_window();
        let mut events: Vec<&Event> = self.events
            .values()
            .filter(|event| window.includes(event))
            .collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        events
    }

    pub fn timeline(&self) -> DayTimeline<'_> {
        DayTimeline::new(self.day_window(), self.day_events())
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.selected_date == today
    }

    /// Moves to `date`; returns whether the selection changed.
    pub fn go_to_date(&mut self, date: NaiveDate) -> bool {
        if self.selected_date == date {
            return false;
        }
        self.selected_date = date;
        true
    }

    pub fn next_day(&mut self) -> bool {
        match self.selected_date.succ_opt() {
            Some(date) => self.go_to_date(date),
            None => false,
        }
    }

    pub fn previous_day(&mut self) -> bool {
        match self.selected_date.pred_opt() {
            Some(date) => self.go_to_date(date),
            None => false,
        }
    }

    pub fn go_to_today(&mut self) -> bool {
        self.go_to_date(Local::now().date_naive())
    }

    /// Issues a ticket for the selected date, superseding any fetch in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.status = LoadStatus::Loading;
        FetchTicket {
            id: self.latest_ticket,
            date: self.selected_date,
        }
    }

    /// Applies a fetch result if its ticket is still the latest one issued.
    /// Returns `false` when the result was stale and dropped.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Event>, String>) -> bool {
        if ticket.id != self.latest_ticket {
            tracing::debug!(
                ticket = ticket.id,
                latest = self.latest_ticket,
                date = %ticket.date,
                "Discarding stale fetch result"
            );
            return false;
        }

        match result {
            Ok(events) => {
                tracing::info!("Loaded {} events for {}", events.len(), ticket.date);
                self.replace_events(events);
                self.status = LoadStatus::Ready;
            }
            Err(message) => {
                tracing::error!("Loading events for {} failed: {}", ticket.date, message);
                self.status = LoadStatus::Error(message);
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a `YYYY-MM-DD` date as a local calendar date; `YYYY/MM/DD` is accepted too.
pub fn parse_date_param(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    if let [year, month, day] = parts.as_slice() {
        return NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?);
    }

    NaiveDate::parse_from_str(value.trim(), "%Y/%m/%d").ok()
}
