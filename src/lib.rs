pub mod app;
pub mod calendar;
pub mod layout;
pub mod storage;
pub mod sync;
pub mod ui;

pub use app::{AppState, FetchTicket, LoadStatus};
pub use calendar::{Event, EventDto, EventError, EventType};
pub use layout::{DayTimeline, DayWindow, GridMetrics};
pub use ui::day_view::{DayLayout, EventBlock, calculate_layout};
