pub mod event;
pub mod reference;

pub use event::{Event, EventDto, EventError, EventStatus, EventTiming, EventType, parse_local_timestamp};
pub use reference::{Named, Reference, UserRole, UserSummary};
