use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::reference::{Reference, UserSummary};

/// Display duration given to events that carry no end time.
pub const POINT_EVENT_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    #[error("Event is missing an id")]
    MissingId,
    #[error("Event {0} is missing a start time")]
    MissingStart(String),
    #[error("Invalid {field} timestamp '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("Event {0} ends before it starts")]
    EndBeforeStart(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Birthday,
    Anniversary,
    Holiday,
    Vacation,
    Reunion,
    Celebration,
    Appointment,
    Meeting,
    #[default]
    #[serde(other)]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Birthday => "BIRTHDAY",
            EventType::Anniversary => "ANNIVERSARY",
            EventType::Holiday => "HOLIDAY",
            EventType::Vacation => "VACATION",
            EventType::Reunion => "REUNION",
            EventType::Celebration => "CELEBRATION",
            EventType::Appointment => "APPOINTMENT",
            EventType::Meeting => "MEETING",
            EventType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Planned,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

/// Where an event sits relative to the current moment, as shown on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventTiming {
    InProgress,
    Upcoming,
    Completed,
    Planned,
}

/// Event record as served by the household backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default, alias = "recurring")]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub created_by: Option<Reference<UserSummary>>,
    pub attendees: Option<Vec<Reference<UserSummary>>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub event_type: EventType,
    pub status: EventStatus,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub created_by: Option<Reference<UserSummary>>,
    pub attendees: Vec<Reference<UserSummary>>,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            start,
            end,
            location: None,
            event_type: EventType::Other,
            status: EventStatus::Planned,
            is_recurring: false,
            recurrence_pattern: None,
            created_by: None,
            attendees: vec![],
        }
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// End of the raw interval used for day membership; point events end where they start.
    pub fn raw_end(&self) -> NaiveDateTime {
        self.end.unwrap_or(self.start)
    }

    /// End used for drawing; point events get a one hour block.
    pub fn display_end(&self) -> NaiveDateTime {
        self.end
            .unwrap_or(self.start + Duration::minutes(POINT_EVENT_DURATION_MINUTES))
    }

    pub fn touches(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.start <= to && self.raw_end() >= from
    }

    pub fn creator_name(&self) -> Option<String> {
        self.created_by.as_ref().map(Reference::display_name)
    }

    pub fn timing_at(&self, now: NaiveDateTime) -> EventTiming {
        let minutes_until = (self.start - now).num_milliseconds() as f64 / 60_000.0;

        if minutes_until.abs() <= 30.0 {
            EventTiming::InProgress
        } else if minutes_until > 0.0 && minutes_until <= 60.0 {
            EventTiming::Upcoming
        } else if minutes_until < -30.0 {
            EventTiming::Completed
        } else {
            EventTiming::Planned
        }
    }
}

impl TryFrom<EventDto> for Event {
    type Error = EventError;

    fn try_from(dto: EventDto) -> Result<Self, Self::Error> {
        let id = dto.id.filter(|id| !id.is_empty()).ok_or(EventError::MissingId)?;
        let start_raw = dto
            .start_time
            .ok_or_else(|| EventError::MissingStart(id.clone()))?;
        let start = parse_local_timestamp("startTime", &start_raw)?;
        let end = dto
            .end_time
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_local_timestamp("endTime", &raw))
            .transpose()?;

        if let Some(end) = end
            && end < start
        {
            return Err(EventError::EndBeforeStart(id));
        }

        Ok(Event {
            id,
            title: dto.title,
            description: dto.description,
            start,
            end,
            location: dto.location,
            event_type: dto.event_type,
            status: dto.status,
            is_recurring: dto.is_recurring,
            recurrence_pattern: dto.recurrence_pattern,
            created_by: dto.created_by,
            attendees: dto.attendees.unwrap_or_default(),
        })
    }
}

/// Reads an ISO-8601-like timestamp as local wall time. A trailing `Z` is dropped
/// rather than converted, matching how the backend writes local times.
pub fn parse_local_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, EventError> {
    let trimmed = value.trim();
    let local = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    if let Ok(parsed) = local.parse::<NaiveDateTime>() {
        return Ok(parsed);
    }

    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(local, format) {
            return Ok(parsed);
        }
    }

    if let Ok(date) = local.parse::<NaiveDate>() {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(EventError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}
