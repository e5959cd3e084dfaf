use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::calendar::{EventDto, EventStatus, EventType, Reference, UserRole, UserSummary};
use crate::sync::event_api::{ApiError, EventSource};

const SAMPLE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A small family calendar around an anchor date, for demos without a backend.
pub struct SampleEventSource {
    anchor: NaiveDate,
}

impl SampleEventSource {
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    pub fn around_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn events(&self) -> Vec<EventDto> {
        let today = self.anchor;
        let Some(tomorrow) = today.succ_opt() else { return Vec::new() };
        let Some(yesterday) = today.pred_opt() else { return Vec::new() };

        let parent = Reference::Embedded(UserSummary {
            id: Some("u1".to_string()),
            username: Some("mom".to_string()),
            name: Some("Mom".to_string()),
            role: Some(UserRole::Admin),
            active: true,
        });

        // (title, date, start, end, type, location)
        let events = vec![
            ("School run", today, (8, 0), Some((8, 45)), EventType::Appointment, None),
            ("Dentist", today, (9, 0), Some((10, 0)), EventType::Appointment, Some("Smile Clinic")),
            ("Team standup", today, (9, 30), Some((10, 30)), EventType::Meeting, None),
            ("Grocery pickup", today, (10, 0), Some((10, 30)), EventType::Other, Some("Market Street")),
            ("Grandma's birthday call", today, (12, 0), None, EventType::Birthday, None),
            ("Piano lesson", today, (16, 0), Some((17, 0)), EventType::Other, Some("Music school")),
            ("Movie night", today, (22, 0), Some((25, 0)), EventType::Celebration, Some("Living room")),
            ("Soccer practice", tomorrow, (17, 0), Some((18, 30)), EventType::Other, Some("Park field")),
            ("Parent-teacher meeting", yesterday, (15, 0), Some((15, 30)), EventType::Meeting, Some("School")),
        ];

        events
            .into_iter()
            .enumerate()
            .filter_map(|(i, (title, date, start, end, event_type, location))| {
                let start_time = at(date, start)?;
                let end_time = match end {
                    Some(end) => Some(at(date, end)?),
                    None => None,
                };

                Some(EventDto {
                    id: Some(format!("sample_{}", i)),
                    title: title.to_string(),
                    description: Some("Sample family event".to_string()),
                    start_time: Some(start_time.format(SAMPLE_TIMESTAMP_FORMAT).to_string()),
                    end_time: end_time.map(|end| end.format(SAMPLE_TIMESTAMP_FORMAT).to_string()),
                    location: location.map(String::from),
                    event_type,
                    status: EventStatus::Confirmed,
                    created_by: Some(parent.clone()),
                    ..EventDto::default()
                })
            })
            .collect()
    }
}

/// Hours past 23 roll into the next day.
fn at(date: NaiveDate, (hour, minute): (u32, u32)) -> Option<NaiveDateTime> {
    let date = date.checked_add_days(chrono::Days::new(u64::from(hour / 24)))?;
    date.and_hms_opt(hour % 24, minute, 0)
}

#[async_trait]
impl EventSource for SampleEventSource {
    async fn fetch_all(&self) -> Result<Vec<EventDto>, ApiError> {
        Ok(self.events())
    }
}
