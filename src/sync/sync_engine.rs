use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::calendar::{Event, EventDto};
use crate::layout::DayWindow;
use crate::storage::config::ApiConfig;
use crate::sync::event_api::{ApiError, EventSource, FileEventSource, RestEventSource};
use crate::sync::sample_events::SampleEventSource;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
}

/// Where events come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Api,
    File(PathBuf),
    Sample,
}

#[derive(Clone)]
pub struct SyncEngine {
    source: Arc<dyn EventSource>,
}

impl SyncEngine {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self { source }
    }

    pub fn for_source(kind: &SourceKind, api: &ApiConfig) -> Result<Self, SyncError> {
        let source: Arc<dyn EventSource> = match kind {
            SourceKind::Api => Arc::new(RestEventSource::from_config(api)?),
            SourceKind::File(path) => Arc::new(FileEventSource::new(path.clone())),
            SourceKind::Sample => Arc::new(SampleEventSource::around_today()),
        };
        Ok(Self::new(source))
    }

    /// Events touching the window, including ones that started on an earlier day.
    /// Records that fail validation are logged and skipped.
    pub async fn load_day(&self, window: &DayWindow) -> Result<Vec<Event>, SyncError> {
        tracing::debug!("Loading events for {}", window.date());

        let events = self
            .load_all()
            .await?
            .into_iter()
            .filter(|event| window.includes(event))
            .collect();

        Ok(events)
    }

    pub async fn load_all(&self) -> Result<Vec<Event>, SyncError> {
        let dtos = self.source.fetch_all().await?;
        Ok(convert_events(dtos))
    }
}

pub fn convert_events(dtos: Vec<EventDto>) -> Vec<Event> {
    let total = dtos.len();
    let events: Vec<Event> = dtos
        .into_iter()
        .filter_map(|dto| {
            let id = dto.id.clone().unwrap_or_default();
            match Event::try_from(dto) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("Skipping invalid event '{}': {}", id, e);
                    None
                }
            }
        })
        .collect();

    if events.len() < total {
        tracing::info!("Kept {} of {} events", events.len(), total);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::event_api::MockEventSource;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn dto(id: &str, start: &str, end: Option<&str>) -> EventDto {
        EventDto {
            id: Some(id.to_string()),
            title: format!("Event {}", id),
            start_time: Some(start.to_string()),
            end_time: end.map(String::from),
            ..EventDto::default()
        }
    }

    #[test]
    fn convert_skips_invalid_records() {
        let events = convert_events(vec![
            dto("a", "2024-01-15T09:00:00", Some("2024-01-15T10:00:00")),
            dto("b", "garbage", None),
            EventDto::default(),
            dto("c", "2024-01-15T11:00:00", Some("2024-01-15T10:00:00")),
        ]);

        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn load_day_keeps_events_touching_the_day() {
        let window = DayWindow::for_date(date(15));

        let mut source = MockEventSource::new();
        source
            .expect_fetch_all()
            .times(1)
            .returning(|| {
                Ok(vec![
                    dto("overnight", "2024-01-14T22:00:00", Some("2024-01-15T02:00:00")),
                    dto("morning", "2024-01-15T09:00:00", None),
                    dto("elsewhere", "2024-01-16T09:00:00", None),
                ])
            });

        let engine = SyncEngine::new(Arc::new(source));
        let events = tokio_test::block_on(engine.load_day(&window)).unwrap();

        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["overnight", "morning"]);
    }

    #[test]
    fn load_day_propagates_source_errors() {
        let mut source = MockEventSource::new();
        source
            .expect_fetch_all()
            .returning(|| Err(ApiError::AuthenticationFailed));

        let engine = SyncEngine::new(Arc::new(source));
        let result = tokio_test::block_on(engine.load_day(&DayWindow::for_date(date(15))));

        assert!(matches!(result, Err(SyncError::ApiError(ApiError::AuthenticationFailed))));
    }

    #[test]
    fn load_all_converts_everything_valid() {
        let mut source = MockEventSource::new();
        source.expect_fetch_all().times(1).returning(|| {
            Ok(vec![
                dto("a", "2024-01-15T09:00:00", None),
                dto("b", "2024-02-01T09:00:00", None),
            ])
        });

        let engine = SyncEngine::new(Arc::new(source));
        let events = tokio_test::block_on(engine.load_all()).unwrap();

        assert_eq!(events.len(), 2);
    }

    #[test]
    fn sample_source_is_selectable() {
        let engine = SyncEngine::for_source(&SourceKind::Sample, &ApiConfig::default()).unwrap();
        let today = chrono::Local::now().date_naive();

        let events = tokio_test::block_on(engine.load_day(&DayWindow::for_date(today))).unwrap();

        assert!(!events.is_empty());
    }

    #[tokio::test]
    async fn rest_load_day_includes_event_carried_over_from_previous_evening() {
        let server = MockServer::start().await;
        let sleepover = json!({
            "id": "sleepover",
            "title": "Sleepover",
            "startTime": "2024-01-14T22:00:00",
            "endTime": "2024-01-15T02:00:00"
        });
        let morning = json!({"id": "morning", "title": "Swim", "startTime": "2024-01-15T09:00:00"});
        let envelope = |data: serde_json::Value| json!({"success": true, "message": "ok", "data": data});

        // The date-range endpoint matches on start time only.
        Mock::given(method("GET"))
            .and(path("/events/date-range"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([morning.clone()]))))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([sleepover, morning]))))
            .expect(1)
            .mount(&server)
            .await;

        let engine = SyncEngine::new(Arc::new(RestEventSource::new(server.uri())));
        let events = engine.load_day(&DayWindow::for_date(date(15))).await.unwrap();

        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["sleepover", "morning"]);
    }
}
