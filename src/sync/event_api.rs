use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::calendar::EventDto;
use crate::storage::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Access denied")]
    Forbidden,
    #[error("Server rejected request: {0}")]
    Rejected(String),
    #[error("Failed to read events file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Envelope wrapped around every backend payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub timestamp: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "unsuccessful response".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Rejected("response carried no data".to_string()))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Every event the source knows about. Callers filter to a day themselves:
    /// the backend's date-range endpoint matches on start time only and would
    /// drop events carried over from the previous day.
    async fn fetch_all(&self) -> Result<Vec<EventDto>, ApiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct RestEventSource {
    base_url: String,
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

impl RestEventSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let mut source = Self::new(config.base_url.clone());
        source.client = client;

        if let Some(username) = config.username.as_ref().filter(|u| !u.is_empty()) {
            source = source.with_credentials(Credentials {
                username: username.clone(),
                password: config.password.clone().unwrap_or_default(),
            });
        }

        Ok(source)
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn events_url(&self) -> String {
        format!("{}/events", self.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => request.basic_auth(&credentials.username, Some(&credentials.password)),
            None => request,
        }
    }

    async fn get_events(&self, url: &str) -> Result<Vec<EventDto>, ApiError> {
        let response = self.authorized(self.client.get(url)).send().await?;

        let status = response.status();
        tracing::info!("GET {} -> {}", url, status);

        if status == 401 {
            tracing::error!("Authentication failed when fetching events");
            return Err(ApiError::AuthenticationFailed);
        }

        if status == 403 {
            tracing::error!("Access denied when fetching events");
            return Err(ApiError::Forbidden);
        }

        if status == 404 {
            tracing::error!("Events endpoint not found: {}", url);
            return Err(ApiError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to fetch events. Status: {}, Body: {}", status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        let envelope: ApiResponse<Vec<EventDto>> = response.json().await?;
        let events = envelope.into_data()?;

        tracing::info!("Fetched {} events successfully", events.len());
        Ok(events)
    }
}

#[async_trait]
impl EventSource for RestEventSource {
    async fn fetch_all(&self) -> Result<Vec<EventDto>, ApiError> {
        self.get_events(&self.events_url()).await
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventFile {
    List(Vec<EventDto>),
    Envelope(ApiResponse<Vec<EventDto>>),
}

/// Events read from a JSON export: either a bare array or a backend envelope.
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse(content: &str) -> Result<Vec<EventDto>, ApiError> {
        match serde_json::from_str(content)? {
            EventFile::List(events) => Ok(events),
            EventFile::Envelope(envelope) => envelope.into_data(),
        }
    }
}

#[async_trait]
impl EventSource for FileEventSource {
    async fn fetch_all(&self) -> Result<Vec<EventDto>, ApiError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let events = Self::parse(&content)?;
        tracing::info!("Read {} events from {}", events.len(), self.path.display());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn envelope(data: serde_json::Value) -> serde_json::Value {
        json!({
            "success": true,
            "message": "Events retrieved successfully",
            "data": data,
            "timestamp": "2024-01-15T08:00:00Z"
        })
    }

    #[test]
    fn rest_source_trims_trailing_slash() {
        let source = RestEventSource::new("http://localhost:8080/api/v1/");

        assert_eq!(source.base_url(), "http://localhost:8080/api/v1");
        assert_eq!(source.events_url(), "http://localhost:8080/api/v1/events");
    }

    #[test]
    fn config_credentials_are_attached() {
        let config = ApiConfig {
            username: Some("mom".to_string()),
            password: Some("secret".to_string()),
            ..ApiConfig::default()
        };

        let source = RestEventSource::from_config(&config).unwrap();

        assert_eq!(
            source.credentials,
            Some(Credentials {
                username: "mom".to_string(),
                password: "secret".to_string()
            })
        );
    }

    #[test]
    fn unsuccessful_envelope_is_rejected() {
        let response: ApiResponse<Vec<EventDto>> = ApiResponse {
            success: false,
            message: Some("Invalid date range".to_string()),
            data: None,
            timestamp: None,
        };

        assert!(matches!(response.into_data(), Err(ApiError::Rejected(msg)) if msg == "Invalid date range"));
    }

    #[test]
    fn file_parses_bare_array_and_envelope() {
        let list = r#"[{"id": "a", "title": "A", "startTime": "2024-01-15T09:00:00"}]"#;
        let wrapped = envelope(json!([{"id": "b", "title": "B", "startTime": "2024-01-15T10:00:00"}])).to_string();

        assert_eq!(FileEventSource::parse(list).unwrap()[0].id.as_deref(), Some("a"));
        assert_eq!(FileEventSource::parse(&wrapped).unwrap()[0].id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn file_fetch_keeps_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            json!([
                {"id": "in", "title": "In", "startTime": "2024-01-15T09:00:00", "endTime": "2024-01-15T10:00:00"},
                {"id": "out", "title": "Out", "startTime": "2024-01-17T09:00:00"},
                {"id": "broken", "title": "Broken", "startTime": "not a time"}
            ])
            .to_string(),
        )
        .unwrap();

        let source = FileEventSource::new(&path);
        let events = source.fetch_all().await.unwrap();
        let ids: Vec<_> = events.iter().filter_map(|e| e.id.as_deref()).collect();

        assert_eq!(ids, vec!["in", "out", "broken"]);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = FileEventSource::new("/definitely/not/here.json");

        assert!(matches!(source.fetch_all().await, Err(ApiError::IoError(_))));
    }

    #[tokio::test]
    async fn fetch_all_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                {"id": "a", "title": "Soccer", "startTime": "2024-01-15T09:00:00", "eventType": "OTHER"}
            ]))))
            .mount(&server)
            .await;

        let source = RestEventSource::new(format!("{}/api/v1", server.uri()));
        let events = source.fetch_all().await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Soccer");
    }

    #[tokio::test]
    async fn fetch_all_sends_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/events"))
            .and(header("authorization", "Basic bW9tOnNlY3JldA=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
            .expect(1)
            .mount(&server)
            .await;

        let source = RestEventSource::new(format!("{}/api/v1", server.uri())).with_credentials(Credentials {
            username: "mom".to_string(),
            password: "secret".to_string(),
        });

        let events = source.fetch_all().await.unwrap();

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source = RestEventSource::new(server.uri());

        assert!(matches!(source.fetch_all().await, Err(ApiError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn forbidden_and_not_found_are_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/family/events"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing/events"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let family = RestEventSource::new(format!("{}/family", server.uri()));
        let missing = RestEventSource::new(format!("{}/missing", server.uri()));

        assert!(matches!(family.fetch_all().await, Err(ApiError::Forbidden)));
        assert!(matches!(missing.fetch_all().await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn server_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let source = RestEventSource::new(server.uri());

        match source.fetch_all().await {
            Err(ApiError::RequestError(message)) => assert!(message.contains("boom")),
            other => panic!("unexpected result: {:?}", other.map(|events| events.len())),
        }
    }
}
