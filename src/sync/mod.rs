pub mod event_api;
pub mod sample_events;
pub mod sync_engine;

pub use event_api::{ApiError, ApiResponse, Credentials, EventSource, FileEventSource, RestEventSource};
pub use sample_events::SampleEventSource;
pub use sync_engine::{SourceKind, SyncEngine, SyncError};
