//! Day timeline layout: clip events to the viewed day, group the ones that
//! overlap, give each a column and map everything onto the hourly pixel grid.

pub mod columns;
pub mod geometry;
pub mod overlap;
pub mod timeline;
pub mod window;

pub use columns::{ColumnSlot, pack};
pub use geometry::{GridMetrics, HorizontalSpan, VerticalSpan};
pub use overlap::{OverlapGroup, column_order, overlap_group};
pub use timeline::{DayTimeline, PlacedEvent};
pub use window::{ClippedInterval, DayWindow, clip};
