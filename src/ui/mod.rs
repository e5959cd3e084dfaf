pub mod day_view;
pub mod format;
pub mod theme;
