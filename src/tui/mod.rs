mod presentation;
mod session;

pub use session::run_tui;
