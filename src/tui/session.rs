use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use familyhub_dayview::{
    app::{AppState, FetchTicket},
    calendar::Event,
    layout::GridMetrics,
    storage::config::Config,
    sync::SyncEngine,
    ui::{day_view::calculate_layout, theme::Theme},
};

use crate::cli::CliOptions;
use crate::tui::presentation::{ROWS_PER_HOUR, ViewOptions, ui};

const POLL_INTERVAL: Duration = Duration::from_millis(200);
const SCROLL_STEP: u16 = 1;

type FetchResult = (FetchTicket, Result<Vec<Event>, String>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Quit,
    Reload,
    DayChanged,
    ScrollUp,
    ScrollDown,
    Ignored,
}

pub async fn run_tui(options: &CliOptions, config: Config) -> anyhow::Result<()> {
    let engine = SyncEngine::for_source(&options.source, &config.api)?;

    let theme = Theme::get_by_name(&config.ui.theme);
    let mut app = AppState::new().with_theme(theme).with_metrics(config.layout);
    if let Some(date) = options.date {
        app.go_to_date(date);
    }

    let view = ViewOptions {
        scroll: initial_scroll(config.ui.first_visible_hour, &config.layout),
        show_half_hour_lines: config.ui.show_half_hour_lines,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, engine, view).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("Session ended with error: {}", err);
    }

    res.map_err(anyhow::Error::from)
}

/// Rows are counted from `timeline_start_hour`, the first hour drawn.
fn initial_scroll(first_visible_hour: u32, metrics: &GridMetrics) -> u16 {
    let hours = first_visible_hour.saturating_sub(metrics.timeline_start_hour);
    let rows = u16::try_from(hours).unwrap_or(u16::MAX).saturating_mul(ROWS_PER_HOUR);
    rows.min(max_scroll(metrics))
}

fn max_scroll(metrics: &GridMetrics) -> u16 {
    let hours = u16::try_from(metrics.visible_hours().len()).unwrap_or(0);
    (hours * ROWS_PER_HOUR).saturating_sub(1)
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    engine: SyncEngine,
    mut view: ViewOptions,
) -> io::Result<()> {
    let scroll_limit = max_scroll(&app.metrics);
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchResult>();
    request_day(app, &engine, &tx);

    loop {
        while let Ok((ticket, result)) = rx.try_recv() {
            app.complete_fetch(ticket, result);
        }

        let layout = calculate_layout(app);
        terminal.draw(|f| ui(f, app, &layout, view))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let TermEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(key.code, app) {
                KeyAction::Quit => return Ok(()),
                KeyAction::Reload | KeyAction::DayChanged => request_day(app, &engine, &tx),
                KeyAction::ScrollUp => view.scroll = view.scroll.saturating_sub(SCROLL_STEP),
                KeyAction::ScrollDown => view.scroll = (view.scroll + SCROLL_STEP).min(scroll_limit),
                KeyAction::Ignored => {}
            }
        }
    }
}

/// Starts a fetch for the selected day. A result for an older request is
/// dropped by the ticket check when it arrives.
fn request_day(app: &mut AppState, engine: &SyncEngine, tx: &mpsc::UnboundedSender<FetchResult>) {
    let ticket = app.begin_fetch();
    let window = app.day_window();
    let engine = engine.clone();
    let tx = tx.clone();

    tracing::debug!(ticket = ticket.id, date = %ticket.date, "Requesting day");

    tokio::spawn(async move {
        let result = engine.load_day(&window).await.map_err(|e| e.to_string());
        if tx.send((ticket, result)).is_err() {
            tracing::debug!("Session closed before fetch for {} finished", ticket.date);
        }
    });
}

pub fn handle_key(code: KeyCode, app: &mut AppState) -> KeyAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('h') | KeyCode::Left => day_action(app.previous_day()),
        KeyCode::Char('l') | KeyCode::Right => day_action(app.next_day()),
        KeyCode::Char('t') => day_action(app.go_to_today()),
        KeyCode::Char('r') => KeyAction::Reload,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::ScrollUp,
        KeyCode::Char('j') | KeyCode::Down => KeyAction::ScrollDown,
        _ => KeyAction::Ignored,
    }
}

fn day_action(changed: bool) -> KeyAction {
    if changed { KeyAction::DayChanged } else { KeyAction::Ignored }
}
