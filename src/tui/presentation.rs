use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use familyhub_dayview::{
    app::{AppState, LoadStatus},
    calendar::EventTiming,
    layout::GridMetrics,
    ui::{
        day_view::{DayLayout, EventBlock},
        theme::event_color,
    },
};

/// Terminal rows drawn for each hour of the grid.
pub const ROWS_PER_HOUR: u16 = 2;
const GUTTER_WIDTH: u16 = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub scroll: u16,
    pub show_half_hour_lines: bool,
}

pub fn ui(f: &mut Frame, app: &AppState, layout: &DayLayout, view: ViewOptions) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title_text = if layout.is_today {
        format!("{} (today)", layout.title)
    } else {
        layout.title.clone()
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_grid(f, app, layout, view, chunks[1]);

    let (status_text, status_color) = match &app.status {
        LoadStatus::Loading => ("Loading events...".to_string(), app.theme.loading),
        LoadStatus::Error(message) => (format!("Error: {} | 'r' to retry", message), app.theme.error),
        LoadStatus::Idle | LoadStatus::Ready => (
            format!(
                "Events: {} | h/l day  t today  r reload  j/k scroll  q quit",
                layout.blocks.len()
            ),
            app.theme.status_bar,
        ),
    };
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);
}

fn render_grid(f: &mut Frame, app: &AppState, layout: &DayLayout, view: ViewOptions, area: Rect) {
    let frame = Block::default().borders(Borders::ALL);
    let inner = frame.inner(area);
    f.render_widget(frame, area);

    if inner.width <= GUTTER_WIDTH || inner.height == 0 {
        return;
    }

    let rule_width = usize::from(inner.width - GUTTER_WIDTH);
    let theme = &app.theme;

    let mut lines = Vec::with_capacity(layout.hours.len() * usize::from(ROWS_PER_HOUR));
    for row in &layout.hours {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>7}  ", row.label), Style::default().fg(theme.hour_label)),
            Span::styled("─".repeat(rule_width), Style::default().fg(theme.half_hour_rule)),
        ]));
        let half_hour_rule = if view.show_half_hour_lines {
            "┈".repeat(rule_width)
        } else {
            String::new()
        };
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(usize::from(GUTTER_WIDTH))),
            Span::styled(half_hour_rule, Style::default().fg(theme.half_hour_rule)),
        ]));
    }
    f.render_widget(Paragraph::new(lines).scroll((view.scroll, 0)), inner);

    let grid = Rect {
        x: inner.x + GUTTER_WIDTH,
        width: inner.width - GUTTER_WIDTH,
        ..inner
    };

    if let Some(top) = layout.current_time_top {
        let row = grid_offset_to_row(top, &app.metrics);
        if let Some(y) = visible_row(row, view.scroll, grid) {
            let marker = Paragraph::new("━".repeat(usize::from(grid.width)))
                .style(Style::default().fg(theme.now_marker));
            f.render_widget(marker, Rect { y, height: 1, ..grid });
        }
    }

    for block in &layout.blocks {
        if let Some(rect) = block_rect(block, &app.metrics, grid, view.scroll) {
            render_block(f, app, block, rect);
        }
    }
}

fn render_block(f: &mut Frame, app: &AppState, block: &EventBlock, rect: Rect) {
    let mut style = Style::default().fg(app.theme.event_text).bg(event_color(block.event_type));
    if block.timing == EventTiming::Completed {
        style = style.add_modifier(Modifier::DIM);
    }

    let mut lines = vec![Line::from(Span::styled(
        block_title(block),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(block.time_label.clone()));
    if let Some(location) = &block.location {
        lines.push(Line::from(format!("@ {}", location)));
    }

    f.render_widget(Paragraph::new(lines).style(style), rect);
}

pub fn block_title(block: &EventBlock) -> String {
    match block.timing {
        EventTiming::InProgress => format!("▶ {}", block.title),
        EventTiming::Upcoming => format!("• {}", block.title),
        EventTiming::Completed | EventTiming::Planned => block.title.clone(),
    }
}

fn pixels_to_rows(pixels: f64, metrics: &GridMetrics) -> f64 {
    pixels / metrics.hour_height * f64::from(ROWS_PER_HOUR)
}

/// Grid row of an offset measured from the top of the first visible hour.
pub fn grid_offset_to_row(pixels: f64, metrics: &GridMetrics) -> u16 {
    pixels_to_rows(pixels, metrics).max(0.0).floor() as u16
}

fn visible_row(row: u16, scroll: u16, grid: Rect) -> Option<u16> {
    let offset = row.checked_sub(scroll)?;
    (offset < grid.height).then_some(grid.y + offset)
}

/// Scales a block's pixel geometry onto the terminal grid, cut to the visible rows.
/// Blocks above the first drawn hour are cut at the top of the grid.
pub fn block_rect(block: &EventBlock, metrics: &GridMetrics, grid: Rect, scroll: u16) -> Option<Rect> {
    let first_row = pixels_to_rows(block.top - metrics.time_offset, metrics).floor();
    let row_span = pixels_to_rows(block.height, metrics).round().max(1.0);
    let last_row = first_row + row_span;
    if last_row <= 0.0 {
        return None;
    }

    let top = (first_row.max(0.0) as u16).max(scroll);
    let bottom = (last_row as u16).min(scroll.saturating_add(grid.height));
    if top >= bottom {
        return None;
    }

    let scale = f64::from(grid.width) / metrics.available_width;
    let x = (block.left * scale).floor() as u16;
    let width = ((block.width * scale).floor() as u16).max(1);
    if x >= grid.width {
        return None;
    }

    Some(Rect {
        x: grid.x + x,
        y: grid.y + (top - scroll),
        width: width.min(grid.width - x),
        height: bottom - top,
    })
}
