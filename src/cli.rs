use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
};

use anyhow::Context;
use chrono::NaiveDate;

use familyhub_dayview::{
    app::{AppState, parse_date_param},
    storage::config::Config,
    sync::{SourceKind, SyncEngine},
    ui::day_view::{DayLayout, EventBlock, calculate_layout},
};

pub const USAGE: &str =
    "Usage: familyhub-dayview [--date YYYY-MM-DD] [--events FILE | --sample] [--agenda | --json]";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Tui,
    Agenda,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub date: Option<NaiveDate>,
    pub source: SourceKind,
    pub output: OutputMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Run(CliOptions),
    Help,
}

pub fn parse_cli() -> Result<CliCommand, String> {
    parse_args(env::args().skip(1))
}

pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions {
        date: None,
        source: SourceKind::Api,
        output: OutputMode::Tui,
    };
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--date" => {
                let value = args.next().ok_or("--date needs a value")?;
                let date = parse_date_param(&value)
                    .ok_or_else(|| format!("Invalid date '{}'. Use YYYY-MM-DD.", value))?;
                options.date = Some(date);
            }
            "--events" => {
                if options.source == SourceKind::Sample {
                    return Err("--events and --sample cannot be combined".to_string());
                }
                let path = args.next().ok_or("--events needs a file")?;
                options.source = SourceKind::File(PathBuf::from(path));
            }
            "--sample" => {
                if matches!(options.source, SourceKind::File(_)) {
                    return Err("--events and --sample cannot be combined".to_string());
                }
                options.source = SourceKind::Sample;
            }
            "--agenda" => options.output = pick_output(options.output, OutputMode::Agenda)?,
            "--json" => options.output = pick_output(options.output, OutputMode::Json)?,
            "-h" | "--help" => return Ok(CliCommand::Help),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(CliCommand::Run(options))
}

fn pick_output(current: OutputMode, requested: OutputMode) -> Result<OutputMode, String> {
    if current != OutputMode::Tui && current != requested {
        return Err("--agenda and --json cannot be combined".to_string());
    }
    Ok(requested)
}

/// Loads the requested day once and lays it out without a terminal session.
async fn load_layout(options: &CliOptions, config: &Config) -> anyhow::Result<DayLayout> {
    let engine = SyncEngine::for_source(&options.source, &config.api)?;
    let mut state = AppState::new().with_metrics(config.layout);
    if let Some(date) = options.date {
        state.go_to_date(date);
    }

    let ticket = state.begin_fetch();
    let events = engine
        .load_day(&state.day_window())
        .await
        .with_context(|| format!("Failed to load events for {}", ticket.date))?;
    state.complete_fetch(ticket, Ok(events));

    Ok(calculate_layout(&state))
}

pub async fn run_agenda_mode(options: &CliOptions, config: &Config) -> anyhow::Result<()> {
    let layout = load_layout(options, config).await?;
    display_with_pager(&format_agenda_text(&layout))?;
    Ok(())
}

pub async fn run_json_mode(options: &CliOptions, config: &Config) -> anyhow::Result<()> {
    let layout = load_layout(options, config).await?;
    let json = serde_json::to_string_pretty(&layout)?;
    println!("{}", json);
    Ok(())
}

fn format_agenda_text(layout: &DayLayout) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Agenda - {}", layout.title));
    lines.push(String::new());

    if layout.blocks.is_empty() {
        lines.push("No events scheduled.".to_string());
    } else {
        for block in &layout.blocks {
            lines.push(format!("- {}", build_agenda_line(block, usize::MAX)));
        }
    }

    lines.join("\n")
}

pub fn build_agenda_line(block: &EventBlock, width: usize) -> String {
    let mut line = format!(
        "{:<28} [{}/{}] {}",
        block.time_label,
        block.column + 1,
        block.total_columns,
        block.title
    );
    if let Some(location) = &block.location
        && !location.is_empty()
    {
        line.push_str(&format!(" @ {}", location));
    }
    truncate_to_width(&line, width)
}

pub fn truncate_to_width(line: &str, width: usize) -> String {
    if width > 0 && line.chars().count() > width {
        let mut truncated = line.chars().take(width.saturating_sub(1)).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        line.to_string()
    }
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            println!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(e) => {
            tracing::debug!("Pager '{}' unavailable: {}", cmd, e);
            println!("{text}");
        }
    }

    Ok(())
}
