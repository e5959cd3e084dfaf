mod cli;
mod tui;

use cli::{CliCommand, OutputMode, USAGE, parse_cli, run_agenda_mode, run_json_mode};
use familyhub_dayview::storage::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let options = match parse_cli() {
        Ok(CliCommand::Run(options)) => options,
        Ok(CliCommand::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let config = match Config::load_or_create() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Falling back to default config: {}", e);
            Config::default()
        }
    };

    let result = match options.output {
        OutputMode::Tui => tui::run_tui(&options, config).await,
        OutputMode::Agenda => run_agenda_mode(&options, &config).await,
        OutputMode::Json => run_json_mode(&options, &config).await,
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

fn setup_logging() {
    let log_dir = dirs::config_dir()
        .map(|d| d.join(familyhub_dayview::storage::config::APP_DIR))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "familyhub-dayview.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("familyhub-dayview started");
}
