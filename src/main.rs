use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use almanac::domain::date::start_of_week_from_index;
use almanac::presentation::DemoApp;

/// Calendar and app-layout widget demo.
#[derive(Debug, Parser)]
#[command(name = almanac::NAME, version = almanac::VERSION)]
struct CliArgs {
    /// Log filter when RUST_LOG is unset.
    #[arg(long, env = "ALMANAC_LOG", default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of discarding them.
    #[arg(long, env = "ALMANAC_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// First day of the week, 0 = Sunday through 6 = Saturday.
    #[arg(long, default_value_t = 0)]
    start_of_week: u8,

    /// Page to open: calendar, months, range, or shell.
    #[arg(long, default_value = "calendar")]
    page: String,
}

fn init_logging(args: &CliArgs) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));

    if let Some(log_path) = &args.log_file {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    init_logging(&args)?;
    let start_of_week = start_of_week_from_index(args.start_of_week)?;

    info!(version = almanac::VERSION, "Starting almanac demo");

    let app = DemoApp::new()
        .with_start_of_week(start_of_week)
        .with_page(&args.page);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result
}
