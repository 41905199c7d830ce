//! Elevator TUI entry point.

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use elevator_client::{
    ConfigCandidate, ConfigStore, DEFAULT_CAPACITY, DEFAULT_CYCLE_TIME, DEFAULT_MAX_FLOOR,
    DEFAULT_MIN_FLOOR,
};
use elevator_tui::{Runtime, TerminalDriver, prefs};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Elevator simulation terminal client
#[derive(Parser, Debug)]
#[command(name = "elevator-tui")]
#[command(about = "Terminal client for the elevator simulation server")]
#[command(version)]
struct Args {
    /// WebSocket endpoint of the simulation server
    #[arg(short, long, default_value = "ws://localhost:5050/ws")]
    url: String,

    /// Connect immediately instead of waiting for the user
    #[arg(short, long)]
    connect: bool,

    /// Lowest floor
    #[arg(long, default_value_t = i64::from(DEFAULT_MIN_FLOOR), allow_negative_numbers = true)]
    min_floor: i64,

    /// Highest floor
    #[arg(long, default_value_t = i64::from(DEFAULT_MAX_FLOOR), allow_negative_numbers = true)]
    max_floor: i64,

    /// Car capacity
    #[arg(long, default_value_t = i64::from(DEFAULT_CAPACITY))]
    capacity: i64,

    /// Seconds per simulation tick (1.0 to 3.0)
    #[arg(long, default_value_t = DEFAULT_CYCLE_TIME)]
    cycle_time: f64,

    /// Preference file (theme)
    #[arg(long, default_value = "elevator-tui.json")]
    prefs: PathBuf,

    /// Log file; the terminal itself is taken by the UI
    #[arg(long, default_value = "elevator-tui.log")]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    let validated = ConfigStore::default().validate(&ConfigCandidate {
        min_floor: Some(args.min_floor),
        max_floor: Some(args.max_floor),
        capacity: Some(args.capacity),
        cycle_time: Some(args.cycle_time),
    });
    let startup_warning = (!validated.is_valid()).then(|| {
        let detail =
            validated.errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        tracing::warn!(%detail, "invalid startup configuration, defaults substituted");
        format!("Invalid configuration, defaults restored: {detail}")
    });

    let theme = prefs::load(&args.prefs);
    tracing::info!(url = %args.url, config = ?validated.config, ?theme, "starting");

    let driver = TerminalDriver::new(args.prefs)?;
    let mut runtime = Runtime::new(driver, args.url, validated.config, theme);
    if let Some(message) = startup_warning {
        runtime.app_mut().set_status(message);
    }

    Ok(runtime.run(args.connect).await?)
}
