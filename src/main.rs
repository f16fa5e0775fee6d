use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use roadside::Frontend;
use roadside::core::config::{load_config, resolve};
use roadside::core::{ScreenController, Services};
use roadside::location::{FixedSource, LocationSource, PositionTracker, ReplaySource};

/// Where the map opens when no location source is given.
const DEFAULT_LATITUDE: f64 = 37.78825;
const DEFAULT_LONGITUDE: f64 = -122.4324;

#[derive(Parser)]
#[command(name = "roadside", about = "Nearby food, fuel and routes on a live map")]
struct Args {
    /// How to present the session
    #[arg(short, long, default_value_t, value_enum)]
    frontend: Frontend,

    /// Replay positions from a JSON track file
    #[arg(long, value_name = "PATH", conflicts_with_all = ["lat", "lon"])]
    track: Option<PathBuf>,

    /// Hold a fixed latitude (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Hold a fixed longitude (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Seconds between position readings
    #[arg(long, default_value_t = 5)]
    interval_secs: u64,

    /// Search radius in meters (overrides config)
    #[arg(long)]
    radius: Option<u32>,

    /// Plan a route here once the first fix arrives
    #[arg(short, long)]
    destination: Option<String>,

    /// Config file (default: ~/.roadside/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn location_source(args: &Args) -> std::io::Result<Arc<dyn LocationSource>> {
    let interval = Duration::from_secs(args.interval_secs.max(1));
    if let Some(path) = &args.track {
        let replay = ReplaySource::from_file(path, interval)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
        return Ok(Arc::new(replay));
    }
    let (latitude, longitude) = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => (DEFAULT_LATITUDE, DEFAULT_LONGITUDE),
    };
    Ok(Arc::new(FixedSource::new(latitude, longitude, interval)))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to roadside.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("roadside.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Roadside starting up with frontend: {:?}", args.frontend);

    let file_config = load_config(args.config.as_deref())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let config = resolve(&file_config, args.radius);
    let credentials = config
        .credentials()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

    let source = location_source(&args)?;
    log::info!("Using location source: {}", source.name());

    let services = Services::from_config(&config, &credentials);
    let mut controller = ScreenController::new(services, config.deltas);
    controller.start(PositionTracker::new(source, config.position_options));

    match args.frontend {
        Frontend::Tui => roadside::tui::run(controller, args.destination),
        Frontend::Headless => roadside::headless::run(controller, args.destination).await,
    }
}
