//! TA Analyzer
//!
//! Counts OpenStreetMap amenities around a test area, asks a Chatbase
//! chatbot how digitally developed the area is and writes the answer to a
//! PDF report.
//!
//! Usage:
//!   ta-analyzer                         # interactive menu
//!   ta-analyzer places                  # list known test areas
//!   ta-analyzer amenities --place Caldes --tag school --tag cafe
//!   ta-analyzer analyze --lat 46.37 --lon 10.93 --tag all

mod actions;
mod commands;
mod config;
mod context;
mod interactive;
mod map;
mod report;
mod services;

use analyzer_core::TagFilter;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use context::AppContext;
use services::Services;

#[derive(Parser)]
#[command(name = "ta-analyzer")]
#[command(about = "Assess the digital development of a test area from its amenities")]
#[command(version)]
struct Cli {
    /// Config file (default: ./ta-analyzer.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Interactive {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// List known test areas
    Places,

    /// Fetch and count amenities around a test area
    Amenities {
        #[command(flatten)]
        location: LocationArgs,

        /// Also fetch every amenity in the place's administrative area
        #[arg(long)]
        area: bool,

        /// Write the fetched amenities as a GeoJSON map
        #[arg(long)]
        geojson: bool,
    },

    /// Fetch amenities, ask for an assessment and write the PDF report
    Analyze {
        #[command(flatten)]
        location: LocationArgs,

        /// Directory for the report (overrides [report] output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the report when done
        #[arg(long)]
        open: bool,
    },
}

impl Commands {
    fn location(&self) -> Option<&LocationArgs> {
        match self {
            Commands::Interactive { location }
            | Commands::Amenities { location, .. }
            | Commands::Analyze { location, .. } => Some(location),
            Commands::Places => None,
        }
    }
}

#[derive(Args, Default)]
struct LocationArgs {
    /// Test area name from the catalog (full or short name)
    #[arg(short, long)]
    place: Option<String>,

    /// Latitude of a custom test area
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of a custom test area
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Amenity type to fetch (`all`, `school`, `shop=bakery`); repeatable.
    /// Defaults to the configured amenity types.
    #[arg(short, long = "tag")]
    tags: Vec<TagFilter>,

    /// Search radius in meters
    #[arg(short, long)]
    radius: Option<u32>,
}

impl LocationArgs {
    fn coords(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }

    fn is_unset(&self) -> bool {
        self.place.is_none() && self.coords().is_none()
    }

    fn filters(&self, config: &Config) -> Result<Vec<TagFilter>> {
        if self.tags.is_empty() {
            config.amenity_filters()
        } else {
            Ok(self.tags.clone())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ta_analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    let catalog = config.catalog();

    let command = cli.command.unwrap_or(Commands::Interactive {
        location: LocationArgs::default(),
    });

    let Some(location) = command.location() else {
        commands::list_places(&catalog);
        return Ok(());
    };

    if let Some(radius) = location.radius {
        if radius == 0 {
            anyhow::bail!("--radius must be greater than zero");
        }
        config.search.radius_m = radius;
    }
    if let Commands::Analyze {
        output: Some(dir), ..
    } = &command
    {
        config.report.output_dir = dir.clone();
    }

    let place = commands::resolve_place(&catalog, location.place.as_deref(), location.coords())?;
    let filters = location.filters(&config)?;
    let choose_area = location.is_unset();

    let services = Services::from_config(&config)?;
    let mut ctx = AppContext::new(config, place, cli.quiet);

    tracing::debug!(
        place = %ctx.session.place().name,
        radius_m = ctx.session.radius_m(),
        "Starting"
    );

    match command {
        Commands::Interactive { .. } => {
            interactive::run_interactive(&mut ctx, &services, choose_area).await?;
        }
        Commands::Amenities { area, geojson, .. } => {
            commands::fetch_amenities(&mut ctx, &services, &filters).await?;
            if area {
                commands::fetch_area_amenities(&mut ctx, &services).await?;
            }
            if geojson {
                commands::export_map(&ctx)?;
            }
        }
        Commands::Analyze {
            open: open_report, ..
        } => {
            commands::fetch_amenities(&mut ctx, &services, &filters).await?;
            let path = commands::analyze(&ctx, &services).await?;
            if open_report {
                open::that(&path)?;
            }
        }
        Commands::Places => {}
    }

    Ok(())
}
