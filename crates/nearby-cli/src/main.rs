mod location;
mod output;
mod watch;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use nearby_core::{AppConfig, Coordinates, NearbyQuery};
use nearby_orchestrator::{OrchestratorConfig, SearchOrchestrator};
use nearby_places::PlacesClient;
use tracing_subscriber::EnvFilter;

use crate::location::FixedLocation;

#[derive(Debug, Parser)]
#[command(name = "nearby")]
#[command(about = "Find places around a location through the places proxy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// One-shot nearby search
    Search {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in meters (defaults to NEARBY_SEARCH_RADIUS_METERS)
        #[arg(long)]
        radius: Option<u32>,
        /// Category type token, e.g. `cafe`
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show full details for one place
    Details { place_id: String },
    /// List the categories offered by the proxy
    Categories,
    /// Interactive search driven by lines on stdin
    Watch {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = nearby_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = PlacesClient::new(&config.api_url, config.client_timeout_secs)?;

    match cli.command {
        Commands::Search {
            lat,
            lng,
            radius,
            category,
            keyword,
        } => {
            let origin = Coordinates::new(lat, lng);
            let query = NearbyQuery {
                origin,
                radius_meters: radius.unwrap_or(config.search_radius_meters),
                category,
                keyword,
            };
            let places = client.nearby_places(&query).await?;
            output::print_places(origin, places);
        }
        Commands::Details { place_id } => {
            let place = client.place_details(&place_id).await?;
            output::print_details(&place);
        }
        Commands::Categories => {
            let categories = client.place_categories().await?;
            output::print_categories(&categories);
        }
        Commands::Watch { lat, lng } => {
            let location = Arc::new(FixedLocation::new(Coordinates::new(lat, lng)));
            let orchestrator = SearchOrchestrator::new(
                Arc::new(client),
                Arc::clone(&location) as Arc<dyn nearby_core::GeolocationProvider>,
                orchestrator_config(&config),
            );
            watch::run(orchestrator, location).await?;
        }
    }

    Ok(())
}

fn orchestrator_config(config: &AppConfig) -> OrchestratorConfig {
    OrchestratorConfig {
        radius_meters: config.search_radius_meters,
        debounce: Duration::from_millis(config.debounce_ms),
    }
}
