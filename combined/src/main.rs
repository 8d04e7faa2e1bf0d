//! Combined binary for development - runs the subscriber and the publisher
//! in one process.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use publisher_lib::config::PublisherConfig;

#[derive(Parser)]
#[command(name = "iot-sim")]
#[command(about = "IoT simulator: subscriber service and sensor publisher in one process")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the subscriber and the publisher (development mode)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value = "5000")]
        port: u16,
        /// Milliseconds between published batches (overrides PUBLISH_INTERVAL_MS)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
        /// Only run the subscriber
        #[arg(long)]
        no_publisher: bool,
    },
    /// Run database migrations of the subscriber
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            interval_ms,
            no_publisher,
        } => {
            info!("Starting IoT simulator in development mode");
            info!("  Subscriber API: http://{}:{}", host, port);
            info!("  Hub:            ws://{}:{}/sensor-data-hub", host, port);

            // Spawn the subscriber first so it is listening before readings flow
            let subscriber_handle = tokio::spawn(async move {
                if let Err(e) = subscriber_lib::run_embedded(&host, port).await {
                    error!("Subscriber service failed: {}", e);
                }
            });

            if no_publisher {
                if subscriber_handle.await.is_err() {
                    error!("Subscriber service panicked");
                }
                return Ok(());
            }

            // Wait a moment for the subscriber to connect to the broker
            tokio::time::sleep(Duration::from_millis(500)).await;

            let mut publisher_config = PublisherConfig::from_env();
            if let Some(ms) = interval_ms {
                publisher_config.publish_interval = Duration::from_millis(ms);
            }
            let publisher_handle = tokio::spawn(async move {
                if let Err(e) = publisher_lib::run_embedded(publisher_config).await {
                    error!("Publisher failed: {}", e);
                }
            });

            // The publisher returns on Ctrl-C; the subscriber only on error
            tokio::select! {
                _ = subscriber_handle => {
                    error!("Subscriber service exited unexpectedly");
                }
                _ = publisher_handle => {
                    info!("Publisher stopped, shutting down");
                }
            }
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateAction::Up => subscriber_lib::MigrateAction::Up,
                MigrateAction::Down => subscriber_lib::MigrateAction::Down,
                MigrateAction::Status => subscriber_lib::MigrateAction::Status,
                MigrateAction::Fresh => subscriber_lib::MigrateAction::Fresh,
            };

            subscriber_lib::run_migrations(migrate_action).await?;
        }
    }

    Ok(())
}
