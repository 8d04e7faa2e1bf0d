//! IoT Publisher - simulated sensors publishing to MQTT.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use publisher_lib::config::PublisherConfig;
use publisher_lib::simulator::SensorSimulator;

#[derive(Parser)]
#[command(name = "iot-publisher")]
#[command(about = "Simulated sensor fleet publishing readings over MQTT")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish readings until interrupted
    Publish {
        /// Broker host (overrides MQTT_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Broker port (overrides MQTT_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Milliseconds between batches (overrides PUBLISH_INTERVAL_MS)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },
    /// Print one batch of readings as JSON without connecting
    Sample,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            host,
            port,
            interval_ms,
        } => {
            let mut config = PublisherConfig::from_env();
            if let Some(host) = host {
                config.mqtt.host = host;
            }
            if let Some(port) = port {
                config.mqtt.port = port;
            }
            if let Some(ms) = interval_ms {
                config.publish_interval = std::time::Duration::from_millis(ms);
            }
            publisher_lib::run_embedded(config).await?;
        }
        Commands::Sample => {
            let readings = SensorSimulator::new().generate_all();
            println!("{}", serde_json::to_string_pretty(&readings)?);
        }
    }

    Ok(())
}
