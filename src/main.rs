use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use omnia_gateway::config::{load_config, validation::validate_config, Credentials};
use omnia_gateway::http::Gateway;
use omnia_gateway::lifecycle::{signals, Shutdown};
use omnia_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "omnia-gateway", version, about = "API gateway for the Omnia assistant")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);

    // The bind override arrives after load_config's validation pass.
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "invalid configuration");
        }
        return Err("configuration validation failed".into());
    }

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let credentials = Credentials::from_env();
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        signals::listen(&shutdown).await;
    });

    Gateway::new(config, credentials).run(listener, receiver).await?;
    Ok(())
}
