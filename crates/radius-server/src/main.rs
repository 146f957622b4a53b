use clap::Parser;
use radius_proto::MemoryDictionary;
use radius_server::{Config, ConfigHandler, RadiusServer};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RADIUS authentication and accounting server (RFC 2865/2866)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "radius_server")]
struct Cli {
    /// Path to configuration file
    #[arg(value_name = "CONFIG", default_value = "config.json")]
    config_path: String,

    /// Validate configuration and exit (doesn't start server)
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load or create configuration (without logging first)
    let config = match Config::from_file(&cli.config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::registry()
                .with(EnvFilter::new("info"))
                .with(tracing_subscriber::fmt::layer())
                .init();

            if cli.validate {
                eprintln!("Configuration validation failed: {}", e);
                process::exit(1);
            }

            warn!("Could not load config file from {}: {}", cli.config_path, e);
            info!("Creating example configuration at: {}", cli.config_path);

            if let Err(e) = Config::example().to_file(&cli.config_path) {
                error!("Error creating example config: {}", e);
                process::exit(1);
            }

            info!("Please edit {} and restart the server", cli.config_path);
            process::exit(0);
        }
    };

    if cli.validate {
        println!("Configuration validated successfully");
        println!("  Listen: {}", config.listen_address);
        println!("  Ports: auth {}, acct {}", config.auth_port, config.acct_port);
        println!("  Duplicate interval: {} ms", config.duplicate_interval_ms);
        println!("  Clients: {}", config.clients.len());
        println!("  Users: {}", config.users.len());
        println!("  Log level: {}", config.log_level.as_deref().unwrap_or("info"));
        process::exit(0);
    }

    let log_level = config.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("RADIUS server v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", cli.config_path);

    if config.clients.is_empty() {
        warn!("No clients configured; every request will be ignored");
    }
    for client in &config.clients {
        let status = if client.enabled { "enabled" } else { "disabled" };
        let name = client.name.as_deref().unwrap_or("(unnamed)");
        info!("Client {} - {} ({})", client.address, name, status);
    }

    let server_config = match config.server_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let handler = Arc::new(ConfigHandler::new(Arc::new(config)));
    let dictionary = MemoryDictionary::standard().into_shared();
    let server = match RadiusServer::bind(server_config, dictionary, handler).await {
        Ok(srv) => srv,
        Err(e) => {
            error!("Failed to create server: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = server.start(true, true) {
        error!("Failed to start server: {}", e);
        process::exit(1);
    }
    info!("Server started, press Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for shutdown signal: {}", e);
    }

    server.stop();
    server.join().await;
    info!("Server stopped");
}
