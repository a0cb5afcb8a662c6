use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "openapi")]
use std::fs;

use anyhow::anyhow;
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use orpheus_gateway::{ServerConfig, create_app, state::AppState};

/// Orpheus gateway - OpenAI-compatible speech synthesis server
#[derive(Parser, Debug)]
#[command(name = "orpheus-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration and print the resolved voices and engine
    Check,

    /// Generate OpenAPI specification
    #[cfg(feature = "openapi")]
    Openapi {
        /// Output format (yaml or json)
        #[arg(short = 'f', long = "format", default_value = "yaml")]
        format: String,

        /// Output file path (prints to stdout if not specified)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Initialize crypto provider before any TLS listener or client is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Commands::Check => {
                let config = load_config(cli.config.as_ref())?;
                let registry = config.voice_registry()?;
                println!("Configuration OK");
                println!("  address:       {}", config.address());
                println!("  tls:           {}", config.is_tls_enabled());
                println!("  engine:        {}", config.engine.kind);
                println!("  artifact dir:  {}", config.artifact_dir.display());
                println!("  default voice: {}", registry.default_voice());
                println!("  voices:        {}", registry.list_voices().join(", "));
                return Ok(());
            }
            #[cfg(feature = "openapi")]
            Commands::Openapi { format, output } => {
                let spec_content = match format.as_str() {
                    "yaml" => orpheus_gateway::docs::openapi::spec_yaml()
                        .map_err(|e| anyhow!("Failed to generate OpenAPI YAML: {}", e))?,
                    "json" => orpheus_gateway::docs::openapi::spec_json()
                        .map_err(|e| anyhow!("Failed to generate OpenAPI JSON: {}", e))?,
                    other => anyhow::bail!("Invalid format '{}'. Must be 'yaml' or 'json'", other),
                };

                if let Some(output_path) = output {
                    fs::write(&output_path, &spec_content).map_err(|e| {
                        anyhow!("Failed to write to {}: {}", output_path.display(), e)
                    })?;
                    println!("OpenAPI spec written to {}", output_path.display());
                } else {
                    println!("{}", spec_content);
                }

                return Ok(());
            }
        }
    }

    let config = load_config(cli.config.as_ref())?;

    let address = config.address();
    let tls_config = config.tls.clone();

    let app_state = AppState::new(config).await?;
    let app = create_app(app_state);

    let socket_addr: SocketAddr = address
        .parse()
        .map_err(|e| anyhow!("Invalid server address '{}': {}", address, e))?;

    if let Some(tls) = tls_config {
        let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to load TLS certificates from {} and {}: {}",
                    tls.cert_path.display(),
                    tls.key_path.display(),
                    e
                )
            })?;

        let handle = Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(30)));
        });

        info!(address = %socket_addr, "Server listening on https (TLS enabled)");

        axum_server::bind_rustls(socket_addr, rustls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| anyhow!("TLS server error: {}", e))?;
    } else {
        info!(address = %socket_addr, "Server listening on http");

        let listener = TcpListener::bind(&socket_addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    info!("Server stopped");
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(config_path) => {
            info!(path = %config_path.display(), "Loading configuration");
            ServerConfig::from_file(config_path).map_err(|e| anyhow!(e.to_string()))
        }
        None => ServerConfig::from_env().map_err(|e| anyhow!(e.to_string())),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
