//! Embercast Server - standalone headless bridge.
//!
//! Wires the reconciliation engine to a configured renderer and media
//! conversion service, serves the GENA callback endpoint, and runs until
//! SIGINT/SIGTERM. The upstream cast-protocol layer embeds the same core
//! library; this binary exists for server deployments and soak testing
//! against a real renderer.

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use embercast_core::{
    bootstrap_bridge, start_server, AppState, BridgeDeps, CallbackContext, HttpMediaResolver,
    InMemoryQueue, LoggingStateListener,
};
use tokio::signal;

use crate::config::ServerConfig;

/// Embercast Server - headless cast-to-renderer playback bridge.
#[derive(Parser, Debug)]
#[command(name = "embercast-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "EMBERCAST_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Bind port (overrides config file).
    #[arg(short = 'p', long, env = "EMBERCAST_BIND_PORT")]
    port: Option<u16>,

    /// Advertise IP address (overrides config file).
    #[arg(short = 'a', long, env = "EMBERCAST_ADVERTISE_IP")]
    advertise_ip: Option<std::net::IpAddr>,

    /// Renderer IP address (overrides config file).
    #[arg(short = 'r', long, env = "EMBERCAST_RENDERER_IP")]
    renderer_ip: Option<String>,

    /// Media conversion service base URL (overrides config file).
    #[arg(short = 'm', long, env = "EMBERCAST_MEDIA_SERVICE_URL")]
    media_service_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Embercast Server v{}", env!("CARGO_PKG_VERSION"));

    let mut config = ServerConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(ip) = args.advertise_ip {
        config.advertise_ip = Some(ip);
    }
    if let Some(ip) = args.renderer_ip {
        config.renderer_ip = Some(ip);
    }
    if let Some(url) = args.media_service_url {
        config.media_service_url = Some(url);
    }

    let renderer_ip = config.renderer_ip.clone().context(
        "No renderer configured. Specify --renderer-ip or set EMBERCAST_RENDERER_IP \
         to the IP address of the renderer to control.",
    )?;
    let media_service_url = config.media_service_url.clone().context(
        "No media service configured. Specify --media-service-url or set \
         EMBERCAST_MEDIA_SERVICE_URL to the conversion service base URL.",
    )?;

    // Resolve callback context: explicit advertise IP or auto-detection.
    let callback = match config.advertise_ip {
        Some(ip) => CallbackContext::explicit(ip, config.bind_port),
        None => CallbackContext::auto_detect(config.bind_port).context(
            "Failed to auto-detect local IP address. Please specify --advertise-ip \
             or set EMBERCAST_ADVERTISE_IP to an IP the renderer can reach.",
        )?,
    };
    log::info!(
        "Configuration: renderer={}, media={}, callback={}",
        renderer_ip,
        media_service_url,
        callback.callback_url()
    );

    let resolver = Arc::new(
        HttpMediaResolver::from_base_url(media_service_url)
            .context("Failed to construct media service client")?,
    );
    let queue = Arc::new(InMemoryQueue::new());
    let listener = Arc::new(LoggingStateListener);

    let services = bootstrap_bridge(BridgeDeps {
        renderer_ip,
        resolver,
        queue,
        listener,
        config: config.engine.clone(),
    })
    .context("Failed to bootstrap bridge services")?;

    services.start_event_subscription(callback.callback_url());
    log::info!("Background tasks started");

    let app_state = AppState {
        engine: services.engine.clone(),
        subscriber: Arc::clone(&services.subscriber),
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], config.bind_port));
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(app_state, addr).await {
            log::error!("Server error: {}", e);
        }
    });

    shutdown_signal().await;
    log::info!("Shutdown signal received, cleaning up...");

    services.shutdown().await;
    server_handle.abort();

    log::info!("Shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
