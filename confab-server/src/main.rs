use anyhow::Result;
use axum::{Router, routing::get};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use confab_server::{AppState, Relay, SignalingService, ws_handler};

#[derive(Parser)]
#[command(name = "confab-relay", about = "Signaling relay for confab rooms")]
struct Args {
    /// Address to bind on.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 4000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let signaling = SignalingService::new();
    let (relay_tx, relay_rx) = mpsc::channel(256);

    let relay = Relay::new(relay_rx, Arc::new(signaling.clone()));
    tokio::spawn(relay.run());

    let state = Arc::new(AppState {
        signaling,
        relay_tx,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from((args.host, args.port));
    info!("Signaling relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
