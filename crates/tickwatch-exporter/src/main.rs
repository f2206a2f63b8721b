//! tickwatch exporter binary.
//!
//! Loads the YAML config, starts the `/metrics` HTTP endpoint, and runs the
//! synthetic demo host so a scrape shows live moving values. An embedding
//! host replaces the demo driver with its own tick loop.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use tickwatch_exporter::{app_state, config, driver, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tickwatch.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .exporter
        .listen
        .parse()
        .expect("exporter.listen must be a valid SocketAddr");

    let world = Arc::new(driver::SyntheticWorld::new());
    let state = app_state::AppState::new(cfg, world.clone()).expect("state init failed");
    let app = router::build_router(state.clone());

    tokio::spawn(driver::run(state, world));

    tracing::info!(%listen, "tickwatch-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
