//! Development server for HomeHero client development
//!
//! Serves the mock backend with seeded data so the client can run against a
//! real HTTP server without the production backend.
//!
//! Environment (a .env file is read if present):
//! - IP_ADDRESS: address to bind (default 127.0.0.1)
//! - PORT: port to bind (default 5888, the client's default backend)
//!
//! Usage: cargo run -p dev-server

use anyhow::{Context, Result};
use test_helpers::backend::{self, MockBackend};
use test_helpers::mock::Dataset;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // silently ignore a missing .env file
    let _ = dotenvy::dotenv();

    let subscriber = ui::telemetry::get_subscriber("info".into());
    ui::telemetry::init_subscriber(subscriber)?;

    let ip = std::env::var("IP_ADDRESS")
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = match std::env::var("PORT") {
        Ok(port) => port.parse().context("PORT must be a port number")?,
        Err(_) => 5888,
    };

    info!("🚀 Starting HomeHero development server");
    let mock = MockBackend::new();
    let dataset = Dataset::seed(&mock);
    let (server, port) = backend::build(mock, &ip, port)?;
    let mut server = tokio::spawn(server);

    info!("✅ API server running on http://{ip}:{port}");
    info!("   Client: BACKEND_URL=http://{ip}:{port}");
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    // Keep server running until Ctrl+C
    tokio::select! {
        result = &mut server => match result {
            Ok(Ok(())) => info!("Server stopped"),
            Ok(Err(e)) => ui::telemetry::log_error(e),
            Err(e) => ui::telemetry::log_error(e),
        },
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("🛑 Shutting down development server");
            server.abort();
        }
    }
    Ok(())
}
