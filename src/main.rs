//! Exemplar · Examples Catalog Submission Backend
//!
//! - Axum HTTP + WebSocket API driving the example submission workflow
//! - Forwards accepted submissions to the catalog creation endpoint (reqwest)
//! - Static SPA fallback (./static/index.html) for the form page
//!
//! Important env variables:
//!   PORT                  : u16 (default 3000)
//!   CREATION_API_URL      : creation endpoint base, default "http://127.0.0.1:8081/api"
//!   CREATION_TIMEOUT_SECS : outbound request timeout, default 20
//!   CATALOG_CONFIG_PATH   : path to TOML config (categories + tags)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod seeds;
mod validate;
mod workflow;
mod creation;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (catalogs, creation client, sessions).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "exemplar_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
