//! Gia sư Toán 4 · Quiz Tutor Backend
//!
//! - Axum HTTP + WebSocket API, one quiz flow per WebSocket connection
//! - Quiz generation through Gemini structured output
//! - Static shell (./static/index.html) that displays server-rendered screens
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   STATIC_DIR        : directory of the browser shell (default "./static")
//!   GEMINI_API_KEY    : required for quiz generation (API_KEY also accepted)
//!   GEMINI_BASE_URL   : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL      : default "gemini-2.5-flash"
//!   QUIZ_CONFIG_PATH  : path to TOML config (student name, lessons, prompt, image hosts)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod answer;
mod config;
mod domain;
mod error;
mod flow;
mod gemini;
mod grading;
mod lessons;
mod prompt;
mod protocol;
mod render;
mod routes;
mod sanitize;
mod session;
mod state;
mod strings;
mod telemetry;
mod util;

#[cfg(test)]
mod testing;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new());

  let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into());
  let app = build_router(state, &static_dir);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quiz_tutor", %addr, %static_dir, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "quiz_tutor", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "quiz_tutor", error = %e, "Failed to listen for Ctrl+C");
    std::future::pending::<()>().await;
  }
  info!(target: "quiz_tutor", "Shutdown requested");
}
