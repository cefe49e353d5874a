//! ApplyPilot server entry point.

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::map_err_ignore)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::unused_async)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::default_trait_access)]

use std::sync::Arc;

use anyhow::Context;
use applypilot::config::AppConfig;
use applypilot::{server, telemetry};
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing::info;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env fallbacks
    let _ = dotenv();

    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init(config.telemetry.log_format);

    info!(
        name: "config.loaded",
        host = %config.server.host,
        port = config.server.port,
        rate_limit = config.resilience.rate_limit_enabled,
        demo_data = config.seed.demo_data,
        "Configuration loaded"
    );

    server::start_server(Arc::new(config)).await
}
