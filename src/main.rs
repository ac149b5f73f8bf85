//! Aiplonex chat agent server
//!
//! Entry point: loads configuration, initializes tracing, serves HTTP.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use aiplonex_agent::config::{AppConfig, load_llm_settings};
use aiplonex_agent::error::ConfigError;
use aiplonex_agent::server::start_server;
use dotenvy::dotenv;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    // (M-LOG-STRUCTURED)
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    init_tracing();

    let config = match AppConfig::load() {
        Ok(c) => Arc::new(c),
        // --help / --version / usage errors
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => {
            error!(name: "config.invalid", error = %e, "Configuration error");
            std::process::exit(1);
        }
    };

    let settings = match load_llm_settings(&config.llm) {
        Ok(s) => s,
        Err(e) => {
            error!(name: "config.invalid", error = %e, "Configuration error");
            std::process::exit(1);
        }
    };

    start_server(config, settings).await
}
