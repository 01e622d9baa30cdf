// crates/gateway/src/main.rs
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use gateway::backend::XrpcBackend;
use gateway::config::BridgeConfig;
use gateway::http_api::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = BridgeConfig::from_env();
    let addr: SocketAddr = cfg
        .addr
        .parse()
        .with_context(|| format!("bad BRIDGE_ADDR {:?}", cfg.addr))?;
    let backend = XrpcBackend::new(cfg.backend_timeout(), cfg.profile_cache_ttl())
        .context("building backend client")?;

    tracing::info!(backend = %cfg.backend_url, anonymous = ?cfg.anonymous_surfaces, "backend configured");
    let app = router(AppState::new(cfg, Arc::new(backend)));

    tracing::info!(address = %addr, "gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
