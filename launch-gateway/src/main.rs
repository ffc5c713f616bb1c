//! Entry point for the `launch-gateway` HTTP server.

use std::sync::Arc;

use launch_gateway::{
    config::GatewayConfig,
    permissions::EditorPermissions,
    routes::{create_router, AppState},
    store::MemoryStore,
};
use launch_trials::HttpOriginTrialsClient;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match GatewayConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let store = match &config.seed_path {
        Some(path) => match MemoryStore::from_seed_file(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load seed data");
                std::process::exit(1);
            }
        },
        None => MemoryStore::new(),
    };
    if let Ok((features, gates)) = store.len() {
        info!(features, gates, "entity store ready");
    }

    let trials = match HttpOriginTrialsClient::new(config.trials.clone()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to build origin trials client");
            std::process::exit(1);
        }
    };

    let state = AppState {
        store: Arc::new(store),
        permissions: Arc::new(EditorPermissions::new(&config.admin_emails)),
        trials: Arc::new(trials),
    };
    let app = create_router(state);

    let addr = config.listen_addr;
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, ot_api = %config.trials.base_url, "launch-gateway listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
