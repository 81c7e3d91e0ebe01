mod config;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::store::{DocumentStore, FsDocumentStore};

#[tokio::main]
async fn main() {
    // A missing .env is fine; the process environment still applies.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let store = FsDocumentStore::new(&config.data_dir);
    store.init().await.expect("document store init failed");

    // Generation without a server key still works with per-request keys.
    let llm: Option<Arc<dyn llm::LlmChat>> = match llm::LlmClient::from_config(config.llm.clone()) {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; generation needs a per-request key");
            None
        }
    };

    let port = config.port;
    let state = state::AppState::new(config, Arc::new(store), llm);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "carechart listening");
    axum::serve(listener, app).await.expect("server failed");
}
