//! greenline operations-console server.

mod auth;
mod chat;
mod config;
mod relay;

use axum::{
    Router,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use greenline_assistant::{Assistant, Dispatcher, HttpLlmBackend};
use greenline_directory::PageDirectory;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

/// Embedded page directory, produced by the deployment-time generation step.
const DEFAULT_PAGES: &str = include_str!("../data/pages.json");

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    assert!(
        config.session.cookie_secret.len() >= 32,
        "SESSION__COOKIE_SECRET must be at least 32 bytes"
    );
    let cookie_key = Key::derive_from(config.session.cookie_secret.as_bytes());

    // Build the page directory and the assistant around it
    let directory = load_directory(&config);
    tracing::info!(pages = directory.flatten().len(), "Loaded page directory");

    let backend =
        HttpLlmBackend::new(config.llm.clone()).expect("failed to build generative backend");
    let assistant = Assistant::new(Dispatcher::new(directory), Box::new(backend));

    let google =
        auth::GoogleAuthClient::new(&config.google).expect("failed to build Google OAuth client");
    let relay_client = relay::RelayClient::new(&config.backend).expect("failed to build relay");

    let state = auth::AppState::new(Arc::new(config), google, relay_client, assistant, cookie_key);

    let app = Router::new()
        .route("/health", get(health))
        // Auth routes
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout))
        // Assistant
        .route("/api/floatingagent", post(chat::floating_agent))
        // Backend relays
        .route("/api/business/lookup", post(relay::business_lookup))
        .route("/api/documents/generate", post(relay::generate_document))
        .route("/api/invoices/upload", post(relay::upload_invoice))
        .route("/api/strategy/submit", post(relay::submit_strategy))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    auth::refresh_session,
                )),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(&state.config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", state.config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}

async fn health() -> &'static str {
    "ok"
}

/// Loads the page directory: a configured file when set, the embedded copy
/// otherwise.
fn load_directory(config: &ServerConfig) -> PageDirectory {
    let source = match &config.directory.path {
        Some(path) => {
            std::fs::read_to_string(path).expect("failed to read page directory file")
        }
        None => DEFAULT_PAGES.to_string(),
    };
    PageDirectory::from_json_str(&source).expect("invalid page directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_directory_is_valid() {
        let directory = PageDirectory::from_json_str(DEFAULT_PAGES).expect("valid directory");
        let entries = directory.flatten();

        // The business-lookup page is first: it is the generic fallback
        // target and wins name-match ties.
        assert_eq!(entries[0].path, "/business-info");
        assert!(entries.iter().any(|e| e.path == "/document-generation"));
        assert!(entries.iter().any(|e| e.path == "/utility-search"));
    }
}
