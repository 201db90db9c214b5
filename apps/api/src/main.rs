mod chat;
mod config;
mod content;
mod errors;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::resolver::Resolver;
use crate::chat::rules::RuleTable;
use crate::chat::session::{spawn_idle_sweeper, SessionStore};
use crate::config::Config;
use crate::content::ContentRecord;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; bad values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Load the Content Store once; it is read-only from here on
    let content = match &config.content_path {
        Some(path) => {
            info!("Loading content from {}", path.display());
            ContentRecord::load(path)?
        }
        None => ContentRecord::builtin()?,
    };
    let content = Arc::new(content);
    info!(
        "Content store ready: {} strengths, {} projects, {} FAQs",
        content.strengths.len(),
        content.projects.len(),
        content.faqs.len()
    );

    // Initialize LLM client (only used when a session has an API key)
    let llm = LlmClient::new(&config.anthropic_base_url, config.llm_timeout)?;
    if config.anthropic_api_key.is_some() {
        info!("LLM client initialized (model: {})", config.anthropic_model);
    } else {
        info!("ANTHROPIC_API_KEY not set; chat answers come from local rules unless a session supplies a key");
    }

    let resolver = Resolver::new(
        Arc::new(llm),
        content.clone(),
        Arc::new(RuleTable::default()),
        config.anthropic_model.clone(),
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        content,
        resolver,
        sessions: SessionStore::new(),
    };

    // Evict sessions abandoned without an explicit delete
    spawn_idle_sweeper(state.sessions.clone(), config.session_idle_timeout);
    info!(
        "Idle chat sessions expire after {}s",
        config.session_idle_timeout.as_secs()
    );

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
