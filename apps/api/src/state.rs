use std::sync::Arc;

use crate::chat::resolver::{Resolver, ResolverConfig};
use crate::chat::session::SessionStore;
use crate::config::Config;
use crate::content::ContentRecord;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is either read-only or keyed per session.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub content: Arc<ContentRecord>,
    pub resolver: Resolver,
    /// One independently owned transcript and resolver config per visitor.
    pub sessions: SessionStore,
}

impl AppState {
    /// Resolver config new sessions start from: the process-level credential and model.
    pub fn default_resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            api_key: self.config.anthropic_api_key.clone(),
            model: Some(self.config.anthropic_model.clone()),
        }
    }
}
