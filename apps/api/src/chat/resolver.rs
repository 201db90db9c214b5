//! Response Resolver — turns one visitor question into one answer.
//!
//! Two strategies share the contract:
//! - `Remote`: a hosted chat-completion call with the Content Store in the system prompt.
//! - `Local`: the keyword `RuleTable`, total and pure.
//!
//! The strategy is picked on every call from `ResolverConfig` alone. Nothing is cached,
//! so adding a key mid-conversation switches the very next answer to `Remote`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::chat::prompts::build_system_prompt;
use crate::chat::rules::RuleTable;
use crate::chat::transcript::TranscriptEntry;
use crate::content::ContentRecord;
use crate::llm_client::{ChatBackend, CompletionRequest};

#[derive(Debug, Error, PartialEq)]
pub enum ResolverError {
    #[error("query must not be empty")]
    EmptyQuery,

    /// Network failure, timeout, non-2xx status or unusable body. The diagnostic is
    /// for logs; visitors get the apology instead.
    #[error("remote assistant unavailable: {0}")]
    RemoteUnavailable(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Remote,
    Local,
}

/// Per-session resolver settings. A missing or blank key is not an error; it
/// simply means `Local`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolverConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl ResolverConfig {
    pub fn mode(&self) -> Strategy {
        if self.usable_key().is_some() {
            Strategy::Remote
        } else {
            Strategy::Local
        }
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// A visitor question, guaranteed non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Result<Self, ResolverError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ResolverError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Resolution {
    pub text: String,
    pub strategy: Strategy,
}

/// Shared by every session; holds only read-only state.
#[derive(Clone)]
pub struct Resolver {
    backend: Arc<dyn ChatBackend>,
    content: Arc<ContentRecord>,
    rules: Arc<RuleTable>,
    default_model: String,
    system_prompt: Arc<str>,
}

impl Resolver {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        content: Arc<ContentRecord>,
        rules: Arc<RuleTable>,
        default_model: impl Into<String>,
    ) -> Self {
        let system_prompt = build_system_prompt(&content).into();
        Self {
            backend,
            content,
            rules,
            default_model: default_model.into(),
            system_prompt,
        }
    }

    /// Resolves `query` with whichever strategy `config` selects right now.
    ///
    /// `transcript` is the session history so far. Neither strategy sends it anywhere:
    /// each remote call carries only the system prompt and the latest question.
    pub async fn resolve(
        &self,
        query: &str,
        transcript: &[TranscriptEntry],
        config: &ResolverConfig,
    ) -> Result<Resolution, ResolverError> {
        let query = Query::new(query)?;

        match config.usable_key() {
            Some(api_key) => {
                let model = config
                    .model
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(&self.default_model);
                debug!(model, history_len = transcript.len(), "resolving remotely");

                let text = self
                    .backend
                    .complete(CompletionRequest {
                        api_key,
                        model,
                        system: &self.system_prompt,
                        prompt: query.as_str(),
                    })
                    .await
                    .map_err(|e| ResolverError::RemoteUnavailable(e.to_string()))?;

                Ok(Resolution {
                    text,
                    strategy: Strategy::Remote,
                })
            }
            None => {
                let rule = self.rules.matching_rule(query.as_str()).map(|r| r.name.as_str());
                info!(rule = rule.unwrap_or("fallback"), "resolving locally");

                Ok(Resolution {
                    text: self.rules.answer(query.as_str(), &self.content),
                    strategy: Strategy::Local,
                })
            }
        }
    }
}
