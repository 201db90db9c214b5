//! Per-visitor chat sessions.
//!
//! Each session owns its transcript and resolver config. The store only maps ids to
//! sessions; nothing conversational is shared between them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chat::prompts::APOLOGY;
use crate::chat::resolver::{Query, Resolver, ResolverConfig, ResolverError, Strategy};
use crate::chat::transcript::{Transcript, TranscriptEntry};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reply {
    pub text: String,
    pub strategy: Strategy,
    /// True when the remote assistant failed and the apology stands in for an answer.
    pub degraded: bool,
}

#[derive(Debug)]
pub struct ChatSession {
    pub id: Uuid,
    pub transcript: Transcript,
    pub config: ResolverConfig,
}

impl ChatSession {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Transcript::new(),
            config,
        }
    }

    /// Asks one question and records both sides of the exchange.
    ///
    /// Blank input is rejected before anything is recorded. A remote failure is
    /// answered with the apology, so the transcript always grows by two entries
    /// once the query is accepted. Nothing is recorded until the answer is in hand:
    /// dropping the future mid-call leaves the transcript as it was.
    pub async fn ask(&mut self, resolver: &Resolver, raw: &str) -> Result<Reply, ResolverError> {
        let query = Query::new(raw)?;
        let question = TranscriptEntry::user(query.as_str());

        let reply = match resolver
            .resolve(query.as_str(), self.transcript.all(), &self.config)
            .await
        {
            Ok(resolution) => Reply {
                text: resolution.text,
                strategy: resolution.strategy,
                degraded: false,
            },
            Err(ResolverError::RemoteUnavailable(diagnostic)) => {
                warn!(session_id = %self.id, "Remote assistant failed: {diagnostic}");
                Reply {
                    text: APOLOGY.to_string(),
                    strategy: Strategy::Remote,
                    degraded: true,
                }
            }
            Err(err @ ResolverError::EmptyQuery) => return Err(err),
        };

        self.transcript.append(question);
        self.transcript.append(TranscriptEntry::assistant(reply.text.clone()));
        Ok(reply)
    }
}

pub type SharedSession = Arc<Mutex<ChatSession>>;

struct SessionSlot {
    session: SharedSession,
    /// Unix millis of the last lookup.
    last_activity: AtomicI64,
}

impl SessionSlot {
    fn new(session: ChatSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            last_activity: AtomicI64::new(chrono::Utc::now().timestamp_millis()),
        }
    }

    fn touch(&self) {
        self.last_activity
            .store(chrono::Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_ms(&self, now: i64) -> i64 {
        now - self.last_activity.load(Ordering::Relaxed)
    }
}

/// Registry of live sessions. A session's mutex serialises its own queries;
/// different sessions never contend beyond the map lookup.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionSlot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, config: ResolverConfig) -> Uuid {
        let session = ChatSession::new(config);
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, SessionSlot::new(session));
        info!(session_id = %id, "Chat session created");
        id
    }

    /// Looks a session up and marks it active.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        let slot = sessions.get(&id)?;
        slot.touch();
        Some(slot.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Chat session closed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for longer than `max_idle`. A session whose lock is held
    /// is mid-exchange and always survives.
    pub async fn cleanup_inactive(&self, max_idle: Duration) -> usize {
        let max_idle_ms = i64::try_from(max_idle.as_millis()).unwrap_or(i64::MAX);
        let now = chrono::Utc::now().timestamp_millis();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, slot| {
            let keep = slot.idle_ms(now) <= max_idle_ms || slot.session.try_lock().is_err();
            if !keep {
                debug!(session_id = %id, "Evicting idle chat session");
            }
            keep
        });
        let cleaned = before - sessions.len();

        if cleaned > 0 {
            info!("Cleaned up {cleaned} inactive chat sessions");
        }
        cleaned
    }
}

/// Background sweep that evicts sessions idle for longer than `idle_timeout`.
/// Runs at most once a minute, more often for short timeouts.
pub fn spawn_idle_sweeper(store: SessionStore, idle_timeout: Duration) -> JoinHandle<()> {
    let period = idle_timeout.min(Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            store.cleanup_inactive(idle_timeout).await;
        }
    })
}
