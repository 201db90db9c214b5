//! Session transcript: an append-only log of who said what, in order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }
}

/// Flat export record. Drops only the timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedEntry {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptExport {
    pub exported_at: DateTime<Utc>,
    pub messages: Vec<ExportedEntry>,
}

/// Entries are only ever pushed. `reset` is the single way to remove them.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Read-only view in creation order.
    pub fn all(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit session restart only.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn export(&self) -> Vec<ExportedEntry> {
        self.entries
            .iter()
            .map(|e| ExportedEntry {
                speaker: e.speaker,
                text: e.text.clone(),
            })
            .collect()
    }

    pub fn export_json(&self) -> TranscriptExport {
        TranscriptExport {
            exported_at: Utc::now(),
            messages: self.export(),
        }
    }

    /// Markdown download; assistant turns are attributed to `assistant_name`.
    pub fn export_markdown(&self, assistant_name: &str) -> String {
        let mut out = String::from("# Conversation with Portfolio Chatbot\n\n");
        for entry in &self.entries {
            let who = match entry.speaker {
                Speaker::User => "You",
                Speaker::Assistant => assistant_name,
            };
            out.push_str(&format!("**{who}**: {}\n\n", entry.text));
        }
        out
    }
}
