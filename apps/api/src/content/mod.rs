//! Content Store — the static biographical record both responders read from.
//!
//! Built once at startup (embedded profile or `PORTFOLIO_CONTENT_PATH`) and shared
//! as `Arc<ContentRecord>`. There is no mutation API after construction.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const BUILTIN_PROFILE: &str = include_str!("profile.json");

/// Starter questions shown before any FAQ-derived ones.
const STARTER_QUESTIONS: &[&str] = &[
    "What are your core skills?",
    "Tell me about your experience with AWS",
    "What AI projects have you worked on?",
    "How do you approach technical training?",
    "What are you looking for in your next role?",
    "Can you share some testimonials?",
];
const MAX_QUICK_QUESTIONS: usize = 9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub title: String,
    pub company: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRecord {
    pub personal: PersonalInfo,
    pub most_recent_role: Role,
    pub strengths: Vec<String>,
    pub unique_selling_points: Vec<String>,
    pub job_preferences: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub key_achievements: Vec<String>,
}

impl ContentRecord {
    /// The profile compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_PROFILE).context("built-in profile is invalid")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid content file '{}'", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let record: ContentRecord =
            serde_json::from_str(raw).context("content is not a valid profile document")?;
        record.validate()?;
        Ok(record)
    }

    /// Rejects records the responders cannot render sensibly.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("personal.name", &self.personal.name),
            ("personal.email", &self.personal.email),
            ("most_recent_role.title", &self.most_recent_role.title),
            ("most_recent_role.company", &self.most_recent_role.company),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                bail!("{field} must not be blank");
            }
        }

        for (i, faq) in self.faqs.iter().enumerate() {
            if faq.question.trim().is_empty() || faq.answer.trim().is_empty() {
                bail!("faqs[{i}] needs both a question and an answer");
            }
        }

        Ok(())
    }

    /// Starter questions followed by FAQ questions not already listed, capped at nine.
    pub fn quick_questions(&self) -> Vec<String> {
        let mut questions: Vec<String> = STARTER_QUESTIONS.iter().map(|q| q.to_string()).collect();
        for faq in &self.faqs {
            if questions.len() >= MAX_QUICK_QUESTIONS {
                break;
            }
            if !questions.contains(&faq.question) {
                questions.push(faq.question.clone());
            }
        }
        questions
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hi there! I'm {}, a {}. How can I help you today?",
            self.personal.name, self.personal.title
        )
    }
}
