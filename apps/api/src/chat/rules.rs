//! Local strategy — an ordered keyword rule table over the Content Store.
//!
//! Rules are evaluated top to bottom and the first hit wins. Matching is a
//! case-insensitive substring test, so "aws" also fires on "awsome". Rules overlap
//! on purpose ("training" contains "ai"), which makes table order the precedence.

use serde::{Deserialize, Serialize};

use crate::content::ContentRecord;

/// A single keyword bucket and the canned answer it produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub name: String,
    /// Lower-case fragments; any one of them appearing in the query fires the rule.
    pub keywords: Vec<String>,
    /// Answer text. Placeholders are filled by [`interpolate`].
    pub template: String,
}

impl Rule {
    pub fn new(name: &str, keywords: &[&str], template: &str) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            template: template.to_string(),
        }
    }

    fn matches(&self, query_lower: &str) -> bool {
        self.keywords.iter().any(|k| query_lower.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleTable {
    pub rules: Vec<Rule>,
    /// Used when no rule fires. Should point the visitor at contact details.
    pub fallback: String,
}

const EXPERIENCE_TEMPLATE: &str = "{name} has over 15 years of experience in IT, with a strong focus on AWS cloud technologies, training, and AI implementation. Most recently, {name} served as {role_title} at {role_company}, developing AI/GenAI solutions and cloud training programs.";

const CLOUD_TEMPLATE: &str = "{name} has extensive AWS experience across multiple services including Bedrock, Q, OpenSearch, EC2, RDS, S3, and CloudFormation. {name} has held AWS certifications including Solutions Architect Associate, SysOps Administrator Associate, and Database Specialty, and has worked directly at AWS as a Cloud Support Engineer.";

const AI_TEMPLATE: &str = "{name} has hands-on experience with AI and GenAI technologies, including building RAG systems with Amazon Bedrock, creating Custom GPTs, and implementing AI solutions for business teams. {name} also developed and launched an AI/GenAI Essentials course completed by over 240 employees.";

const TRAINING_TEMPLATE: &str = "{name} excels in technical training and enablement, having created AWS certification programs, developed an apprenticeship program with a 73% conversion rate to full-time roles, and served as an AWS Training Architect at Linux Academy/A Cloud Guru creating courses and hands-on labs.";

const COMPENSATION_TEMPLATE: &str = "For specific discussions about salary expectations and compensation, I'd recommend reaching out to {name} directly via email at {email} or phone at {phone}.";

const FALLBACK_TEMPLATE: &str = "I'd be happy to tell you more about {name}'s experience and qualifications. Feel free to ask about specific skills, projects, or how {name} might fit with your team's needs. You can also reach {name} directly at {email} or {phone}.";

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule::new("experience", &["experience", "background"], EXPERIENCE_TEMPLATE),
                Rule::new("cloud", &["aws", "cloud"], CLOUD_TEMPLATE),
                Rule::new("ai", &["ai", "generative", "claude"], AI_TEMPLATE),
                Rule::new(
                    "training",
                    &["training", "teaching", "education"],
                    TRAINING_TEMPLATE,
                ),
                Rule::new("compensation", &["salary", "compensation"], COMPENSATION_TEMPLATE),
            ],
            fallback: FALLBACK_TEMPLATE.to_string(),
        }
    }
}

impl RuleTable {
    /// First rule whose keywords appear in the query, if any.
    pub fn matching_rule(&self, query: &str) -> Option<&Rule> {
        let query_lower = query.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&query_lower))
    }

    /// Total and pure: every query gets an answer, the same one every time.
    pub fn answer(&self, query: &str, content: &ContentRecord) -> String {
        let template = self
            .matching_rule(query)
            .map(|rule| rule.template.as_str())
            .unwrap_or(self.fallback.as_str());
        interpolate(template, content)
    }
}

/// Fills `{name}`, `{title}`, `{email}`, `{phone}`, `{role_title}` and `{role_company}`.
/// Unknown placeholders are left as written.
pub fn interpolate(template: &str, content: &ContentRecord) -> String {
    template
        .replace("{name}", &content.personal.name)
        .replace("{title}", &content.personal.title)
        .replace("{email}", &content.personal.email)
        .replace("{phone}", &content.personal.phone)
        .replace("{role_title}", &content.most_recent_role.title)
        .replace("{role_company}", &content.most_recent_role.company)
}
