//! crates/hiring_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the interview flow.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The internship roles a candidate can apply for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    AiMlIntern,
    SdeIntern,
}

impl Position {
    /// The role title as it appears in the seeded job descriptions.
    pub fn title(&self) -> &'static str {
        match self {
            Position::AiMlIntern => "AI/ML Intern",
            Position::SdeIntern => "Software Development Engineer (SDE) Intern",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Returned when a role title does not match any known position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown position: {0}")]
pub struct UnknownPosition(pub String);

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "ai/ml intern" | "aiml intern" | "ai_ml_intern" => Ok(Position::AiMlIntern),
            "sde intern" | "sde_intern" | "software development engineer (sde) intern" => {
                Ok(Position::SdeIntern)
            }
            _ => Err(UnknownPosition(s.to_string())),
        }
    }
}

/// The details a candidate submits on the intake form.
///
/// Built once per submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub years_of_experience: u32,
    pub desired_position: Position,
    pub location: String,
    pub tech_stack: Vec<String>,
}

impl CandidateProfile {
    /// Splits a comma-separated tech stack into trimmed, non-empty entries.
    pub fn parse_tech_stack(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The one-line summary recorded in the transcript at intake.
    pub fn summary(&self) -> String {
        format!(
            "Name: {}, Email: {}, Phone: {}, Experience: {}, Position: {}, Location: {}, Tech Stack: {}",
            self.full_name,
            self.email,
            self.phone,
            self.years_of_experience,
            self.desired_position,
            self.location,
            self.tech_stack.join(", ")
        )
    }
}

/// A single prompt/response exchange in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub prompt: String,
    pub response: String,
    pub recorded_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// The coarse sentiment assigned to a candidate's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    NoResponses,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::NoResponses => "No Responses",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            years_of_experience: 2,
            desired_position: Position::AiMlIntern,
            location: "London".to_string(),
            tech_stack: CandidateProfile::parse_tech_stack("Python, PyTorch"),
        }
    }

    #[test]
    fn test_parse_tech_stack_trims_and_drops_empty_entries() {
        let stack = CandidateProfile::parse_tech_stack(" Rust ,, Tokio, ,axum ");
        assert_eq!(stack, vec!["Rust", "Tokio", "axum"]);
        assert!(CandidateProfile::parse_tech_stack("").is_empty());
    }

    #[test]
    fn test_profile_summary_lists_every_field() {
        assert_eq!(
            profile().summary(),
            "Name: Ada Lovelace, Email: ada@example.com, Phone: 555-0100, Experience: 2, \
             Position: AI/ML Intern, Location: London, Tech Stack: Python, PyTorch"
        );
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("AI/ML Intern".parse::<Position>(), Ok(Position::AiMlIntern));
        assert_eq!(
            "Software Development Engineer (SDE) Intern".parse::<Position>(),
            Ok(Position::SdeIntern)
        );
        assert_eq!("sde_intern".parse::<Position>(), Ok(Position::SdeIntern));
        assert!("Janitor".parse::<Position>().is_err());
    }

    #[test]
    fn test_sentiment_label_display() {
        assert_eq!(SentimentLabel::NoResponses.to_string(), "No Responses");
        assert_eq!(format!("{}", SentimentLabel::Positive), "Positive");
    }
}
