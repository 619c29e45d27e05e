//! crates/hiring_assistant_core/src/sentiment.rs
//!
//! Aggregates per-answer polarity into a single sentiment label.

use crate::domain::SentimentLabel;
use crate::ports::SentimentAnalyzer;

const POSITIVE_THRESHOLD: f64 = 0.1;
const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Scores a candidate's answers.
///
/// The mean polarity is unweighted by answer length. An empty slice yields
/// `NoResponses`, which is distinct from `Neutral`.
pub fn score<S: AsRef<str>>(responses: &[S], analyzer: &dyn SentimentAnalyzer) -> SentimentLabel {
    if responses.is_empty() {
        return SentimentLabel::NoResponses;
    }

    let total: f64 = responses
        .iter()
        .map(|r| analyzer.polarity(r.as_ref()).clamp(-1.0, 1.0))
        .sum();
    let average = total / responses.len() as f64;

    if average > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if average < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
