//! services/api/src/adapters/sentiment.rs
//!
//! Implements the `SentimentAnalyzer` port with the VADER lexicon analyzer.
//! The text's polarity is VADER's compound score, which already lies in `[-1.0, 1.0]`
//! and handles negation, intensifiers and punctuation emphasis.

use hiring_assistant_core::SentimentAnalyzer;
use vader_sentiment::SentimentIntensityAnalyzer;

const COMPOUND: &str = "compound";

#[derive(Debug, Clone, Copy, Default)]
pub struct VaderSentimentAdapter;

impl VaderSentimentAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentAnalyzer for VaderSentimentAdapter {
    fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        // The analyzer only borrows the crate's static lexicons.
        SentimentIntensityAnalyzer::new()
            .polarity_scores(text)
            .get(COMPOUND)
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}
