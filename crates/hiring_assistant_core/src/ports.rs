//! crates/hiring_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) the interview session depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete language-model, search and sentiment backends.

use crate::domain::ConversationTurn;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, auth).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("The call did not complete within {0:?}")]
    Timeout(std::time::Duration),
    #[error("The call was cancelled")]
    Cancelled,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Generates text (interview questions) from an instruction and the transcript so far.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Responder: Send + Sync {
    async fn generate(&self, instruction: &str, context: &[ConversationTurn]) -> PortResult<String>;
}

/// Answers an open-ended candidate question, possibly grounding it with external retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowUpResponder: Send + Sync {
    async fn answer(&self, question: &str, context: &[ConversationTurn]) -> PortResult<String>;
}

/// Computes a polarity score in `[-1.0, 1.0]` for a piece of text.
///
/// Implementations must be total: text they cannot analyze scores `0.0`.
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}
