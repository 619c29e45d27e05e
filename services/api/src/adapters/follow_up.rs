//! services/api/src/adapters/follow_up.rs
//!
//! This module contains the adapter that answers a candidate's open follow-up
//! questions. It implements the `FollowUpResponder` port from the `core` crate by
//! grounding the question with a web search before handing it to the LLM chain.

use crate::adapters::web_search::{format_hits, TavilySearchAdapter};
use async_trait::async_trait;
use hiring_assistant_core::{ConversationTurn, FollowUpResponder, PortResult, Responder};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

const FOLLOW_UP_INSTRUCTIONS: &str = r#"The candidate has finished the technical questions and is now asking you something.

Answer as the company's hiring assistant:
- Use the conversation above (company background, role descriptions, the candidate's details and answers) first.
- Use the WEB RESULTS below only when the question needs current or external information.
- If neither the conversation nor the results cover the question, say so plainly instead of guessing.
- Keep the answer conversational and a few sentences long."#;

static CITATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(\[[^\]]*\]\([^)]*\)\)").expect("citation pattern is valid")
});

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Answers follow-up questions with the responder chain, optionally grounded by web search.
#[derive(Clone)]
pub struct RetrievalFollowUpAdapter {
    responder: Arc<dyn Responder>,
    search: Option<TavilySearchAdapter>,
}

impl RetrievalFollowUpAdapter {
    /// Creates a new `RetrievalFollowUpAdapter`. Without a search adapter the
    /// answer relies on the transcript alone.
    pub fn new(responder: Arc<dyn Responder>, search: Option<TavilySearchAdapter>) -> Self {
        Self { responder, search }
    }

    async fn retrieve(&self, question: &str) -> Option<String> {
        let search = self.search.as_ref()?;
        match search.search(question).await {
            Ok(hits) if hits.is_empty() => None,
            Ok(hits) => Some(format_hits(&hits)),
            Err(e) => {
                warn!(error = %e, "Web search failed, answering without results");
                None
            }
        }
    }
}

/// Builds the final instruction for the responder from the question and any search results.
pub fn follow_up_instruction(question: &str, web_results: Option<&str>) -> String {
    let results = web_results.unwrap_or("(no web results)");
    format!("{FOLLOW_UP_INSTRUCTIONS}\n\nWEB RESULTS:\n---\n{results}\n---\n\nQUESTION:\n{question}")
}

/// Strips inline markdown citations like `([site](https://...))` from an answer.
pub fn remove_citations(text: &str) -> String {
    CITATION_REGEX.replace_all(text, "").trim().to_string()
}

//=========================================================================================
// `FollowUpResponder` Trait Implementation
//=========================================================================================

#[async_trait]
impl FollowUpResponder for RetrievalFollowUpAdapter {
    async fn answer(&self, question: &str, context: &[ConversationTurn]) -> PortResult<String> {
        let web_results = self.retrieve(question).await;
        info!(
            grounded = web_results.is_some(),
            "Answering follow-up question"
        );

        let instruction = follow_up_instruction(question, web_results.as_deref());
        let raw = self.responder.generate(&instruction, context).await?;
        Ok(remove_citations(&raw))
    }
}
