//! crates/hiring_assistant_core/src/fallback.rs
//!
//! A `Responder` that routes each request through several responders in
//! priority order, returning the first success.

use crate::domain::ConversationTurn;
use crate::ports::{PortError, PortResult, Responder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Tries each named responder in the order given.
///
/// Fails only when every responder has failed; the error names every attempt.
/// With an attempt timeout, a responder that stalls counts as failed once the
/// timeout elapses and the next one is tried.
pub struct FallbackResponder {
    responders: Vec<(String, Arc<dyn Responder>)>,
    attempt_timeout: Option<Duration>,
}

impl FallbackResponder {
    pub fn new(primary_name: impl Into<String>, primary: Arc<dyn Responder>) -> Self {
        Self {
            responders: vec![(primary_name.into(), primary)],
            attempt_timeout: None,
        }
    }

    /// Appends a lower-priority responder to the chain.
    pub fn with_fallback(mut self, name: impl Into<String>, responder: Arc<dyn Responder>) -> Self {
        self.responders.push((name.into(), responder));
        self
    }

    /// Bounds each individual attempt.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.responders.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[async_trait]
impl Responder for FallbackResponder {
    async fn generate(&self, instruction: &str, context: &[ConversationTurn]) -> PortResult<String> {
        let mut failures = Vec::with_capacity(self.responders.len());

        for (position, (name, responder)) in self.responders.iter().enumerate() {
            let attempt = responder.generate(instruction, context);
            let result = match self.attempt_timeout {
                Some(limit) => match tokio::time::timeout(limit, attempt).await {
                    Ok(result) => result,
                    Err(_) => Err(PortError::Timeout(limit)),
                },
                None => attempt.await,
            };

            match result {
                Ok(text) => {
                    if position > 0 {
                        warn!(provider = %name, "Failover occurred, request served by fallback");
                    } else {
                        debug!(provider = %name, "Request served by primary");
                    }
                    return Ok(text);
                }
                Err(e) => {
                    warn!(provider = %name, error = %e, "Responder failed, trying next in chain");
                    failures.push(format!("{name}: {e}"));
                }
            }
        }

        Err(PortError::Unexpected(format!(
            "All responders failed ({})",
            failures.join("; ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockResponder;

    struct Stalled;

    #[async_trait]
    impl Responder for Stalled {
        async fn generate(&self, _: &str, _: &[ConversationTurn]) -> PortResult<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    fn ok(text: &'static str) -> Arc<dyn Responder> {
        let mut mock = MockResponder::new();
        mock.expect_generate()
            .returning(move |_, _| Ok(text.to_string()));
        Arc::new(mock)
    }

    fn failing(reason: &'static str) -> Arc<dyn Responder> {
        let mut mock = MockResponder::new();
        mock.expect_generate()
            .times(1)
            .returning(move |_, _| Err(PortError::Unexpected(reason.to_string())));
        Arc::new(mock)
    }

    fn never_called() -> Arc<dyn Responder> {
        let mut mock = MockResponder::new();
        mock.expect_generate().never();
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let chain = FallbackResponder::new("groq", ok("from primary"))
            .with_fallback("gemini", never_called());

        let out = chain.generate("ask", &[]).await;
        assert_eq!(out, Ok("from primary".to_string()));
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let chain = FallbackResponder::new("groq", failing("rate limited"))
            .with_fallback("gemini", ok("from fallback"));

        let out = chain.generate("ask", &[]).await;
        assert_eq!(out, Ok("from fallback".to_string()));
        assert_eq!(chain.names(), vec!["groq", "gemini"]);
    }

    #[tokio::test]
    async fn test_all_failures_surface_every_attempt() {
        let chain = FallbackResponder::new("groq", failing("rate limited"))
            .with_fallback("gemini", failing("bad key"));

        let err = chain.generate("ask", &[]).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("groq: An unexpected error occurred: rate limited"));
        assert!(message.contains("gemini: An unexpected error occurred: bad key"));
    }

    #[tokio::test]
    async fn test_stalled_primary_times_out_and_falls_back() {
        let chain = FallbackResponder::new("groq", Arc::new(Stalled))
            .with_fallback("gemini", ok("Q1\nQ2"))
            .with_attempt_timeout(Duration::from_millis(50));

        let out = tokio::time::timeout(Duration::from_secs(5), chain.generate("ask", &[]))
            .await
            .expect("the chain should not wait for the stalled primary");
        assert_eq!(out, Ok("Q1\nQ2".to_string()));
    }

    #[tokio::test]
    async fn test_every_attempt_stalling_reports_each_timeout() {
        let chain = FallbackResponder::new("groq", Arc::new(Stalled))
            .with_fallback("gemini", Arc::new(Stalled))
            .with_attempt_timeout(Duration::from_millis(20));

        let err = chain.generate("ask", &[]).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("groq: The call did not complete within 20ms"));
        assert!(message.contains("gemini: The call did not complete within 20ms"));
    }
}
