//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for any OpenAI-compatible chat-completion LLM.
//! It implements the `Responder` port from the `core` crate. Groq and Gemini are
//! both reached through this adapter by pointing it at their compatible endpoints.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    },
    Client,
};
use async_trait::async_trait;
use hiring_assistant_core::{ConversationTurn, PortError, PortResult, Responder};
use tracing::debug;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

const SYSTEM_PREAMBLE: &str = "You are the hiring assistant of the company described in the conversation. \
The conversation so far holds the company background, the open roles and everything the candidate has shared.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `Responder` using an OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct ChatLlmAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl ChatLlmAdapter {
    /// Creates a new `ChatLlmAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, temperature: f32) -> Self {
        Self {
            client,
            model,
            temperature,
        }
    }

    /// Creates an adapter for the Groq endpoint.
    pub fn groq(api_key: &str, model: String, temperature: f32) -> Self {
        Self::new(compatible_client(GROQ_BASE_URL, api_key), model, temperature)
    }

    /// Creates an adapter for Gemini's OpenAI-compatible endpoint.
    pub fn gemini(api_key: &str, model: String, temperature: f32) -> Self {
        Self::new(compatible_client(GEMINI_BASE_URL, api_key), model, temperature)
    }
}

fn compatible_client(base_url: &str, api_key: &str) -> Client<OpenAIConfig> {
    Client::with_config(
        OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url),
    )
}

/// Maps the transcript to alternating user/assistant messages, framed by the
/// system preamble and followed by the instruction as the final user message.
pub fn build_messages(
    instruction: &str,
    context: &[ConversationTurn],
) -> Vec<ChatCompletionRequestMessage> {
    let mut messages = Vec::with_capacity(context.len() * 2 + 2);
    messages.push(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessage {
            content: ChatCompletionRequestSystemMessageContent::Text(SYSTEM_PREAMBLE.to_string()),
            name: None,
        },
    ));

    for turn in context {
        messages.push(user_message(&turn.prompt));
        messages.push(assistant_message(&turn.response));
    }

    messages.push(user_message(instruction));
    messages
}

fn user_message(text: &str) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
        content: ChatCompletionRequestUserMessageContent::Text(text.to_string()),
        name: None,
    })
}

fn assistant_message(text: &str) -> ChatCompletionRequestMessage {
    #[allow(deprecated)]
    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
            text.to_string(),
        )),
        refusal: None,
        name: None,
        audio: None,
        tool_calls: None,
        function_call: None,
    })
}

//=========================================================================================
// `Responder` Trait Implementation
//=========================================================================================

#[async_trait]
impl Responder for ChatLlmAdapter {
    /// Sends the transcript and instruction as one chat completion and returns the text.
    async fn generate(&self, instruction: &str, context: &[ConversationTurn]) -> PortResult<String> {
        let request = CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(instruction, context),
            temperature: Some(self.temperature),
            ..Default::default()
        };

        debug!(model = %self.model, turns = context.len(), "Sending chat completion");

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(format!(
                    "Model '{}' returned no text content in its response.",
                    self.model
                ))
            })
    }
}
