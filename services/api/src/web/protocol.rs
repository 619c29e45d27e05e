//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server
//! for the hiring assistant.

use chrono::{DateTime, Utc};
use hiring_assistant_core::{
    CandidateProfile, ConversationTurn, InterviewSession, Position, SessionPhase,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

/// Highest value the intake form's experience slider allows.
pub const MAX_YEARS_OF_EXPERIENCE: u32 = 30;

pub const WELCOME_MESSAGE: &str = "Hello! Welcome to the Hiring Assistant Chatbot. \
I will guide you through the process of collecting your details, generating technical questions, \
and having a conversation with you to help with the hiring process.";

pub const CLOSING_MESSAGE: &str = "Thank you for using the Hiring Assistant Chatbot!";

//=========================================================================================
// Requests FROM the Client
//=========================================================================================

/// The candidate intake form.
#[derive(Deserialize, ToSchema, Debug)]
pub struct IntakeRequest {
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "+1 555 0100")]
    pub phone: String,
    #[schema(example = 1, maximum = 30)]
    pub years_of_experience: u32,
    #[schema(example = "AI/ML Intern")]
    pub desired_position: String,
    #[schema(example = "London")]
    pub location: String,
    /// Comma-separated list of technologies.
    #[schema(example = "Python, PyTorch, Git")]
    pub tech_stack: String,
}

impl TryFrom<IntakeRequest> for CandidateProfile {
    type Error = ApiError;

    fn try_from(form: IntakeRequest) -> Result<Self, Self::Error> {
        if form.years_of_experience > MAX_YEARS_OF_EXPERIENCE {
            return Err(ApiError::BadRequest(format!(
                "years_of_experience must be between 0 and {MAX_YEARS_OF_EXPERIENCE}"
            )));
        }
        let desired_position = form
            .desired_position
            .parse::<Position>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(CandidateProfile {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            years_of_experience: form.years_of_experience,
            desired_position,
            location: form.location.trim().to_string(),
            tech_stack: CandidateProfile::parse_tech_stack(&form.tech_stack),
        })
    }
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct AnswerRequest {
    /// Zero-based index of the question being answered.
    pub index: usize,
    pub text: String,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct FollowUpRequest {
    #[schema(example = "What does the mentoring look like?")]
    pub message: String,
}

//=========================================================================================
// Responses FROM the Server
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intake,
    Generating,
    Answering,
    OpenFollowUp,
    Ended,
}

impl From<SessionPhase> for Phase {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Intake => Phase::Intake,
            SessionPhase::Generating => Phase::Generating,
            SessionPhase::Answering => Phase::Answering,
            SessionPhase::OpenFollowUp => Phase::OpenFollowUp,
            SessionPhase::Ended => Phase::Ended,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub welcome: String,
}

/// A snapshot of where a session stands.
#[derive(Serialize, ToSchema, Debug)]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub questions: Vec<String>,
    pub current_index: usize,
    pub current_question: Option<String>,
    pub answers_count: usize,
    pub ended: bool,
    pub sentiment: Option<String>,
}

impl From<&InterviewSession> for SessionStatusResponse {
    fn from(session: &InterviewSession) -> Self {
        Self {
            session_id: session.id(),
            phase: session.phase().into(),
            questions: session.questions().to_vec(),
            current_index: session.current_index(),
            current_question: session.current_question().map(str::to_string),
            answers_count: session.answers().len(),
            ended: session.is_ended(),
            sentiment: session.sentiment().map(|s| s.to_string()),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct FollowUpResponse {
    pub response: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct EndConversationResponse {
    pub farewell: String,
    pub sentiment: String,
    pub closing: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct TurnResponse {
    pub prompt: String,
    pub response: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<&ConversationTurn> for TurnResponse {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            prompt: turn.prompt.clone(),
            response: turn.response.clone(),
            recorded_at: turn.recorded_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub turns: Vec<TurnResponse>,
}
