//! crates/hiring_assistant_core/src/session.rs
//!
//! The interview-session state machine.
//!
//! A session moves from candidate intake, through question generation and
//! sequential answer collection, into open follow-up, and finally ends with a
//! sentiment summary. Answers are accepted strictly in order, and follow-up
//! questions are only accepted once every generated question has an answer.
//! Text generation and follow-up answering are delegated to the ports in
//! [`SessionPorts`].

use crate::domain::{CandidateProfile, ConversationTurn, SentimentLabel};
use crate::ports::{FollowUpResponder, PortError, PortResult, Responder, SentimentAnalyzer};
use crate::sentiment;
use crate::transcript::ConversationLog;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

const QUESTION_INSTRUCTIONS: &str = "You are a expert interviewer taking an online interview of a candidate.
Based on the tech-stack provided generate 3-5 questions, which are generally asked in every interviewer to assess the candidate's proficiency.
Do not write anything else than the questions.";

/// Response recorded while a follow-up answer is still being produced.
pub const FOLLOW_UP_PLACEHOLDER: &str = "Processing your message...";

pub const INTAKE_PROMPT: &str = "Candidate Details";
pub const END_PROMPT: &str = "End Conversation";

//=========================================================================================
// Errors
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The operation is not valid in the current phase or with these arguments.
    /// Nothing was mutated.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Question generation failed: {0}")]
    GenerationFailure(PortError),
    #[error("Follow-up failed: {0}")]
    FollowUpFailure(PortError),
}

pub type SessionResult<T> = Result<T, SessionError>;

//=========================================================================================
// Phases, Ports and Call Control
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Intake,
    Generating,
    Answering,
    OpenFollowUp,
    Ended,
}

/// The collaborators a session delegates to.
#[derive(Clone)]
pub struct SessionPorts {
    pub responder: Arc<dyn Responder>,
    pub follow_up: Arc<dyn FollowUpResponder>,
    pub analyzer: Arc<dyn SentimentAnalyzer>,
}

/// Deadline and cancellation for a single collaborator call.
///
/// When either fires the call is abandoned and the session keeps its pre-call phase.
#[derive(Debug, Clone)]
pub struct CallControl {
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
}

impl Default for CallControl {
    fn default() -> Self {
        Self {
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl CallControl {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }

    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    async fn run<T, F>(&self, call: F) -> PortResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(PortError::Timeout(limit)),
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PortError::Cancelled),
            result = bounded => result,
        }
    }
}

//=========================================================================================
// The Session
//=========================================================================================

pub struct InterviewSession {
    id: Uuid,
    ports: SessionPorts,
    phase: SessionPhase,
    profile: Option<CandidateProfile>,
    questions: Vec<String>,
    current_index: usize,
    answers: Vec<String>,
    sentiment: Option<SentimentLabel>,
    log: ConversationLog,
}

impl InterviewSession {
    /// Creates a session whose transcript starts with the default company context.
    pub fn new(id: Uuid, ports: SessionPorts) -> Self {
        Self::with_log(id, ports, ConversationLog::seeded())
    }

    pub fn with_log(id: Uuid, ports: SessionPorts, log: ConversationLog) -> Self {
        Self {
            id,
            ports,
            phase: SessionPhase::Intake,
            profile: None,
            questions: Vec::new(),
            current_index: 0,
            answers: Vec::new(),
            sentiment: None,
            log,
        }
    }

    // --- Transitions ---

    /// Records the candidate's details and readies the session for question generation.
    ///
    /// Re-submitting later discards the current questions and answers but keeps the transcript.
    pub fn submit_intake(&mut self, profile: CandidateProfile) -> SessionResult<()> {
        if self.phase == SessionPhase::Ended {
            return Err(SessionError::InvalidTransition(
                "the conversation has already ended".to_string(),
            ));
        }

        info!(session_id = %self.id, position = %profile.desired_position, "Candidate details submitted");
        self.log.append(INTAKE_PROMPT, profile.summary());
        self.profile = Some(profile);
        self.questions.clear();
        self.answers.clear();
        self.current_index = 0;
        self.phase = SessionPhase::Generating;
        Ok(())
    }

    /// Asks the responder for interview questions, one per line of its output.
    ///
    /// On failure the session stays in `Generating` with no questions, ready for a retry.
    pub async fn generate_questions(&mut self, control: &CallControl) -> SessionResult<()> {
        if self.phase != SessionPhase::Generating {
            return Err(self.wrong_phase("generate questions"));
        }
        let profile = self.profile.as_ref().ok_or_else(|| {
            SessionError::InvalidTransition("no candidate details have been submitted".to_string())
        })?;

        let instruction = question_instruction(profile);
        let raw = control
            .run(self.ports.responder.generate(&instruction, self.log.turns()))
            .await
            .map_err(|e| {
                warn!(session_id = %self.id, error = %e, "Question generation failed");
                SessionError::GenerationFailure(e)
            })?;

        self.questions = split_questions(&raw);
        self.current_index = 0;
        self.answers.clear();
        self.phase = SessionPhase::Answering;
        info!(session_id = %self.id, count = self.questions.len(), "Questions generated");

        if self.questions.is_empty() {
            self.phase = SessionPhase::OpenFollowUp;
        }
        Ok(())
    }

    /// Records the answer to the question at `index`, which must be the current one.
    pub fn submit_answer(&mut self, index: usize, text: impl Into<String>) -> SessionResult<()> {
        if self.phase != SessionPhase::Answering {
            return Err(self.wrong_phase("submit an answer"));
        }
        if index >= self.questions.len() {
            return Err(SessionError::InvalidTransition(format!(
                "question index {index} is out of range (0..{})",
                self.questions.len()
            )));
        }
        if index != self.current_index {
            return Err(SessionError::InvalidTransition(format!(
                "expected an answer to question {}, got {index}",
                self.current_index
            )));
        }

        let text = text.into();
        self.log.append(self.questions[index].clone(), text.clone());
        self.answers.push(text);
        self.current_index += 1;

        if self.current_index == self.questions.len() {
            info!(session_id = %self.id, "All questions answered");
            self.phase = SessionPhase::OpenFollowUp;
        }
        Ok(())
    }

    /// Answers a free-form candidate question with the full transcript as context.
    ///
    /// A placeholder turn is logged before the call and stays in the transcript if
    /// the call fails; the answer is logged as a second turn.
    pub async fn ask_follow_up(
        &mut self,
        text: &str,
        control: &CallControl,
    ) -> SessionResult<String> {
        if self.phase != SessionPhase::OpenFollowUp {
            return Err(self.wrong_phase("ask a follow-up question"));
        }

        self.log.append(text, FOLLOW_UP_PLACEHOLDER);
        let response = control
            .run(self.ports.follow_up.answer(text, self.log.turns()))
            .await
            .map_err(|e| {
                warn!(session_id = %self.id, error = %e, "Follow-up failed");
                SessionError::FollowUpFailure(e)
            })?;

        self.log.append(text, response.clone());
        Ok(response)
    }

    /// Scores the answers, records the farewell and freezes the session.
    pub fn end_conversation(&mut self) -> SessionResult<String> {
        match self.phase {
            SessionPhase::Answering | SessionPhase::OpenFollowUp => {}
            SessionPhase::Ended => {
                return Err(SessionError::InvalidTransition(
                    "the conversation has already ended".to_string(),
                ))
            }
            _ => return Err(self.wrong_phase("end the conversation")),
        }

        let label = sentiment::score(self.answers.as_slice(), self.ports.analyzer.as_ref());
        let farewell = farewell_message(label);
        self.log.append(END_PROMPT, farewell.clone());
        self.sentiment = Some(label);
        self.phase = SessionPhase::Ended;
        info!(session_id = %self.id, sentiment = %label, "Conversation ended");
        Ok(farewell)
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn profile(&self) -> Option<&CandidateProfile> {
        self.profile.as_ref()
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question awaiting an answer, if the session is collecting answers.
    pub fn current_question(&self) -> Option<&str> {
        if self.phase != SessionPhase::Answering {
            return None;
        }
        self.questions.get(self.current_index).map(String::as_str)
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        self.log.turns()
    }

    /// The label computed when the conversation ended.
    pub fn sentiment(&self) -> Option<SentimentLabel> {
        self.sentiment
    }

    fn wrong_phase(&self, action: &str) -> SessionError {
        SessionError::InvalidTransition(format!(
            "cannot {action} while the session is in {:?}",
            self.phase
        ))
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn question_instruction(profile: &CandidateProfile) -> String {
    format!(
        "{QUESTION_INSTRUCTIONS}\n\nDesired position: {}\nTech stack: {}",
        profile.desired_position,
        profile.tech_stack.join(", ")
    )
}

/// Splits raw responder output into questions, one per line.
///
/// Only surrounding whitespace is trimmed. Blank lines and numbering inside the
/// output are kept as-is.
pub fn split_questions(raw: &str) -> Vec<String> {
    raw.trim().lines().map(str::to_string).collect()
}

pub fn farewell_message(label: SentimentLabel) -> String {
    format!(
        "Thank you for your time! It was great speaking with you. \
         We'll review your responses and get back to you soon.\n\n\
         Analysis of your responses suggests you seem: {label}\n\n\
         Have a wonderful day!"
    )
}
