//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorResponse};
use crate::web::protocol::{
    AnswerRequest, CreateSessionResponse, EndConversationResponse, FollowUpRequest,
    FollowUpResponse, IntakeRequest, Phase, SessionStatusResponse, TranscriptResponse,
    TurnResponse, CLOSING_MESSAGE, WELCOME_MESSAGE,
};
use crate::web::state::{AppState, SessionHandle};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use hiring_assistant_core::CandidateProfile;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_session_handler,
        get_session_handler,
        delete_session_handler,
        submit_intake_handler,
        generate_questions_handler,
        submit_answer_handler,
        follow_up_handler,
        end_conversation_handler,
        transcript_handler,
    ),
    components(
        schemas(
            CreateSessionResponse,
            SessionStatusResponse,
            IntakeRequest,
            AnswerRequest,
            FollowUpRequest,
            FollowUpResponse,
            EndConversationResponse,
            TranscriptResponse,
            TurnResponse,
            Phase,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Hiring Assistant API", description = "API endpoints for the candidate interview chatbot.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Helpers
//=========================================================================================

async fn session_handle(app_state: &AppState, session_id: Uuid) -> Result<SessionHandle, ApiError> {
    app_state
        .sessions
        .get(session_id)
        .await
        .ok_or(ApiError::SessionNotFound(session_id))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Start a new interview session.
///
/// The session's transcript is seeded with the company and role context.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = CreateSessionResponse)
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = app_state.sessions.create(app_state.ports.clone()).await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            welcome: WELCOME_MESSAGE.to_string(),
        }),
    )
}

/// Get the current state of a session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    responses(
        (status = 200, description = "Current session state", body = SessionStatusResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let handle = session_handle(&app_state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionStatusResponse::from(&*session)))
}

/// Discard a session.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    responses(
        (status = 204, description = "Session removed"),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if app_state.sessions.remove(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(session_id))
    }
}

/// Submit the candidate details form.
///
/// Re-submitting discards any generated questions and collected answers.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/intake",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    request_body = IntakeRequest,
    responses(
        (status = 200, description = "Details recorded; ready to generate questions", body = SessionStatusResponse),
        (status = 400, description = "Invalid form values", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 409, description = "The conversation has ended", body = ErrorResponse)
    )
)]
pub async fn submit_intake_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<IntakeRequest>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let profile = CandidateProfile::try_from(payload)?;
    let handle = session_handle(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    session.submit_intake(profile)?;
    Ok(Json(SessionStatusResponse::from(&*session)))
}

/// Generate technical questions from the submitted tech stack.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/questions",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    responses(
        (status = 200, description = "Questions generated", body = SessionStatusResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 409, description = "No pending intake", body = ErrorResponse),
        (status = 502, description = "The language model failed; retry", body = ErrorResponse),
        (status = 504, description = "The language model timed out; retry", body = ErrorResponse)
    )
)]
pub async fn generate_questions_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let handle = session_handle(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    session.generate_questions(&app_state.call_control()).await?;
    Ok(Json(SessionStatusResponse::from(&*session)))
}

/// Answer the current question.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/answers",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "Answer recorded", body = SessionStatusResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 409, description = "Wrong question index or phase", body = ErrorResponse)
    )
)]
pub async fn submit_answer_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let handle = session_handle(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    session.submit_answer(payload.index, payload.text)?;
    Ok(Json(SessionStatusResponse::from(&*session)))
}

/// Ask a free-form question once all technical questions are answered.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/follow-ups",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    request_body = FollowUpRequest,
    responses(
        (status = 200, description = "Answer to the follow-up", body = FollowUpResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 409, description = "Questions are not finished yet", body = ErrorResponse),
        (status = 502, description = "The responder failed; retry", body = ErrorResponse)
    )
)]
pub async fn follow_up_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<FollowUpRequest>,
) -> Result<Json<FollowUpResponse>, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let handle = session_handle(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    let response = session
        .ask_follow_up(message, &app_state.call_control())
        .await?;
    Ok(Json(FollowUpResponse { response }))
}

/// End the conversation and receive the farewell with the sentiment summary.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/end",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    responses(
        (status = 200, description = "Conversation ended", body = EndConversationResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse),
        (status = 409, description = "Not started or already ended", body = ErrorResponse)
    )
)]
pub async fn end_conversation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<EndConversationResponse>, ApiError> {
    let handle = session_handle(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    let farewell = session.end_conversation()?;
    let sentiment = session
        .sentiment()
        .map(|s| s.to_string())
        .ok_or_else(|| ApiError::Internal("ended session has no sentiment".to_string()))?;

    info!(session_id = %session_id, sentiment = %sentiment, "Interview finished");
    Ok(Json(EndConversationResponse {
        farewell,
        sentiment,
        closing: CLOSING_MESSAGE.to_string(),
    }))
}

/// Get the full transcript of a session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/transcript",
    params(("session_id" = Uuid, Path, description = "The session id.")),
    responses(
        (status = 200, description = "Every turn in order", body = TranscriptResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn transcript_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let handle = session_handle(&app_state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(TranscriptResponse {
        session_id,
        turns: session.transcript().iter().map(TurnResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use hiring_assistant_core::{
        ConversationTurn, FollowUpResponder, PortError, PortResult, Responder, SentimentAnalyzer,
        SessionPorts,
    };
    use std::time::Duration;
    use tracing::Level;

    struct FixedResponder(PortResult<String>);

    #[async_trait]
    impl Responder for FixedResponder {
        async fn generate(&self, _: &str, _: &[ConversationTurn]) -> PortResult<String> {
            self.0.clone()
        }
    }

    struct EchoFollowUp;

    #[async_trait]
    impl FollowUpResponder for EchoFollowUp {
        async fn answer(&self, question: &str, _: &[ConversationTurn]) -> PortResult<String> {
            Ok(format!("You asked: {question}"))
        }
    }

    struct KeywordAnalyzer;

    impl SentimentAnalyzer for KeywordAnalyzer {
        fn polarity(&self, text: &str) -> f64 {
            if text.contains("great") { 0.8 } else { 0.0 }
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: Level::INFO,
            cors_origin: "http://localhost:3000".to_string(),
            groq_api_key: "test".to_string(),
            google_api_key: None,
            tavily_api_key: None,
            primary_model: "primary".to_string(),
            fallback_model: "fallback".to_string(),
            temperature: 0.8,
            llm_timeout: Duration::from_secs(5),
            llm_attempt_timeout: Duration::from_secs(2),
            search_max_results: 5,
            session_idle_ttl: Duration::from_secs(3600),
        }
    }

    fn app_state(responder: PortResult<String>) -> Arc<AppState> {
        let ports = SessionPorts {
            responder: Arc::new(FixedResponder(responder)),
            follow_up: Arc::new(EchoFollowUp),
            analyzer: Arc::new(KeywordAnalyzer),
        };
        Arc::new(AppState::new(Arc::new(test_config()), ports))
    }

    fn intake() -> IntakeRequest {
        IntakeRequest {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555".to_string(),
            years_of_experience: 1,
            desired_position: "SDE Intern".to_string(),
            location: "Pune".to_string(),
            tech_stack: "Rust, Tokio".to_string(),
        }
    }

    async fn new_session(state: &Arc<AppState>) -> Uuid {
        let (status, Json(body)) = create_session_handler(State(state.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        body.session_id
    }

    #[tokio::test]
    async fn test_full_interview_flow() {
        let state = app_state(Ok("Q1\nQ2".to_string()));
        let id = new_session(&state).await;

        let Json(status) = submit_intake_handler(State(state.clone()), Path(id), Json(intake()))
            .await
            .unwrap();
        assert_eq!(status.phase, Phase::Generating);

        let Json(status) = generate_questions_handler(State(state.clone()), Path(id))
            .await
            .unwrap();
        assert_eq!(status.questions, vec!["Q1", "Q2"]);
        assert_eq!(status.current_question.as_deref(), Some("Q1"));

        for (index, text) in ["great stuff", "it works"].into_iter().enumerate() {
            submit_answer_handler(
                State(state.clone()),
                Path(id),
                Json(AnswerRequest {
                    index,
                    text: text.to_string(),
                }),
            )
            .await
            .unwrap();
        }

        let Json(reply) = follow_up_handler(
            State(state.clone()),
            Path(id),
            Json(FollowUpRequest {
                message: "Is it remote?".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(reply.response, "You asked: Is it remote?");

        let Json(end) = end_conversation_handler(State(state.clone()), Path(id))
            .await
            .unwrap();
        // (0.8 + 0.0) / 2 = 0.4
        assert_eq!(end.sentiment, "Positive");
        assert!(end.farewell.contains("you seem: Positive"));
        assert_eq!(end.closing, CLOSING_MESSAGE);

        let Json(transcript) = transcript_handler(State(state.clone()), Path(id))
            .await
            .unwrap();
        // 5 seed + intake + 2 answers + placeholder + follow-up + farewell
        assert_eq!(transcript.turns.len(), 11);
        assert_eq!(transcript.turns[10].prompt, "End Conversation");
    }

    #[tokio::test]
    async fn test_out_of_order_answer_maps_to_conflict() {
        let state = app_state(Ok("Q1\nQ2".to_string()));
        let id = new_session(&state).await;
        submit_intake_handler(State(state.clone()), Path(id), Json(intake()))
            .await
            .unwrap();
        generate_questions_handler(State(state.clone()), Path(id))
            .await
            .unwrap();

        let err = submit_answer_handler(
            State(state.clone()),
            Path(id),
            Json(AnswerRequest {
                index: 1,
                text: "x".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_generation_failure_maps_to_bad_gateway_and_keeps_phase() {
        let state = app_state(Err(PortError::Unexpected("429".to_string())));
        let id = new_session(&state).await;
        submit_intake_handler(State(state.clone()), Path(id), Json(intake()))
            .await
            .unwrap();

        let err = generate_questions_handler(State(state.clone()), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let Json(status) = get_session_handler(State(state.clone()), Path(id))
            .await
            .unwrap();
        assert_eq!(status.phase, Phase::Generating);
        assert!(status.questions.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let state = app_state(Ok("Q1".to_string()));
        let err = get_session_handler(State(state.clone()), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session_removes_it() {
        let state = app_state(Ok("Q1".to_string()));
        let id = new_session(&state).await;

        let status = delete_session_handler(State(state.clone()), Path(id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.sessions.is_empty().await);

        let err = delete_session_handler(State(state.clone()), Path(id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_intake_is_bad_request() {
        let state = app_state(Ok("Q1".to_string()));
        let id = new_session(&state).await;
        let mut form = intake();
        form.desired_position = "Chef".to_string();

        let err = submit_intake_handler(State(state.clone()), Path(id), Json(form))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_generation() {
        let state = app_state(Ok("Q1".to_string()));
        let id = new_session(&state).await;
        submit_intake_handler(State(state.clone()), Path(id), Json(intake()))
            .await
            .unwrap();
        state.shutdown.cancel();

        let err = generate_questions_handler(State(state.clone()), Path(id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Session(hiring_assistant_core::SessionError::GenerationFailure(
                PortError::Cancelled
            ))
        ));
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/sessions",
            "/sessions/{session_id}",
            "/sessions/{session_id}/intake",
            "/sessions/{session_id}/questions",
            "/sessions/{session_id}/answers",
            "/sessions/{session_id}/follow-ups",
            "/sessions/{session_id}/end",
            "/sessions/{session_id}/transcript",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }
}
