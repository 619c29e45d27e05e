//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        ChatLlmAdapter, VaderSentimentAdapter, RetrievalFollowUpAdapter, TavilySearchAdapter,
    },
    config::Config,
    error::ApiError,
    web::{
        rest::{
            create_session_handler, delete_session_handler, end_conversation_handler,
            follow_up_handler, generate_questions_handler, get_session_handler,
            submit_answer_handler, submit_intake_handler, transcript_handler,
        },
        spawn_idle_sweeper, ApiDoc, AppState,
    },
};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::{
    routing::{get, post},
    Router,
};
use hiring_assistant_core::{FallbackResponder, Responder, SessionPorts};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let primary: Arc<dyn Responder> = Arc::new(ChatLlmAdapter::groq(
        &config.groq_api_key,
        config.primary_model.clone(),
        config.temperature,
    ));
    let mut responder = FallbackResponder::new(format!("groq/{}", config.primary_model), primary)
        .with_attempt_timeout(config.llm_attempt_timeout);
    match config.google_api_key.as_deref() {
        Some(key) => {
            responder = responder.with_fallback(
                format!("gemini/{}", config.fallback_model),
                Arc::new(ChatLlmAdapter::gemini(
                    key,
                    config.fallback_model.clone(),
                    config.temperature,
                )),
            );
        }
        None => warn!("GOOGLE_API_KEY is not set; running without a fallback model"),
    }
    info!(chain = ?responder.names(), "Responder chain ready");
    let responder: Arc<dyn Responder> = Arc::new(responder);

    let search = match config.tavily_api_key.clone() {
        Some(key) => Some(TavilySearchAdapter::new(
            reqwest::Client::new(),
            key,
            config.search_max_results,
        )),
        None => {
            warn!("TAVILY_API_KEY is not set; follow-ups will be answered without web search");
            None
        }
    };

    let ports = SessionPorts {
        responder: responder.clone(),
        follow_up: Arc::new(RetrievalFollowUpAdapter::new(responder, search)),
        analyzer: Arc::new(VaderSentimentAdapter::new()),
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(config.clone(), ports));
    let sweeper = spawn_idle_sweeper(
        app_state.sessions.clone(),
        config.session_idle_ttl,
        app_state.shutdown.clone(),
    );

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{session_id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{session_id}/intake", post(submit_intake_handler))
        .route(
            "/sessions/{session_id}/questions",
            post(generate_questions_handler),
        )
        .route("/sessions/{session_id}/answers", post(submit_answer_handler))
        .route("/sessions/{session_id}/follow-ups", post(follow_up_handler))
        .route("/sessions/{session_id}/end", post(end_conversation_handler))
        .route("/sessions/{session_id}/transcript", get(transcript_handler))
        .layer(cors)
        .with_state(app_state.clone());

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(app_state.shutdown.clone()))
        .await?;

    if let Err(e) = sweeper.await {
        warn!(error = %e, "Idle session sweeper ended abnormally");
    }
    info!("Server stopped");
    Ok(())
}

/// Waits for Ctrl+C, then cancels every in-flight model and search call.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
