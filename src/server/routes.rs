//! HTTP route handlers for the retirement coach API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coach::core::message::Message;
use crate::coach::core::profile::UserProfile;
use crate::coach::engine::{GenerationAttempt, ReplySource};

use super::state::AppState;

type ApiError = (StatusCode, String);

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/prompts", get(suggested_prompts))
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/{id}",
            get(get_session).delete(clear_session),
        )
        .route("/api/sessions/{id}/profile", put(update_profile))
        .route("/api/chat", post(chat))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "retirechat",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// A quick-start prompt offered on an empty chat.
#[derive(Debug, Serialize)]
pub struct SuggestedPrompt {
    /// Short button label.
    pub title: &'static str,
    /// Text sent as the user's message.
    pub prompt: &'static str,
}

/// Quick-start prompts, in display order.
pub const SUGGESTED_PROMPTS: &[SuggestedPrompt] = &[
    SuggestedPrompt {
        title: "Retirement Development Plan",
        prompt: "Help me build a long-term retirement plan with clear milestones.",
    },
    SuggestedPrompt {
        title: "Skill Gap Analysis",
        prompt: "Which skills should I develop to grow my income before retirement?",
    },
    SuggestedPrompt {
        title: "Learning Opportunities",
        prompt: "What courses or certifications would improve my financial knowledge?",
    },
    SuggestedPrompt {
        title: "Financial Assessment",
        prompt: "Can you review my savings and tell me if I'm on track for retirement?",
    },
];

async fn suggested_prompts() -> Json<&'static [SuggestedPrompt]> {
    Json(SUGGESTED_PROMPTS)
}

/// Session summary returned on creation.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    /// New session id.
    pub session_id: Uuid,
}

async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.create_session();
    tracing::info!(%session_id, "session created");
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// Session contents.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// Session id.
    pub session_id: Uuid,
    /// Every message exchanged.
    pub transcript: Vec<Message>,
    /// Current profile.
    pub profile: UserProfile,
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.snapshot(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(SessionView {
        session_id: session.id,
        transcript: session.transcript,
        profile: session.profile,
    }))
}

async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
    session.clear();
    tracing::info!(session_id = %id, "session cleared");
    Ok(StatusCode::NO_CONTENT)
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UserProfile>, ApiError> {
    let mut session = state.sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
    session.set_profile(profile);
    Ok(Json(session.profile.clone()))
}

/// Chat turn request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Existing session; a new one is created when absent.
    pub session_id: Option<Uuid>,
    /// The user's message.
    pub message: String,
}

/// Chat turn response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Session the turn was recorded in.
    pub session_id: Uuid,
    /// Text to display.
    pub response: String,
    /// Where the text came from.
    pub source: ReplySource,
    /// Remote attempts made for this turn.
    pub attempts: Vec<GenerationAttempt>,
}

/// Handle one chat turn.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = validate_message(&request.message)?;

    let session_id = match request.session_id {
        Some(id) => id,
        None => state.create_session(),
    };
    let session = state.snapshot(&session_id).ok_or_else(|| not_found(session_id))?;
    let epoch = session.epoch();

    let orchestrator = Arc::clone(&state.orchestrator);
    let input = message.clone();
    let reply = tokio::task::spawn_blocking(move || {
        orchestrator.generate_reply(&input, &session.history, session.profile_ref())
    })
    .await
    .map_err(|e| {
        tracing::error!("chat worker failed: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Chat worker failed".to_string())
    })?;

    if !state.record_turn(&session_id, epoch, &message, &reply.text) {
        tracing::warn!(%session_id, "session cleared or expired during the turn, reply not recorded");
    }

    tracing::info!(
        %session_id,
        attempts = reply.attempts.len(),
        "turn completed"
    );

    Ok(Json(ChatResponse {
        session_id,
        response: reply.text,
        source: reply.source,
        attempts: reply.attempts,
    }))
}

fn validate_message(message: &str) -> Result<String, ApiError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

fn not_found(id: Uuid) -> ApiError {
    (StatusCode::NOT_FOUND, format!("Unknown session: {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::core::config::{CoachConfig, RetryConfig};
    use crate::coach::engine::CoachOrchestrator;
    use crate::llm::error::LlmError;
    use crate::llm::scripted::{ScriptedGenerator, ok};
    use crate::llm::types::GenerationResult;

    fn app(script: Vec<Result<GenerationResult, LlmError>>) -> (Arc<AppState>, Arc<ScriptedGenerator>) {
        let generator = ScriptedGenerator::new(script);
        let config = CoachConfig::default().with_retry(RetryConfig::default().without_delay());
        let coach = CoachOrchestrator::new(config, generator.clone()).unwrap();
        (AppState::new(Arc::new(coach)), generator)
    }

    fn turn(session_id: Option<Uuid>, message: &str) -> Json<ChatRequest> {
        Json(ChatRequest {
            session_id,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_blank_message_rejected() {
        let err = validate_message("   \n").unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_message_trimmed() {
        assert_eq!(validate_message("  hi there ").unwrap(), "hi there");
    }

    #[test]
    fn test_four_suggested_prompts() {
        assert_eq!(SUGGESTED_PROMPTS.len(), 4);
        assert!(SUGGESTED_PROMPTS.iter().all(|p| !p.prompt.is_empty()));
    }

    #[test]
    fn test_chat_request_session_optional() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert!(request.session_id.is_none());
        assert_eq!(request.message, "hello");
    }

    #[tokio::test]
    async fn test_chat_creates_session_and_records_turn() {
        let (state, generator) = app(vec![ok("Save 15% of your pay.")]);

        let Json(response) = chat(State(Arc::clone(&state)), turn(None, "  How much should I save? "))
            .await
            .unwrap();

        assert_eq!(response.response, "Save 15% of your pay.");
        assert_eq!(response.source, ReplySource::Model { attempt: 1 });
        assert_eq!(generator.calls(), 1);

        let session = state.snapshot(&response.session_id).unwrap();
        assert_eq!(session.transcript.len(), 2);
        assert_eq!(session.transcript[0].content(), "How much should I save?");
        assert_eq!(session.transcript[1].content(), "Save 15% of your pay.");
    }

    #[tokio::test]
    async fn test_chat_sends_session_history_and_profile() {
        let (state, generator) = app(vec![ok("Nice to meet you."), ok("Aim for 15%.")]);
        let id = state.create_session();

        let profile = UserProfile {
            age: Some(30),
            ..UserProfile::default()
        };
        let _ = update_profile(State(Arc::clone(&state)), Path(id), Json(profile))
            .await
            .unwrap();

        let _ = chat(State(Arc::clone(&state)), turn(Some(id), "hello"))
            .await
            .unwrap();
        let _ = chat(State(Arc::clone(&state)), turn(Some(id), "How much should I save?"))
            .await
            .unwrap();

        let prompt = generator.request(1).prompt;
        assert!(prompt.contains("Profile: Age: 30"));
        assert!(prompt.contains("User: hello\n"));
        assert!(prompt.contains("Assistant: Nice to meet you.\n"));
        assert!(prompt.ends_with("User: How much should I save?\nAssistant:"));
        assert_eq!(state.snapshot(&id).unwrap().transcript.len(), 4);
    }

    #[tokio::test]
    async fn test_chat_unknown_session_is_not_found() {
        let (state, generator) = app(Vec::new());

        let err = chat(State(state), turn(Some(Uuid::new_v4()), "hello"))
            .await
            .unwrap_err();

        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_blank_message_is_bad_request() {
        let (state, generator) = app(Vec::new());

        let err = chat(State(Arc::clone(&state)), turn(None, "   "))
            .await
            .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(generator.calls(), 0);
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_profile_update_replaces_whole_profile() {
        let (state, _generator) = app(Vec::new());
        let id = state.create_session();

        let first = UserProfile {
            age: Some(30),
            annual_income: Some("$50,000 - $75,000".to_string()),
            ..UserProfile::default()
        };
        let _ = update_profile(State(Arc::clone(&state)), Path(id), Json(first))
            .await
            .unwrap();

        let second = UserProfile {
            target_retirement_age: Some(60),
            ..UserProfile::default()
        };
        let Json(stored) = update_profile(State(Arc::clone(&state)), Path(id), Json(second))
            .await
            .unwrap();

        assert_eq!(stored.target_retirement_age, Some(60));
        assert_eq!(stored.age, None);
        assert_eq!(stored.annual_income, None);
        assert_eq!(state.snapshot(&id).unwrap().profile, stored);
    }

    #[tokio::test]
    async fn test_delete_clears_session() {
        let (state, _generator) = app(vec![ok("Hello!")]);

        let Json(response) = chat(State(Arc::clone(&state)), turn(None, "hi"))
            .await
            .unwrap();
        let id = response.session_id;

        let status = clear_session(State(Arc::clone(&state)), Path(id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(view) = get_session(State(Arc::clone(&state)), Path(id))
            .await
            .unwrap();
        assert!(view.transcript.is_empty());
        assert!(view.profile.is_empty());

        let missing = clear_session(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(missing.0, StatusCode::NOT_FOUND);
    }
}
