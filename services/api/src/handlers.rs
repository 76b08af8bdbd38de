//! Axum Handlers for the REST API
//!
//! Two families of endpoints drive the same scheduler:
//!
//! - `/api/start-debate` and `/api/generate-next-turn` are stateless; the
//!   client holds the transcript and sends it back on every advance.
//! - `/api/debates/...` keeps sessions in the in-memory store.
//!
//! `utoipa` doc comments generate the OpenAPI documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use debate_core::{DebateError, DebateSession, ErrorKind};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    models::{
        AdvanceResponse, ApiErrorKind, DebateView, ErrorResponse, NextTurnPayload,
        NextTurnResponse, StartDebateResponse, TopicPayload, TurnView, turn_views,
    },
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    Debate(DebateError),
    NotFound(Uuid),
    Busy(Uuid),
}

impl From<DebateError> for ApiError {
    fn from(err: DebateError) -> Self {
        Self::Debate(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Debate(err) => match err.kind() {
                ErrorKind::InvalidInput | ErrorKind::NotInitialized => StatusCode::BAD_REQUEST,
                ErrorKind::AgentFailure => StatusCode::BAD_GATEWAY,
                ErrorKind::InvariantViolation => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Busy(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Debate(err) => {
                match &err {
                    DebateError::Invariant(breach) => {
                        error!(error = %breach, "History invariant violated")
                    }
                    DebateError::Agent { failure, .. } => {
                        warn!(agent = %failure.agent, error = %failure, "Agent call failed")
                    }
                    _ => {}
                }
                let produced_turns = match &err {
                    DebateError::Agent { produced, .. } => turn_views(produced),
                    _ => Vec::new(),
                };
                ErrorResponse {
                    kind: err.kind().into(),
                    error: err.to_string(),
                    produced_turns,
                }
            }
            ApiError::NotFound(id) => ErrorResponse {
                kind: ApiErrorKind::NotFound,
                error: format!("Debate with id '{}' not found", id),
                produced_turns: Vec::new(),
            },
            ApiError::Busy(id) => ErrorResponse {
                kind: ApiErrorKind::Busy,
                error: format!("Debate '{}' is already advancing; try again shortly", id),
                produced_turns: Vec::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Start a debate and return the opener's first statement.
#[utoipa::path(
    post,
    path = "/api/start-debate",
    request_body = TopicPayload,
    responses(
        (status = 200, description = "Opening statement generated", body = StartDebateResponse),
        (status = 400, description = "Missing or blank topic", body = ErrorResponse),
        (status = 502, description = "The opener agent failed", body = ErrorResponse)
    )
)]
pub async fn start_debate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TopicPayload>,
) -> Result<Json<StartDebateResponse>, ApiError> {
    let topic = payload.topic.unwrap_or_default();
    let (_, turn) = state.scheduler.start_debate(&topic).await?;
    Ok(Json(StartDebateResponse {
        initial_message: TurnView::from(&turn),
    }))
}

/// Advance a client-held debate by one responder turn and one opener turn.
#[utoipa::path(
    post,
    path = "/api/generate-next-turn",
    request_body = NextTurnPayload,
    responses(
        (status = 200, description = "Two new turns generated", body = NextTurnResponse),
        (status = 400, description = "Missing topic, empty or malformed history", body = ErrorResponse),
        (status = 502, description = "An agent failed", body = ErrorResponse)
    )
)]
pub async fn generate_next_turn(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NextTurnPayload>,
) -> Result<Json<NextTurnResponse>, ApiError> {
    let topic = payload.topic.unwrap_or_default();
    let transcript = payload
        .debate_history
        .into_iter()
        .map(|entry| (entry.speaker, entry.text));
    let mut session = DebateSession::from_transcript(&topic, transcript)?;

    let produced = state.scheduler.advance_turn(&mut session).await?;
    Ok(Json(NextTurnResponse {
        new_messages: turn_views(&produced),
    }))
}

/// Create a stored debate and generate its opening statement.
#[utoipa::path(
    post,
    path = "/api/debates",
    request_body = TopicPayload,
    responses(
        (status = 201, description = "Debate created", body = DebateView),
        (status = 400, description = "Missing or blank topic", body = ErrorResponse),
        (status = 502, description = "The opener agent failed", body = ErrorResponse)
    )
)]
pub async fn create_debate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TopicPayload>,
) -> Result<(StatusCode, Json<DebateView>), ApiError> {
    let topic = payload.topic.unwrap_or_default();
    let (session, _) = state.scheduler.start_debate(&topic).await?;
    let id = state.sessions.insert(session.clone()).await;
    let active = state.sessions.len().await;
    info!(
        debate_id = %id,
        topic = %session.topic(),
        active = active,
        "Debate stored"
    );
    Ok((StatusCode::CREATED, Json(DebateView::new(id, &session))))
}

/// Get a stored debate.
#[utoipa::path(
    get,
    path = "/api/debates/{id}",
    responses(
        (status = 200, description = "Debate details", body = DebateView),
        (status = 404, description = "Debate not found", body = ErrorResponse),
        (status = 409, description = "An advance is in flight", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Debate ID")
    )
)]
pub async fn get_debate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DebateView>, ApiError> {
    let entry = state.sessions.get(id).await.ok_or(ApiError::NotFound(id))?;
    let session = entry.try_lock().map_err(|_| ApiError::Busy(id))?;
    Ok(Json(DebateView::new(id, &session)))
}

/// Advance a stored debate by two turns.
#[utoipa::path(
    post,
    path = "/api/debates/{id}/turns",
    responses(
        (status = 200, description = "Two new turns generated", body = AdvanceResponse),
        (status = 404, description = "Debate not found", body = ErrorResponse),
        (status = 409, description = "Another advance is in flight", body = ErrorResponse),
        (status = 502, description = "An agent failed", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Debate ID")
    )
)]
pub async fn advance_debate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let entry = state.sessions.get(id).await.ok_or(ApiError::NotFound(id))?;
    let mut session = entry.try_lock().map_err(|_| ApiError::Busy(id))?;

    let produced = state.scheduler.advance_turn(&mut session).await?;
    Ok(Json(AdvanceResponse {
        new_turns: turn_views(&produced),
    }))
}

/// Drop a stored debate.
#[utoipa::path(
    delete,
    path = "/api/debates/{id}",
    responses(
        (status = 204, description = "Debate removed"),
        (status = 404, description = "Debate not found", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Debate ID")
    )
)]
pub async fn delete_debate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}
