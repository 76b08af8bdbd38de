//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the debate API and the OpenAPI documentation.

use crate::{
    handlers,
    models::{
        AdvanceResponse, ApiErrorKind, DebateView, ErrorResponse, NextTurnPayload,
        NextTurnResponse, StartDebateResponse, TopicPayload, TranscriptEntry, TurnView,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::start_debate,
        handlers::generate_next_turn,
        handlers::create_debate,
        handlers::get_debate,
        handlers::advance_debate,
        handlers::delete_debate,
    ),
    components(
        schemas(
            TopicPayload, NextTurnPayload, TranscriptEntry, TurnView, StartDebateResponse,
            NextTurnResponse, DebateView, AdvanceResponse, ErrorResponse, ApiErrorKind
        )
    ),
    tags(
        (name = "Debate API", description = "Two-agent debates between an opener and a responder")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/api/start-debate", post(handlers::start_debate))
        .route("/api/generate-next-turn", post(handlers::generate_next_turn))
        .route("/api/debates", post(handlers::create_debate))
        .route(
            "/api/debates/{id}",
            get(handlers::get_debate).delete(handlers::delete_debate),
        )
        .route("/api/debates/{id}/turns", post(handlers::advance_debate))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
