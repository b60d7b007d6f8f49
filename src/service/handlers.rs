//! HTTP handlers for the matchmaking endpoint
//!
//! Each request runs inside its own span carrying a request id. Failures are
//! logged and converted to a status code here and nowhere else.

use crate::error::{ErrorClass, MatchmakingError};
use crate::service::app::AppState;
use crate::utils::generate_request_id;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// Body returned for failures the caller cannot act on
pub const INTERNAL_ERROR_BODY: &str = "Oops, something went wrong";

/// Query string of a match request
#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    pub game: Option<String>,
}

/// `GET /matchmaker/{player_handle}?game=<game>`
pub async fn find_match_handler(
    State(state): State<Arc<AppState>>,
    Path(player_handle): Path<String>,
    Query(query): Query<MatchQuery>,
) -> Response {
    respond(state, player_handle, query.game.unwrap_or_default()).await
}

/// `GET /matchmaker` without a handle
pub async fn missing_handle_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchQuery>,
) -> Response {
    respond(state, String::new(), query.game.unwrap_or_default()).await
}

async fn respond(state: Arc<AppState>, player_handle: String, game: String) -> Response {
    let span = info_span!(
        "match_request",
        request_id = %generate_request_id(),
        player = %player_handle,
        game = %game
    );

    async move {
        let metrics = state.metrics();
        let timer = metrics.start_timer();

        let (outcome, response) = match state.selector().find_match(&player_handle, &game).await {
            Ok(opponent) => {
                info!("Matched '{}' with '{}'", player_handle, opponent.handle);
                ("matched", (StatusCode::OK, Json(opponent)).into_response())
            }
            Err(e) => error_response(&e),
        };

        metrics.record_match_request(outcome, timer.stop());
        response
    }
    .instrument(span)
    .await
}

/// Map a failed match to its HTTP response and a metrics outcome label
pub fn error_response(error: &anyhow::Error) -> (&'static str, Response) {
    let label = error
        .downcast_ref::<MatchmakingError>()
        .map(MatchmakingError::label)
        .unwrap_or("internal_error");

    let response = match ErrorClass::of(error) {
        ErrorClass::BadRequest => {
            warn!("Rejected match request: {}", error);
            (StatusCode::BAD_REQUEST, error.to_string()).into_response()
        }
        ErrorClass::NoContent => {
            info!("No opponent available: {}", error);
            StatusCode::NO_CONTENT.into_response()
        }
        ErrorClass::Internal => {
            error!("Match request failed: {:#}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
        }
    };

    (label, response)
}
