//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tracing::{error, warn};

use crate::domain::local_date;
use crate::link::{LinkError, LinkShortener, booking_link};
use crate::selection::Selector;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<L>(state: AppState<L>) -> Router
where
    L: LinkShortener + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status::<L>))
        .route("/select", post(select_round_trips::<L>))
        .route("/link", get(round_trip_link::<L>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Size and age of the serving index.
async fn status<L>(State(state): State<AppState<L>>) -> Json<StatusResponse> {
    let snapshot = state.index.snapshot().await;
    Json(StatusResponse {
        round_trips: snapshot.len(),
        last_collected_at: snapshot.last_collected_at,
    })
}

/// Select round trips matching a constraint.
async fn select_round_trips<L>(
    State(state): State<AppState<L>>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let constraint = req
        .into_constraint()
        .map_err(|message| AppError::BadRequest { message })?;

    let snapshot = state.index.snapshot().await;
    let today = local_date(Utc::now(), state.selection.utc_offset_secs);
    let selector = Selector::new((*state.selection).clone(), today);
    let selection = selector.select(&constraint, &snapshot.trips);

    Ok(Json(SelectResponse::from(selection)))
}

/// Shortened booking link for the served round trip leaving on a date.
async fn round_trip_link<L>(
    State(state): State<AppState<L>>,
    Query(req): Query<LinkRequest>,
) -> Result<Json<LinkResponse>, AppError>
where
    L: LinkShortener + Send + Sync + 'static,
{
    let direction = req.direction.unwrap_or_default();
    let snapshot = state.index.snapshot().await;

    let trip = snapshot
        .trips
        .iter()
        .filter(|t| t.direction() == direction && t.outbound_date() == req.date)
        .min_by_key(|t| t.total_cost())
        .ok_or_else(|| AppError::NotFound {
            message: format!("No round trip {} on {}", direction, req.date),
        })?;

    let long_url = booking_link(&state.booking_url, trip);
    let url = state.shortener.shorten(&long_url).await?;

    Ok(Json(LinkResponse { url, long_url }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    LinkUnavailable { message: String },
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        AppError::LinkUnavailable {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::LinkUnavailable { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
