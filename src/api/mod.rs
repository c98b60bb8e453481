pub mod follows;
pub mod health;
pub mod picks;
pub mod stats;
pub mod tipsters;

use crate::db::Repository;
use crate::domain::UserId;
use crate::error::AppError;
use axum::routing::{delete, get, put};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

/// Query parameters carried by every read or delete operation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user: String,
}

pub(crate) fn parse_user(user: &str) -> Result<UserId, AppError> {
    let trimmed = user.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("user must not be empty".to_string()));
    }
    Ok(UserId::new(trimmed))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/tipsters",
            get(tipsters::list_tipsters).post(tipsters::create_tipster),
        )
        .route(
            "/v1/tipsters/:id",
            put(tipsters::update_tipster).delete(tipsters::delete_tipster),
        )
        .route("/v1/tipsters/:id/stats", get(stats::get_tipster_stats))
        .route(
            "/v1/tipsters/:id/traceability",
            get(stats::get_tipster_traceability),
        )
        .route("/v1/picks", get(picks::list_picks).post(picks::create_pick))
        .route("/v1/picks/:id/result", put(picks::update_pick_result))
        .route("/v1/picks/:id", delete(picks::delete_pick))
        .route(
            "/v1/follows",
            get(follows::list_follows).post(follows::create_follow),
        )
        .route("/v1/follows/:id/result", put(follows::update_follow_result))
        .route("/v1/follows/:id/error", put(follows::set_follow_error))
        .route("/v1/follows/:id", delete(follows::delete_follow))
        .route("/v1/dashboard", get(stats::get_dashboard))
        .layer(cors)
        .with_state(state)
}
