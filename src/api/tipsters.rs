use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{parse_user, AppState, UserQuery};
use crate::domain::{Tipster, TipsterId};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTipsterRequest {
    pub user: String,
    pub name: String,
    pub channel: String,
    pub created_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTipsterRequest {
    pub user: String,
    pub name: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTipsterResponse {
    pub picks_deleted: u64,
    pub follows_deleted: u64,
}

pub async fn list_tipsters(
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Tipster>>, AppError> {
    let user = parse_user(&params.user)?;
    let tipsters = state.repo.list_tipsters(&user).await?;
    Ok(Json(tipsters))
}

pub async fn create_tipster(
    State(state): State<AppState>,
    Json(req): Json<CreateTipsterRequest>,
) -> Result<(StatusCode, Json<Tipster>), AppError> {
    let user = parse_user(&req.user)?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    let tipster = state
        .repo
        .insert_tipster(&user, name, req.channel.trim(), req.created_date)
        .await?;
    Ok((StatusCode::CREATED, Json(tipster)))
}

pub async fn update_tipster(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateTipsterRequest>,
) -> Result<Json<Tipster>, AppError> {
    let user = parse_user(&req.user)?;
    let id = TipsterId::new(id);

    let updated = state
        .repo
        .update_tipster(&user, &id, req.name.as_deref(), req.channel.as_deref())
        .await?;
    if !updated {
        return Err(AppError::NotFound("Tipster not found".to_string()));
    }

    let tipster = state
        .repo
        .get_tipster(&user, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tipster not found".to_string()))?;
    Ok(Json(tipster))
}

pub async fn delete_tipster(
    Path(id): Path<String>,
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<DeleteTipsterResponse>, AppError> {
    let user = parse_user(&params.user)?;
    let id = TipsterId::new(id);

    let cascade = state
        .repo
        .delete_tipster(&user, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tipster not found".to_string()))?;

    Ok(Json(DeleteTipsterResponse {
        picks_deleted: cascade.picks_deleted,
        follows_deleted: cascade.follows_deleted,
    }))
}
