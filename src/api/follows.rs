use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{parse_user, AppState, UserQuery};
use crate::db::NewFollow;
use crate::domain::{BetResult, Decimal, Follow, FollowId, Odds, PickId, Stake, TipsterId};
use crate::error::AppError;
use crate::stats::follow_profit;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFollowRequest {
    pub user: String,
    pub pick_id: String,
    pub bookmaker: String,
    pub odds: Odds,
    pub stake: Stake,
    pub bet_type: String,
    /// Defaults to pending when absent.
    pub result: Option<String>,
    #[serde(default)]
    pub is_error: bool,
    pub followed_date: NaiveDate,
    pub followed_time: NaiveTime,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFollowsQuery {
    pub user: String,
    pub tipster_id: Option<String>,
    pub pick_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResultRequest {
    pub user: String,
    pub result: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetErrorRequest {
    pub user: String,
    pub is_error: bool,
}

/// Follow as served over the API. Profit is computed from the stored odds,
/// stake and result on every read, so it can never go stale.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowDto {
    #[serde(flatten)]
    pub follow: Follow,
    pub profit: Decimal,
    pub is_resolved: bool,
}

impl From<Follow> for FollowDto {
    fn from(follow: Follow) -> Self {
        let profit = follow_profit(&follow);
        let is_resolved = follow.is_resolved();
        FollowDto {
            follow,
            profit,
            is_resolved,
        }
    }
}

pub async fn list_follows(
    Query(params): Query<ListFollowsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<FollowDto>>, AppError> {
    let user = parse_user(&params.user)?;

    let follows = match (params.pick_id, params.tipster_id) {
        (Some(pick_id), _) => state
            .repo
            .get_follow_by_pick(&user, &PickId::new(pick_id))
            .await?
            .into_iter()
            .collect(),
        (None, Some(tipster_id)) => {
            state
                .repo
                .list_follows_by_tipster(&user, &TipsterId::new(tipster_id))
                .await?
        }
        (None, None) => state.repo.list_follows(&user).await?,
    };

    Ok(Json(follows.into_iter().map(FollowDto::from).collect()))
}

pub async fn create_follow(
    State(state): State<AppState>,
    Json(req): Json<CreateFollowRequest>,
) -> Result<(StatusCode, Json<FollowDto>), AppError> {
    let user = parse_user(&req.user)?;
    let result = match req.result.as_deref() {
        Some(label) => BetResult::parse_label(label)?,
        None => BetResult::Pending,
    };

    let new = NewFollow {
        pick_id: PickId::new(req.pick_id),
        bookmaker: req.bookmaker,
        odds: req.odds,
        stake: req.stake,
        bet_type: req.bet_type,
        result,
        is_error: req.is_error,
        followed_date: req.followed_date,
        followed_time: req.followed_time,
        comments: req.comments,
    };

    let follow = state
        .repo
        .insert_follow(&user, new)
        .await?
        .ok_or_else(|| AppError::NotFound("Pick not found".to_string()))?;

    Ok((StatusCode::CREATED, Json(FollowDto::from(follow))))
}

pub async fn update_follow_result(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateResultRequest>,
) -> Result<Json<FollowDto>, AppError> {
    let user = parse_user(&req.user)?;
    let id = FollowId::new(id);
    let result = BetResult::parse_label(&req.result)?;

    let updated = state.repo.update_follow_result(&user, &id, result).await?;
    if !updated {
        return Err(AppError::NotFound("Follow not found".to_string()));
    }

    let follow = state
        .repo
        .get_follow(&user, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Follow not found".to_string()))?;
    Ok(Json(FollowDto::from(follow)))
}

pub async fn set_follow_error(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<SetErrorRequest>,
) -> Result<Json<FollowDto>, AppError> {
    let user = parse_user(&req.user)?;
    let id = FollowId::new(id);

    let updated = state.repo.set_follow_error(&user, &id, req.is_error).await?;
    if !updated {
        return Err(AppError::NotFound("Follow not found".to_string()));
    }

    let follow = state
        .repo
        .get_follow(&user, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Follow not found".to_string()))?;
    Ok(Json(FollowDto::from(follow)))
}

pub async fn delete_follow(
    Path(id): Path<String>,
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = parse_user(&params.user)?;

    let deleted = state.repo.delete_follow(&user, &FollowId::new(id)).await?;
    if !deleted {
        return Err(AppError::NotFound("Follow not found".to_string()));
    }

    Ok(Json(serde_json::json!({"deleted": true})))
}
