use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{parse_user, AppState, UserQuery};
use crate::db::NewPick;
use crate::domain::{BetResult, Decimal, Odds, Pick, PickId, PickKind, Stake, TipsterId};
use crate::error::AppError;
use crate::stats::pick_profit;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickRequest {
    pub user: String,
    pub tipster_id: String,
    pub event: String,
    pub sport: String,
    /// "pre", "live" or "combined"; legacy labels accepted.
    pub kind: String,
    pub bet_type: String,
    pub bookmaker: String,
    pub odds: Odds,
    pub stake: Stake,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    /// Defaults to pending when absent.
    pub result: Option<String>,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPicksQuery {
    pub user: String,
    pub tipster_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResultRequest {
    pub user: String,
    pub result: String,
}

/// Pick as served over the API: the stored record plus the derived profit
/// and resolution flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickDto {
    #[serde(flatten)]
    pub pick: Pick,
    pub profit: Decimal,
    pub is_resolved: bool,
}

impl From<Pick> for PickDto {
    fn from(pick: Pick) -> Self {
        let profit = pick_profit(&pick);
        let is_resolved = pick.is_resolved();
        PickDto {
            pick,
            profit,
            is_resolved,
        }
    }
}

fn parse_result(label: Option<&str>) -> Result<BetResult, AppError> {
    match label {
        Some(l) => Ok(BetResult::parse_label(l)?),
        None => Ok(BetResult::Pending),
    }
}

pub async fn list_picks(
    Query(params): Query<ListPicksQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PickDto>>, AppError> {
    let user = parse_user(&params.user)?;

    let picks = match params.tipster_id {
        Some(tipster_id) => {
            state
                .repo
                .list_picks_by_tipster(&user, &TipsterId::new(tipster_id))
                .await?
        }
        None => state.repo.list_picks(&user).await?,
    };

    Ok(Json(picks.into_iter().map(PickDto::from).collect()))
}

pub async fn create_pick(
    State(state): State<AppState>,
    Json(req): Json<CreatePickRequest>,
) -> Result<(StatusCode, Json<PickDto>), AppError> {
    let user = parse_user(&req.user)?;
    let kind = PickKind::parse_label(&req.kind)?;
    let result = parse_result(req.result.as_deref())?;
    // Tipsters publish whole-unit stakes; only a follow may be fractional.
    if !req.stake.is_whole_units() {
        return Err(AppError::BadRequest(
            "pick stake must be a whole number of units".to_string(),
        ));
    }

    let new = NewPick {
        tipster_id: TipsterId::new(req.tipster_id),
        event: req.event,
        sport: req.sport,
        kind,
        bet_type: req.bet_type,
        bookmaker: req.bookmaker,
        odds: req.odds,
        stake: req.stake,
        event_date: req.event_date,
        event_time: req.event_time,
        result,
        comments: req.comments,
    };

    let pick = state
        .repo
        .insert_pick(&user, new)
        .await?
        .ok_or_else(|| AppError::NotFound("Tipster not found".to_string()))?;

    Ok((StatusCode::CREATED, Json(PickDto::from(pick))))
}

pub async fn update_pick_result(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateResultRequest>,
) -> Result<Json<PickDto>, AppError> {
    let user = parse_user(&req.user)?;
    let id = PickId::new(id);
    let result = BetResult::parse_label(&req.result)?;

    let updated = state.repo.update_pick_result(&user, &id, result).await?;
    if !updated {
        return Err(AppError::NotFound("Pick not found".to_string()));
    }

    let pick = state
        .repo
        .get_pick(&user, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pick not found".to_string()))?;
    Ok(Json(PickDto::from(pick)))
}

pub async fn delete_pick(
    Path(id): Path<String>,
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = parse_user(&params.user)?;

    let deleted = state.repo.delete_pick(&user, &PickId::new(id)).await?;
    if !deleted {
        return Err(AppError::NotFound("Pick not found".to_string()));
    }

    Ok(Json(serde_json::json!({"deleted": true})))
}
