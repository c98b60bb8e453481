use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use super::{parse_user, AppState, UserQuery};
use crate::domain::{Tipster, TipsterId, UserId};
use crate::error::AppError;
use crate::stats::{
    aggregate, compare, follow_odds_distribution, follow_stake_distribution, odds_distribution,
    pick_kind_distribution, sport_distribution, stake_distribution, BinCount, TraceabilityStats,
    WagerStats,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsterStatsResponse {
    pub tipster: Tipster,
    pub stats: WagerStats,
    pub odds_distribution: Vec<BinCount>,
    pub stake_distribution: Vec<BinCount>,
    pub sport_distribution: Vec<BinCount>,
    pub kind_distribution: Vec<BinCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceabilityResponse {
    pub tipster: Tipster,
    pub traceability: TraceabilityStats,
    pub follow_odds_distribution: Vec<BinCount>,
    pub follow_stake_distribution: Vec<BinCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub tipster: Tipster,
    pub stats: WagerStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub tipsters: Vec<DashboardRow>,
}

async fn load_tipster(
    state: &AppState,
    user: &UserId,
    id: &TipsterId,
) -> Result<Tipster, AppError> {
    state
        .repo
        .get_tipster(user, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tipster not found".to_string()))
}

pub async fn get_tipster_stats(
    Path(id): Path<String>,
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<TipsterStatsResponse>, AppError> {
    let user = parse_user(&params.user)?;
    let id = TipsterId::new(id);
    let tipster = load_tipster(&state, &user, &id).await?;

    let picks = state.repo.list_picks_by_tipster(&user, &id).await?;

    Ok(Json(TipsterStatsResponse {
        tipster,
        stats: aggregate(&picks),
        odds_distribution: odds_distribution(&picks),
        stake_distribution: stake_distribution(&picks),
        sport_distribution: sport_distribution(&picks),
        kind_distribution: pick_kind_distribution(&picks),
    }))
}

pub async fn get_tipster_traceability(
    Path(id): Path<String>,
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<TraceabilityResponse>, AppError> {
    let user = parse_user(&params.user)?;
    let id = TipsterId::new(id);
    let tipster = load_tipster(&state, &user, &id).await?;

    let picks = state.repo.list_picks_by_tipster(&user, &id).await?;
    let follows = state.repo.list_follows_by_tipster(&user, &id).await?;

    Ok(Json(TraceabilityResponse {
        tipster,
        traceability: compare(&picks, &follows),
        follow_odds_distribution: follow_odds_distribution(&follows),
        follow_stake_distribution: follow_stake_distribution(&follows),
    }))
}

/// One aggregation pass per tipster, sorted by yield so the best performers
/// lead the board. Ties are broken by name for a stable ordering.
pub async fn get_dashboard(
    Query(params): Query<UserQuery>,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = parse_user(&params.user)?;

    let mut rows = Vec::new();
    for tipster in state.repo.list_tipsters(&user).await? {
        let picks = state.repo.list_picks_by_tipster(&user, &tipster.id).await?;
        rows.push(DashboardRow {
            stats: aggregate(&picks),
            tipster,
        });
    }

    rows.sort_by(|a, b| {
        b.stats
            .yield_pct
            .cmp(&a.stats.yield_pct)
            .then_with(|| a.tipster.name.cmp(&b.tipster.name))
    });

    Ok(Json(DashboardResponse { tipsters: rows }))
}
