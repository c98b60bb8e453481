//! Side-by-side comparison of a tipster's picks and the user's follows.

use crate::domain::{Decimal, Follow, Pick, PickId};
use crate::stats::aggregate::{fold_follows, fold_picks, WagerStats};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How closely the user tracked a tipster, and how the user's own outcomes
/// compare with the tipster's published ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceabilityStats {
    pub total_picks: u32,
    pub total_follows: u32,
    /// `follows / picks * 100`; 0 when the tipster has no picks.
    pub follow_rate: Decimal,
    /// Aggregation over the tipster's picks.
    pub tipster: WagerStats,
    /// Aggregation over the user's follows, using each follow's own terms.
    pub user: WagerStats,
    /// Resolved follows whose pick resolved to the same result.
    pub match_count: u32,
    /// Resolved follows whose pick resolved to a different result.
    pub diverge_count: u32,
    /// `match_count / resolved follows * 100`; 0 when none resolved.
    pub match_rate: Decimal,
    pub winrate_diff: Decimal,
    pub yield_diff: Decimal,
    pub profit_diff: Decimal,
    pub avg_odds_diff: Decimal,
    pub avg_stake_diff: Decimal,
}

/// Compare a tipster's picks with the user's follows for that tipster.
///
/// Match/diverge classification only considers resolved follows whose pick
/// is present and itself resolved. A follow whose pick id matches nothing is
/// excluded from the classification, not penalized; it still counts toward
/// the user-side aggregation. Difference fields are user minus tipster,
/// computed on exact values and rounded once at the end.
pub fn compare(picks: &[Pick], follows: &[Follow]) -> TraceabilityStats {
    let tipster_totals = fold_picks(picks);
    let user_totals = fold_follows(follows);

    let by_id: HashMap<&PickId, &Pick> = picks.iter().map(|p| (&p.id, p)).collect();

    let mut match_count = 0u32;
    let mut diverge_count = 0u32;
    for follow in follows {
        if !follow.is_resolved() {
            continue;
        }
        let Some(pick) = by_id.get(&follow.pick_id) else {
            continue;
        };
        if !pick.is_resolved() {
            continue;
        }
        if follow.result == pick.result {
            match_count += 1;
        } else {
            diverge_count += 1;
        }
    }

    let follow_rate = if picks.is_empty() {
        Decimal::zero()
    } else {
        Decimal::from_int(follows.len() as i64) / Decimal::from_int(picks.len() as i64)
            * Decimal::hundred()
    };

    let match_rate = if user_totals.resolved == 0 {
        Decimal::zero()
    } else {
        Decimal::from_int(match_count as i64) / Decimal::from_int(user_totals.resolved as i64)
            * Decimal::hundred()
    };

    TraceabilityStats {
        total_picks: picks.len() as u32,
        total_follows: follows.len() as u32,
        follow_rate: follow_rate.round_dp(1),
        match_count,
        diverge_count,
        match_rate: match_rate.round_dp(1),
        winrate_diff: (user_totals.winrate() - tipster_totals.winrate()).round_dp(1),
        yield_diff: (user_totals.yield_pct() - tipster_totals.yield_pct()).round_dp(2),
        profit_diff: (user_totals.profit - tipster_totals.profit).round_dp(2),
        avg_odds_diff: (user_totals.avg_odds() - tipster_totals.avg_odds()).round_dp(2),
        avg_stake_diff: (user_totals.avg_stake() - tipster_totals.avg_stake()).round_dp(2),
        tipster: tipster_totals.summarize(),
        user: user_totals.summarize(),
    }
}
