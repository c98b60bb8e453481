//! Fold a collection of bets into summary statistics.

use crate::domain::{BetResult, Decimal, Follow, Pick};
use crate::stats::profit::profit_unchecked;
use serde::{Deserialize, Serialize};

/// Summary statistics over one collection of bets (a tipster's picks or the
/// user's follows).
///
/// Percentages are rounded to 1 decimal, money-like quantities to 2; the
/// rounding happens here at the output boundary, never mid-fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WagerStats {
    pub total: u32,
    /// Bets with an outcome, voids included.
    pub resolved: u32,
    pub pending: u32,
    pub won: u32,
    pub lost: u32,
    pub voided: u32,
    /// `won / (resolved - voided) * 100`; 0 when nothing counts.
    pub winrate: Decimal,
    /// `profit / total_staked * 100`; 0 when nothing was staked.
    #[serde(rename = "yield")]
    pub yield_pct: Decimal,
    pub profit: Decimal,
    /// Stakes of resolved non-void bets; a voided bet returns its stake.
    pub total_staked: Decimal,
    /// Mean odds over resolved bets.
    pub avg_odds: Decimal,
    /// Mean stake over resolved bets.
    pub avg_stake: Decimal,
}

/// Exact running totals, kept unrounded so downstream comparisons (e.g. the
/// traceability diffs) do not compound rounding error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Totals {
    pub total: u32,
    pub resolved: u32,
    pub won: u32,
    pub lost: u32,
    pub voided: u32,
    pub profit: Decimal,
    pub staked: Decimal,
    odds_sum: Decimal,
    stake_sum: Decimal,
}

impl Totals {
    pub(crate) fn winrate(&self) -> Decimal {
        let countable = self.resolved - self.voided;
        if countable == 0 {
            return Decimal::zero();
        }
        Decimal::from_int(self.won as i64) / Decimal::from_int(countable as i64)
            * Decimal::hundred()
    }

    pub(crate) fn yield_pct(&self) -> Decimal {
        if self.staked.is_zero() {
            return Decimal::zero();
        }
        self.profit / self.staked * Decimal::hundred()
    }

    pub(crate) fn avg_odds(&self) -> Decimal {
        if self.resolved == 0 {
            return Decimal::zero();
        }
        self.odds_sum / Decimal::from_int(self.resolved as i64)
    }

    pub(crate) fn avg_stake(&self) -> Decimal {
        if self.resolved == 0 {
            return Decimal::zero();
        }
        self.stake_sum / Decimal::from_int(self.resolved as i64)
    }

    pub(crate) fn summarize(&self) -> WagerStats {
        WagerStats {
            total: self.total,
            resolved: self.resolved,
            pending: self.total - self.resolved,
            won: self.won,
            lost: self.lost,
            voided: self.voided,
            winrate: self.winrate().round_dp(1),
            yield_pct: self.yield_pct().round_dp(2),
            profit: self.profit.round_dp(2),
            total_staked: self.staked.round_dp(2),
            avg_odds: self.avg_odds().round_dp(2),
            avg_stake: self.avg_stake().round_dp(2),
        }
    }
}

/// One scored wager, the unit the fold consumes. Picks and follows both
/// reduce to this.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Wager {
    pub odds: Decimal,
    pub stake: Decimal,
    pub result: BetResult,
}

impl From<&Pick> for Wager {
    fn from(pick: &Pick) -> Self {
        Wager {
            odds: pick.odds.value(),
            stake: pick.stake.value(),
            result: pick.result,
        }
    }
}

impl From<&Follow> for Wager {
    fn from(follow: &Follow) -> Self {
        Wager {
            odds: follow.odds.value(),
            stake: follow.stake.value(),
            result: follow.result,
        }
    }
}

pub(crate) fn fold(wagers: impl Iterator<Item = Wager>) -> Totals {
    let mut t = Totals {
        total: 0,
        resolved: 0,
        won: 0,
        lost: 0,
        voided: 0,
        profit: Decimal::zero(),
        staked: Decimal::zero(),
        odds_sum: Decimal::zero(),
        stake_sum: Decimal::zero(),
    };

    for wager in wagers {
        t.total += 1;
        if !wager.result.is_resolved() {
            continue;
        }
        t.resolved += 1;
        t.odds_sum = t.odds_sum + wager.odds;
        t.stake_sum = t.stake_sum + wager.stake;

        match wager.result {
            BetResult::Won => t.won += 1,
            BetResult::Lost => t.lost += 1,
            BetResult::Void => t.voided += 1,
            BetResult::Pending => unreachable!("pending filtered above"),
        }
        if wager.result != BetResult::Void {
            t.staked = t.staked + wager.stake;
        }
        t.profit = t.profit + profit_unchecked(wager.odds, wager.stake, wager.result);
    }

    t
}

pub(crate) fn fold_picks(picks: &[Pick]) -> Totals {
    fold(picks.iter().map(Wager::from))
}

pub(crate) fn fold_follows(follows: &[Follow]) -> Totals {
    fold(follows.iter().map(Wager::from))
}

/// Summarize a tipster's picks.
pub fn aggregate(picks: &[Pick]) -> WagerStats {
    fold_picks(picks).summarize()
}

/// Summarize the user's follows using each follow's own terms.
pub fn aggregate_follows(follows: &[Follow]) -> WagerStats {
    fold_follows(follows).summarize()
}
