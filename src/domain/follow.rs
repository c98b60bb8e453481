//! Follow: the user's own bet placed in response to a pick.

use crate::domain::{BetResult, FollowId, Odds, PickId, Stake, TipsterId, UserId};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The user's own recorded bet for a specific pick.
///
/// The follow carries its own odds, stake and result; the user rarely gets
/// exactly the terms the tipster published. Profit is always derived from
/// these fields on read, never cached, so it cannot go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: FollowId,
    /// Owning user.
    pub user: UserId,
    pub tipster_id: TipsterId,
    /// The pick this follow was placed against.
    pub pick_id: PickId,
    pub bookmaker: String,
    pub odds: Odds,
    pub stake: Stake,
    pub bet_type: String,
    /// Outcome of the user's own bet, independent of the pick's result.
    pub result: BetResult,
    /// Marks a follow the user flagged as mistaken (wrong market, wrong
    /// terms) so it can be audited later.
    #[serde(default)]
    pub is_error: bool,
    pub followed_date: NaiveDate,
    pub followed_time: NaiveTime,
    pub followed_at: NaiveDateTime,
    #[serde(default)]
    pub comments: String,
}

impl Follow {
    pub fn is_resolved(&self) -> bool {
        self.result.is_resolved()
    }
}
