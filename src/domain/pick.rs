//! Pick: one recommended bet from a tipster.

use crate::domain::{BetResult, Odds, PickId, PickKind, Stake, TipsterId, UserId};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A betting recommendation issued by a tipster, with its terms and eventual
/// outcome.
///
/// Resolution is derived from the result rather than stored next to it, so
/// `is_resolved() == (result != Pending)` holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    pub id: PickId,
    /// Owning user.
    pub user: UserId,
    pub tipster_id: TipsterId,
    /// Match/event label, e.g. "Madrid vs Barcelona".
    pub event: String,
    pub sport: String,
    pub kind: PickKind,
    /// Bet description, e.g. "Over 2.5".
    pub bet_type: String,
    pub bookmaker: String,
    pub odds: Odds,
    pub stake: Stake,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    /// Combined date-time used for ordering.
    pub placed_at: NaiveDateTime,
    pub result: BetResult,
    #[serde(default)]
    pub comments: String,
}

impl Pick {
    pub fn is_resolved(&self) -> bool {
        self.result.is_resolved()
    }
}
