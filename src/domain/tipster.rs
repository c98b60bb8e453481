//! Tipster: a tracked source of picks.

use crate::domain::{TipsterId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A followed source of betting recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tipster {
    pub id: TipsterId,
    /// Owning user.
    pub user: UserId,
    pub name: String,
    /// Source platform (Telegram, Discord, ...). Free-form to tolerate
    /// legacy values.
    pub channel: String,
    pub created_date: NaiveDate,
    /// Date of the most recent pick, kept in step with pick inserts.
    pub last_pick_date: Option<NaiveDate>,
}
