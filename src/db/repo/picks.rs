//! Pick operations.

use crate::db::repo::{
    get_date, get_datetime, get_kind, get_odds, get_result, get_stake, get_time,
    Repository, DATETIME_FMT, DATE_FMT, TIME_FMT,
};
use crate::domain::{
    BetResult, Odds, Pick, PickId, PickKind, Stake, TipsterId, UserId,
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Fields for a pick about to be inserted. The id and the combined ordering
/// timestamp are derived here.
#[derive(Debug, Clone)]
pub struct NewPick {
    pub tipster_id: TipsterId,
    pub event: String,
    pub sport: String,
    pub kind: PickKind,
    pub bet_type: String,
    pub bookmaker: String,
    pub odds: Odds,
    pub stake: Stake,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub result: BetResult,
    pub comments: String,
}

fn pick_from_row(row: &SqliteRow) -> Result<Pick, sqlx::Error> {
    Ok(Pick {
        id: PickId::new(row.try_get::<String, _>("id")?),
        user: UserId::new(row.try_get::<String, _>("user")?),
        tipster_id: TipsterId::new(row.try_get::<String, _>("tipster_id")?),
        event: row.try_get("event")?,
        sport: row.try_get("sport")?,
        kind: get_kind(row, "kind")?,
        bet_type: row.try_get("bet_type")?,
        bookmaker: row.try_get("bookmaker")?,
        odds: get_odds(row, "odds")?,
        stake: get_stake(row, "stake")?,
        event_date: get_date(row, "event_date")?,
        event_time: get_time(row, "event_time")?,
        placed_at: get_datetime(row, "placed_at")?,
        result: get_result(row, "result")?,
        comments: row.try_get("comments")?,
    })
}

const SELECT_PICK: &str = r#"
    SELECT id, user, tipster_id, event, sport, kind, bet_type, bookmaker,
           odds, stake, event_date, event_time, placed_at, result, comments
    FROM picks
"#;

impl Repository {
    /// Insert a pick and advance the tipster's last-pick date in the same
    /// transaction. Returns None when the tipster does not exist for this
    /// user.
    ///
    /// # Errors
    /// Returns an error if any statement in the transaction fails.
    pub async fn insert_pick(
        &self,
        user: &UserId,
        new: NewPick,
    ) -> Result<Option<Pick>, sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        let tipster_exists = sqlx::query("SELECT 1 FROM tipsters WHERE user = ? AND id = ?")
            .bind(user.as_str())
            .bind(new.tipster_id.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !tipster_exists {
            return Ok(None);
        }

        let id = PickId::new(Uuid::new_v4().to_string());
        let placed_at = new.event_date.and_time(new.event_time);

        sqlx::query(
            r#"
            INSERT INTO picks
            (id, user, tipster_id, event, sport, kind, bet_type, bookmaker,
             odds, stake, event_date, event_time, placed_at, result, comments)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(user.as_str())
        .bind(new.tipster_id.as_str())
        .bind(&new.event)
        .bind(&new.sport)
        .bind(new.kind.as_str())
        .bind(&new.bet_type)
        .bind(&new.bookmaker)
        .bind(new.odds.value().to_canonical_string())
        .bind(new.stake.value().to_canonical_string())
        .bind(new.event_date.format(DATE_FMT).to_string())
        .bind(new.event_time.format(TIME_FMT).to_string())
        .bind(placed_at.format(DATETIME_FMT).to_string())
        .bind(new.result.as_str())
        .bind(&new.comments)
        .execute(&mut *tx)
        .await?;

        // Only advance, never rewind, the tipster's last pick date.
        sqlx::query(
            r#"
            UPDATE tipsters
            SET last_pick_date = ?
            WHERE user = ? AND id = ? AND (last_pick_date IS NULL OR last_pick_date < ?)
            "#,
        )
        .bind(new.event_date.format(DATE_FMT).to_string())
        .bind(user.as_str())
        .bind(new.tipster_id.as_str())
        .bind(new.event_date.format(DATE_FMT).to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Pick {
            id,
            user: user.clone(),
            tipster_id: new.tipster_id,
            event: new.event,
            sport: new.sport,
            kind: new.kind,
            bet_type: new.bet_type,
            bookmaker: new.bookmaker,
            odds: new.odds,
            stake: new.stake,
            event_date: new.event_date,
            event_time: new.event_time,
            placed_at,
            result: new.result,
            comments: new.comments,
        }))
    }

    /// List all the user's picks, newest first.
    pub async fn list_picks(&self, user: &UserId) -> Result<Vec<Pick>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "{SELECT_PICK} WHERE user = ? ORDER BY placed_at DESC, id ASC"
        ))
        .bind(user.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(pick_from_row).collect()
    }

    /// List one tipster's picks, newest first.
    pub async fn list_picks_by_tipster(
        &self,
        user: &UserId,
        tipster_id: &TipsterId,
    ) -> Result<Vec<Pick>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "{SELECT_PICK} WHERE user = ? AND tipster_id = ? ORDER BY placed_at DESC, id ASC"
        ))
        .bind(user.as_str())
        .bind(tipster_id.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(pick_from_row).collect()
    }

    pub async fn get_pick(
        &self,
        user: &UserId,
        id: &PickId,
    ) -> Result<Option<Pick>, sqlx::Error> {
        let row = sqlx::query(&format!("{SELECT_PICK} WHERE user = ? AND id = ?"))
            .bind(user.as_str())
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(pick_from_row).transpose()
    }

    /// Record the pick's outcome. Returns false when no such pick exists.
    pub async fn update_pick_result(
        &self,
        user: &UserId,
        id: &PickId,
        result: BetResult,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query("UPDATE picks SET result = ? WHERE user = ? AND id = ?")
            .bind(result.as_str())
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(self.pool())
            .await?;

        Ok(updated.rows_affected() > 0)
    }

    /// Delete a pick and any follow placed against it, in one transaction.
    /// Returns false when no such pick exists.
    pub async fn delete_pick(&self, user: &UserId, id: &PickId) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM follows WHERE user = ? AND pick_id = ?")
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        let pick = sqlx::query("DELETE FROM picks WHERE user = ? AND id = ?")
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        if pick.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
