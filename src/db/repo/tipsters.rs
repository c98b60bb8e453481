//! Tipster operations.

use crate::db::repo::{get_date, get_opt_date, Repository, DATE_FMT};
use crate::domain::{Tipster, TipsterId, UserId};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Row counts removed by a tipster cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipsterCascade {
    pub picks_deleted: u64,
    pub follows_deleted: u64,
}

fn tipster_from_row(row: &SqliteRow) -> Result<Tipster, sqlx::Error> {
    Ok(Tipster {
        id: TipsterId::new(row.try_get::<String, _>("id")?),
        user: UserId::new(row.try_get::<String, _>("user")?),
        name: row.try_get("name")?,
        channel: row.try_get("channel")?,
        created_date: get_date(row, "created_date")?,
        last_pick_date: get_opt_date(row, "last_pick_date")?,
    })
}

impl Repository {
    /// Insert a new tipster and return it with its generated id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_tipster(
        &self,
        user: &UserId,
        name: &str,
        channel: &str,
        created_date: NaiveDate,
    ) -> Result<Tipster, sqlx::Error> {
        let id = TipsterId::new(Uuid::new_v4().to_string());

        sqlx::query(
            r#"
            INSERT INTO tipsters (id, user, name, channel, created_date, last_pick_date)
            VALUES (?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(id.as_str())
        .bind(user.as_str())
        .bind(name)
        .bind(channel)
        .bind(created_date.format(DATE_FMT).to_string())
        .execute(self.pool())
        .await?;

        Ok(Tipster {
            id,
            user: user.clone(),
            name: name.to_string(),
            channel: channel.to_string(),
            created_date,
            last_pick_date: None,
        })
    }

    /// List the user's tipsters, most recently created first.
    pub async fn list_tipsters(&self, user: &UserId) -> Result<Vec<Tipster>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, user, name, channel, created_date, last_pick_date
            FROM tipsters
            WHERE user = ?
            ORDER BY created_date DESC, id ASC
            "#,
        )
        .bind(user.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(tipster_from_row).collect()
    }

    /// Fetch one tipster. Returns None when the id does not exist for this
    /// user; records of other users are indistinguishable from missing ones.
    pub async fn get_tipster(
        &self,
        user: &UserId,
        id: &TipsterId,
    ) -> Result<Option<Tipster>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, user, name, channel, created_date, last_pick_date
            FROM tipsters
            WHERE user = ? AND id = ?
            "#,
        )
        .bind(user.as_str())
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(tipster_from_row).transpose()
    }

    /// Update name and/or channel. Returns false when no such tipster exists.
    pub async fn update_tipster(
        &self,
        user: &UserId,
        id: &TipsterId,
        name: Option<&str>,
        channel: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tipsters
            SET name = COALESCE(?, name), channel = COALESCE(?, channel)
            WHERE user = ? AND id = ?
            "#,
        )
        .bind(name)
        .bind(channel)
        .bind(user.as_str())
        .bind(id.as_str())
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a tipster together with its picks and follows in one
    /// transaction, so no orphaned records survive. Returns None when the
    /// tipster does not exist for this user.
    pub async fn delete_tipster(
        &self,
        user: &UserId,
        id: &TipsterId,
    ) -> Result<Option<TipsterCascade>, sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        let follows = sqlx::query("DELETE FROM follows WHERE user = ? AND tipster_id = ?")
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        let picks = sqlx::query("DELETE FROM picks WHERE user = ? AND tipster_id = ?")
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        let tipster = sqlx::query("DELETE FROM tipsters WHERE user = ? AND id = ?")
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        if tipster.rows_affected() == 0 {
            // Unknown tipster; dropping the transaction rolls back.
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(TipsterCascade {
            picks_deleted: picks.rows_affected(),
            follows_deleted: follows.rows_affected(),
        }))
    }
}
