//! Follow operations.

use crate::db::repo::{
    get_date, get_datetime, get_odds, get_result, get_stake, get_time, Repository, DATETIME_FMT,
    DATE_FMT, TIME_FMT,
};
use crate::domain::{
    BetResult, Follow, FollowId, Odds, PickId, Stake, TipsterId, UserId,
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Fields for a follow about to be inserted. The tipster id is taken from
/// the referenced pick rather than trusted from the caller.
#[derive(Debug, Clone)]
pub struct NewFollow {
    pub pick_id: PickId,
    pub bookmaker: String,
    pub odds: Odds,
    pub stake: Stake,
    pub bet_type: String,
    pub result: BetResult,
    pub is_error: bool,
    pub followed_date: NaiveDate,
    pub followed_time: NaiveTime,
    pub comments: String,
}

fn follow_from_row(row: &SqliteRow) -> Result<Follow, sqlx::Error> {
    Ok(Follow {
        id: FollowId::new(row.try_get::<String, _>("id")?),
        user: UserId::new(row.try_get::<String, _>("user")?),
        tipster_id: TipsterId::new(row.try_get::<String, _>("tipster_id")?),
        pick_id: PickId::new(row.try_get::<String, _>("pick_id")?),
        bookmaker: row.try_get("bookmaker")?,
        odds: get_odds(row, "odds")?,
        stake: get_stake(row, "stake")?,
        bet_type: row.try_get("bet_type")?,
        result: get_result(row, "result")?,
        is_error: row.try_get("is_error")?,
        followed_date: get_date(row, "followed_date")?,
        followed_time: get_time(row, "followed_time")?,
        followed_at: get_datetime(row, "followed_at")?,
        comments: row.try_get("comments")?,
    })
}

const SELECT_FOLLOW: &str = r#"
    SELECT id, user, tipster_id, pick_id, bookmaker, odds, stake, bet_type,
           result, is_error, followed_date, followed_time, followed_at, comments
    FROM follows
"#;

impl Repository {
    /// Insert a follow against an existing pick. Returns None when the pick
    /// does not exist for this user. A second follow for the same pick fails
    /// the unique index on (user, pick_id).
    ///
    /// # Errors
    /// Returns an error if a statement fails, including the unique-violation
    /// case.
    pub async fn insert_follow(
        &self,
        user: &UserId,
        new: NewFollow,
    ) -> Result<Option<Follow>, sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        let tipster_id: Option<String> =
            sqlx::query("SELECT tipster_id FROM picks WHERE user = ? AND id = ?")
                .bind(user.as_str())
                .bind(new.pick_id.as_str())
                .fetch_optional(&mut *tx)
                .await?
                .map(|row| row.get("tipster_id"));
        let Some(tipster_id) = tipster_id else {
            return Ok(None);
        };

        let id = FollowId::new(Uuid::new_v4().to_string());
        let followed_at = new.followed_date.and_time(new.followed_time);

        sqlx::query(
            r#"
            INSERT INTO follows
            (id, user, tipster_id, pick_id, bookmaker, odds, stake, bet_type,
             result, is_error, followed_date, followed_time, followed_at, comments)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(user.as_str())
        .bind(&tipster_id)
        .bind(new.pick_id.as_str())
        .bind(&new.bookmaker)
        .bind(new.odds.value().to_canonical_string())
        .bind(new.stake.value().to_canonical_string())
        .bind(&new.bet_type)
        .bind(new.result.as_str())
        .bind(new.is_error)
        .bind(new.followed_date.format(DATE_FMT).to_string())
        .bind(new.followed_time.format(TIME_FMT).to_string())
        .bind(followed_at.format(DATETIME_FMT).to_string())
        .bind(&new.comments)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Follow {
            id,
            user: user.clone(),
            tipster_id: TipsterId::new(tipster_id),
            pick_id: new.pick_id,
            bookmaker: new.bookmaker,
            odds: new.odds,
            stake: new.stake,
            bet_type: new.bet_type,
            result: new.result,
            is_error: new.is_error,
            followed_date: new.followed_date,
            followed_time: new.followed_time,
            followed_at,
            comments: new.comments,
        }))
    }

    /// List all the user's follows, newest first.
    pub async fn list_follows(&self, user: &UserId) -> Result<Vec<Follow>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "{SELECT_FOLLOW} WHERE user = ? ORDER BY followed_at DESC, id ASC"
        ))
        .bind(user.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(follow_from_row).collect()
    }

    /// List the user's follows for one tipster, newest first.
    pub async fn list_follows_by_tipster(
        &self,
        user: &UserId,
        tipster_id: &TipsterId,
    ) -> Result<Vec<Follow>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "{SELECT_FOLLOW} WHERE user = ? AND tipster_id = ? ORDER BY followed_at DESC, id ASC"
        ))
        .bind(user.as_str())
        .bind(tipster_id.as_str())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(follow_from_row).collect()
    }

    pub async fn get_follow(
        &self,
        user: &UserId,
        id: &FollowId,
    ) -> Result<Option<Follow>, sqlx::Error> {
        let row = sqlx::query(&format!("{SELECT_FOLLOW} WHERE user = ? AND id = ?"))
            .bind(user.as_str())
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(follow_from_row).transpose()
    }

    /// Fetch the user's follow for a pick, if one was placed.
    pub async fn get_follow_by_pick(
        &self,
        user: &UserId,
        pick_id: &PickId,
    ) -> Result<Option<Follow>, sqlx::Error> {
        let row = sqlx::query(&format!("{SELECT_FOLLOW} WHERE user = ? AND pick_id = ?"))
            .bind(user.as_str())
            .bind(pick_id.as_str())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(follow_from_row).transpose()
    }

    /// Record the outcome of the user's own bet. Returns false when no such
    /// follow exists.
    pub async fn update_follow_result(
        &self,
        user: &UserId,
        id: &FollowId,
        result: BetResult,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query("UPDATE follows SET result = ? WHERE user = ? AND id = ?")
            .bind(result.as_str())
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(self.pool())
            .await?;

        Ok(updated.rows_affected() > 0)
    }

    /// Flag or unflag a follow as mistakenly placed.
    pub async fn set_follow_error(
        &self,
        user: &UserId,
        id: &FollowId,
        is_error: bool,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query("UPDATE follows SET is_error = ? WHERE user = ? AND id = ?")
            .bind(is_error)
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(self.pool())
            .await?;

        Ok(updated.rows_affected() > 0)
    }

    /// Delete a follow. The parent pick is untouched.
    pub async fn delete_follow(&self, user: &UserId, id: &FollowId) -> Result<bool, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM follows WHERE user = ? AND id = ?")
            .bind(user.as_str())
            .bind(id.as_str())
            .execute(self.pool())
            .await?;

        Ok(deleted.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use crate::db::repo::NewPick;
    use crate::domain::{Decimal, Pick, PickKind};
    use tempfile::TempDir;

    async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_pick(repo: &Repository, user: &UserId) -> Pick {
        let tipster = repo
            .insert_tipster(user, "T", "Telegram", date(2024, 1, 1))
            .await
            .unwrap();
        repo.insert_pick(
            user,
            NewPick {
                tipster_id: tipster.id,
                event: "A vs B".to_string(),
                sport: "Football".to_string(),
                kind: PickKind::Pre,
                bet_type: "Over 2.5".to_string(),
                bookmaker: "Bet365".to_string(),
                odds: Odds::new(Decimal::from_str_canonical("1.85").unwrap()).unwrap(),
                stake: Stake::from_units(3).unwrap(),
                event_date: date(2024, 3, 10),
                event_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                result: BetResult::Pending,
                comments: String::new(),
            },
        )
        .await
        .unwrap()
        .unwrap()
    }

    fn new_follow(pick_id: &PickId) -> NewFollow {
        NewFollow {
            pick_id: pick_id.clone(),
            bookmaker: "Betfair".to_string(),
            odds: Odds::new(Decimal::from_str_canonical("1.9").unwrap()).unwrap(),
            stake: Stake::from_units(2).unwrap(),
            bet_type: "Over 2.5".to_string(),
            result: BetResult::Pending,
            is_error: false,
            followed_date: date(2024, 3, 10),
            followed_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            comments: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_follow_round_trips_and_inherits_tipster() {
        let (repo, _temp) = setup_test_db().await;
        let user = UserId::new("u1");
        let pick = seed_pick(&repo, &user).await;

        let follow = repo
            .insert_follow(&user, new_follow(&pick.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(follow.tipster_id, pick.tipster_id);

        let fetched = repo.get_follow(&user, &follow.id).await.unwrap().unwrap();
        assert_eq!(follow, fetched);

        let by_pick = repo
            .get_follow_by_pick(&user, &pick.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_pick.id, follow.id);
    }

    #[tokio::test]
    async fn test_insert_follow_unknown_pick() {
        let (repo, _temp) = setup_test_db().await;
        let user = UserId::new("u1");

        let result = repo
            .insert_follow(&user, new_follow(&PickId::new("ghost")))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_second_follow_for_same_pick_rejected() {
        let (repo, _temp) = setup_test_db().await;
        let user = UserId::new("u1");
        let pick = seed_pick(&repo, &user).await;

        repo.insert_follow(&user, new_follow(&pick.id))
            .await
            .unwrap()
            .unwrap();
        let second = repo.insert_follow(&user, new_follow(&pick.id)).await;
        assert!(matches!(
            second,
            Err(sqlx::Error::Database(ref e)) if e.is_unique_violation()
        ));
    }

    #[tokio::test]
    async fn test_update_follow_result_and_error_flag() {
        let (repo, _temp) = setup_test_db().await;
        let user = UserId::new("u1");
        let pick = seed_pick(&repo, &user).await;
        let follow = repo
            .insert_follow(&user, new_follow(&pick.id))
            .await
            .unwrap()
            .unwrap();

        assert!(repo
            .update_follow_result(&user, &follow.id, BetResult::Lost)
            .await
            .unwrap());
        assert!(repo.set_follow_error(&user, &follow.id, true).await.unwrap());

        let fetched = repo.get_follow(&user, &follow.id).await.unwrap().unwrap();
        assert_eq!(fetched.result, BetResult::Lost);
        assert!(fetched.is_error);
    }

    #[tokio::test]
    async fn test_delete_pick_cascades_to_follow() {
        let (repo, _temp) = setup_test_db().await;
        let user = UserId::new("u1");
        let pick = seed_pick(&repo, &user).await;
        let follow = repo
            .insert_follow(&user, new_follow(&pick.id))
            .await
            .unwrap()
            .unwrap();

        assert!(repo.delete_pick(&user, &pick.id).await.unwrap());
        assert!(repo.get_follow(&user, &follow.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_tipster_cascades_to_picks_and_follows() {
        let (repo, _temp) = setup_test_db().await;
        let user = UserId::new("u1");
        let pick = seed_pick(&repo, &user).await;
        repo.insert_follow(&user, new_follow(&pick.id))
            .await
            .unwrap()
            .unwrap();

        let cascade = repo
            .delete_tipster(&user, &pick.tipster_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cascade.picks_deleted, 1);
        assert_eq!(cascade.follows_deleted, 1);
        assert!(repo.list_picks(&user).await.unwrap().is_empty());
        assert!(repo.list_follows(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_follows_are_scoped_by_owner() {
        let (repo, _temp) = setup_test_db().await;
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");
        let pick = seed_pick(&repo, &alice).await;
        let follow = repo
            .insert_follow(&alice, new_follow(&pick.id))
            .await
            .unwrap()
            .unwrap();

        assert!(repo.get_follow(&bob, &follow.id).await.unwrap().is_none());
        assert!(!repo.delete_follow(&bob, &follow.id).await.unwrap());
        // Bob cannot follow Alice's pick either; it is invisible to him.
        assert!(repo
            .insert_follow(&bob, new_follow(&pick.id))
            .await
            .unwrap()
            .is_none());
    }
}
