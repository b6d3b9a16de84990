use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Store;
use crate::core::{current_time_millis, UserId};
use crate::models::{FollowEdge, FollowStatus};

fn edge_from_row(row: &SqliteRow) -> Result<FollowEdge> {
    let status: String = row.try_get("status")?;
    Ok(FollowEdge {
        follower_id: row.try_get("follower_id")?,
        following_id: row.try_get("following_id")?,
        status: FollowStatus::parse(&status)
            .ok_or_else(|| anyhow!("unknown follow status: {}", status))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const EDGE_COLUMNS: &str = "follower_id, following_id, status, created_at, updated_at";

impl Store {
    pub async fn get_follow(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<Option<FollowEdge>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM follows WHERE follower_id = ? AND following_id = ?",
            EDGE_COLUMNS
        ))
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(edge_from_row).transpose()
    }

    /// Inserts the edge and, when it is born accepted, bumps both profiles'
    /// denormalized counters in the same transaction.
    pub async fn insert_follow(
        &self,
        follower_id: UserId,
        following_id: UserId,
        status: FollowStatus,
    ) -> Result<FollowEdge> {
        let now = current_time_millis();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO follows (follower_id, following_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(follower_id)
        .bind(following_id)
        .bind(status.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if status == FollowStatus::Accepted {
            sqlx::query("UPDATE profiles SET following_count = following_count + 1 WHERE user_id = ?")
                .bind(follower_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE profiles SET followers_count = followers_count + 1 WHERE user_id = ?")
                .bind(following_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(FollowEdge {
            follower_id,
            following_id,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// pending -> accepted transition. Returns false when no pending edge
    /// exists for the pair.
    pub async fn accept_follow(&self, follower_id: UserId, following_id: UserId) -> Result<bool> {
        let now = current_time_millis();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE follows SET status = 'accepted', updated_at = ? \
             WHERE follower_id = ? AND following_id = ? AND status = 'pending'",
        )
        .bind(now)
        .bind(follower_id)
        .bind(following_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE profiles SET following_count = following_count + 1 WHERE user_id = ?")
            .bind(follower_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE profiles SET followers_count = followers_count + 1 WHERE user_id = ?")
            .bind(following_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Removes the edge regardless of status; counters are only decremented
    /// when an accepted edge was actually removed. Absent edges are not an
    /// error, the end state is the same.
    pub async fn delete_follow(&self, follower_id: UserId, following_id: UserId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(
            "SELECT status FROM follows WHERE follower_id = ? AND following_id = ?",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = existing else {
            tx.rollback().await?;
            return Ok(false);
        };
        let status: String = row.try_get("status")?;

        sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
            .bind(follower_id)
            .bind(following_id)
            .execute(&mut *tx)
            .await?;

        if status == "accepted" {
            sqlx::query(
                "UPDATE profiles SET following_count = following_count - 1 WHERE user_id = ?",
            )
            .bind(follower_id)
            .execute(&mut *tx)
            .await?;
            sqlx::query(
                "UPDATE profiles SET followers_count = followers_count - 1 WHERE user_id = ?",
            )
            .bind(following_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Deletes only a pending edge. Returns false when the pair has no
    /// pending edge (including when it is already accepted).
    pub async fn delete_pending_follow(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM follows WHERE follower_id = ? AND following_id = ? AND status = 'pending'",
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ids the user follows with an accepted edge, most recent first.
    pub async fn get_following_ids(&self, user_id: UserId) -> Result<Vec<UserId>> {
        let rows = sqlx::query(
            "SELECT following_id FROM follows \
             WHERE follower_id = ? AND status = 'accepted' ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| Ok(row.try_get("following_id")?)).collect()
    }

    pub async fn get_following_edges(&self, user_id: UserId) -> Result<Vec<FollowEdge>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM follows \
             WHERE follower_id = ? AND status = 'accepted' ORDER BY created_at DESC",
            EDGE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(edge_from_row).collect()
    }

    pub async fn get_follower_edges(&self, user_id: UserId) -> Result<Vec<FollowEdge>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM follows \
             WHERE following_id = ? AND status = 'accepted' ORDER BY created_at DESC",
            EDGE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(edge_from_row).collect()
    }

    pub async fn get_pending_edges_targeting(&self, user_id: UserId) -> Result<Vec<FollowEdge>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM follows \
             WHERE following_id = ? AND status = 'pending' ORDER BY created_at DESC",
            EDGE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(edge_from_row).collect()
    }

    /// Accepted follows targeting the user, newest first. Activity source.
    pub async fn get_accepted_edges_targeting(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<FollowEdge>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM follows \
             WHERE following_id = ? AND status = 'accepted' ORDER BY updated_at DESC LIMIT ?",
            EDGE_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(edge_from_row).collect()
    }
}
