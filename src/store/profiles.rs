use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{placeholders, Store};
use crate::core::{current_time_millis, UserId};
use crate::models::{NewProfile, Profile, ProfileUpdate};

fn profile_from_row(row: &SqliteRow) -> Result<Profile> {
    Ok(Profile {
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        bio: row.try_get("bio")?,
        avatar_url: row.try_get("avatar_url")?,
        is_private: row.try_get("is_private")?,
        followers_count: row.try_get("followers_count")?,
        following_count: row.try_get("following_count")?,
        full_name: row.try_get("full_name")?,
        dob: row.try_get("dob")?,
        nutech_id: row.try_get("nutech_id")?,
        department: row.try_get("department")?,
        phone_number: row.try_get("phone_number")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const PROFILE_COLUMNS: &str = "user_id, username, display_name, bio, avatar_url, is_private, \
     followers_count, following_count, full_name, dob, nutech_id, department, phone_number, \
     created_at, updated_at";

impl Store {
    pub async fn create_profile(&self, user_id: UserId, profile: &NewProfile) -> Result<Profile> {
        let now = current_time_millis();

        sqlx::query(
            "INSERT INTO profiles (user_id, username, display_name, bio, avatar_url, is_private, \
             full_name, dob, nutech_id, department, phone_number, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&profile.username)
        .bind(&profile.display_name)
        .bind(&profile.bio)
        .bind(&profile.avatar_url)
        .bind(profile.is_private)
        .bind(&profile.full_name)
        .bind(&profile.dob)
        .bind(&profile.nutech_id)
        .bind(&profile.department)
        .bind(&profile.phone_number)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_profile(user_id)
            .await?
            .ok_or_else(|| anyhow!("profile {} missing after insert", user_id))
    }

    pub async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE user_id = ?",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    pub async fn get_profile_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE username = ?",
            PROFILE_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    /// Batch lookup used by the fetch-then-hydrate pipelines. Returns rows in
    /// store order; callers index the result by id.
    pub async fn get_profiles_by_ids(&self, ids: &[UserId]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM profiles WHERE user_id IN ({})",
            PROFILE_COLUMNS,
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(profile_from_row).collect()
    }

    pub async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<Profile> {
        let current = self
            .get_profile(user_id)
            .await?
            .ok_or_else(|| anyhow!("profile {} not found", user_id))?;
        let now = current_time_millis();

        sqlx::query(
            "UPDATE profiles SET display_name = ?, bio = ?, avatar_url = ?, is_private = ?, \
             full_name = ?, dob = ?, department = ?, phone_number = ?, updated_at = ? \
             WHERE user_id = ?",
        )
        .bind(update.display_name.as_ref().unwrap_or(&current.display_name))
        .bind(update.bio.as_ref().or(current.bio.as_ref()))
        .bind(update.avatar_url.as_ref().or(current.avatar_url.as_ref()))
        .bind(update.is_private.unwrap_or(current.is_private))
        .bind(update.full_name.as_ref().or(current.full_name.as_ref()))
        .bind(update.dob.as_ref().or(current.dob.as_ref()))
        .bind(update.department.as_ref().or(current.department.as_ref()))
        .bind(update.phone_number.as_ref().or(current.phone_number.as_ref()))
        .bind(now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        self.get_profile(user_id)
            .await?
            .ok_or_else(|| anyhow!("profile {} missing after update", user_id))
    }
}
