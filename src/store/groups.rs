use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Store;
use crate::core::{current_time_millis, GroupId, MessageId, UserId};
use crate::models::{Group, GroupMember, GroupRole, Message, NewGroup};

fn group_from_row(row: &SqliteRow) -> Result<Group> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_private: row.try_get("is_private")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

fn member_from_row(row: &SqliteRow) -> Result<GroupMember> {
    let role: String = row.try_get("role")?;
    Ok(GroupMember {
        group_id: row.try_get("group_id")?,
        user_id: row.try_get("user_id")?,
        role: GroupRole::parse(&role).ok_or_else(|| anyhow!("unknown group role: {}", role))?,
        joined_at: row.try_get("joined_at")?,
    })
}

fn message_from_row(row: &SqliteRow) -> Result<Message> {
    Ok(Message {
        id: row.try_get("id")?,
        group_id: row.try_get("group_id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Store {
    /// Creates the group and seeds the creator as its first admin in one
    /// transaction; a group never exists without an admin row.
    pub async fn insert_group(&self, creator_id: UserId, group: &NewGroup) -> Result<Group> {
        let now = current_time_millis();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO groups (name, description, is_private, created_by, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.is_private)
        .bind(creator_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();

        sqlx::query(
            "INSERT INTO group_members (group_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(creator_id)
        .bind(GroupRole::Admin.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Group {
            id,
            name: group.name.clone(),
            description: group.description.clone(),
            is_private: group.is_private,
            created_by: creator_id,
            created_at: now,
        })
    }

    pub async fn get_group(&self, id: GroupId) -> Result<Option<Group>> {
        let row = sqlx::query(
            "SELECT id, name, description, is_private, created_by, created_at \
             FROM groups WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(group_from_row).transpose()
    }

    pub async fn get_group_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<GroupMember>> {
        let row = sqlx::query(
            "SELECT group_id, user_id, role, joined_at FROM group_members \
             WHERE group_id = ? AND user_id = ?",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(member_from_row).transpose()
    }

    pub async fn get_group_members(&self, group_id: GroupId) -> Result<Vec<GroupMember>> {
        let rows = sqlx::query(
            "SELECT group_id, user_id, role, joined_at FROM group_members \
             WHERE group_id = ? ORDER BY joined_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(member_from_row).collect()
    }

    pub async fn insert_group_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
        role: GroupRole,
    ) -> Result<GroupMember> {
        let now = current_time_millis();

        sqlx::query(
            "INSERT INTO group_members (group_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(GroupMember {
            group_id,
            user_id,
            role,
            joined_at: now,
        })
    }

    pub async fn update_group_member_role(
        &self,
        group_id: GroupId,
        user_id: UserId,
        role: GroupRole,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE group_members SET role = ? WHERE group_id = ? AND user_id = ?",
        )
        .bind(role.as_str())
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_group_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = ? AND user_id = ?")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_group_admins(&self, group_id: GroupId) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM group_members WHERE group_id = ? AND role = 'admin'",
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("count")?)
    }

    pub async fn insert_message(
        &self,
        group_id: GroupId,
        user_id: UserId,
        content: &str,
    ) -> Result<Message> {
        let now = current_time_millis();

        let result = sqlx::query(
            "INSERT INTO messages (group_id, user_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(content)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Message {
            id: result.last_insert_rowid(),
            group_id,
            user_id,
            content: content.to_string(),
            created_at: now,
        })
    }

    pub async fn get_message(&self, id: MessageId) -> Result<Option<Message>> {
        let row = sqlx::query(
            "SELECT id, group_id, user_id, content, created_at FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(message_from_row).transpose()
    }

    /// Most recent `limit` messages of the room's append-only log, oldest
    /// first within the window.
    pub async fn get_messages(&self, group_id: GroupId, limit: i64) -> Result<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT id, group_id, user_id, content, created_at FROM messages \
             WHERE group_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(group_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut messages: Vec<Message> = rows
            .iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>>>()?;
        messages.reverse();
        Ok(messages)
    }
}
