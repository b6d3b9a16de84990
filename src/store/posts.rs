use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{placeholders, Store};
use crate::core::{current_time_millis, CollectionId, CommentId, PostId, UserId};
use crate::models::{
    Collection, Comment, LikeRow, NewStory, Post, ReactionCount, ReactionKind, Story, Visibility,
};

fn post_from_row(row: &SqliteRow) -> Result<Post> {
    let visibility: String = row.try_get("visibility")?;
    let media_urls: String = row.try_get("media_urls")?;
    let hashtags: String = row.try_get("hashtags")?;
    let mentions: String = row.try_get("mentions")?;
    let edit_history: String = row.try_get("edit_history")?;
    let media_metadata: Option<String> = row.try_get("media_metadata")?;

    Ok(Post {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        image_url: row.try_get("image_url")?,
        video_url: row.try_get("video_url")?,
        media_urls: serde_json::from_str(&media_urls)?,
        media_metadata: media_metadata.as_deref().map(serde_json::from_str).transpose()?,
        is_private: row.try_get("is_private")?,
        visibility: Visibility::parse(&visibility)
            .ok_or_else(|| anyhow!("unknown post visibility: {}", visibility))?,
        likes_count: row.try_get("likes_count")?,
        comments_count: row.try_get("comments_count")?,
        hashtags: serde_json::from_str(&hashtags)?,
        mentions: serde_json::from_str(&mentions)?,
        edit_history: serde_json::from_str(&edit_history)?,
        edited_at: row.try_get("edited_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn comment_from_row(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        parent_id: row.try_get("parent_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn story_from_row(row: &SqliteRow) -> Result<Story> {
    Ok(Story {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        image_url: row.try_get("image_url")?,
        video_url: row.try_get("video_url")?,
        expires_at: row.try_get("expires_at")?,
        created_at: row.try_get("created_at")?,
    })
}

const POST_COLUMNS: &str = "id, user_id, content, image_url, video_url, media_urls, \
     media_metadata, is_private, visibility, likes_count, comments_count, hashtags, mentions, \
     edit_history, edited_at, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, post_id, user_id, content, parent_id, created_at, updated_at";

impl Store {
    pub async fn insert_post(&self, post: &Post) -> Result<Post> {
        let result = sqlx::query(
            "INSERT INTO posts (user_id, content, image_url, video_url, media_urls, \
             media_metadata, is_private, visibility, hashtags, mentions, edit_history, \
             created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(post.user_id)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .bind(serde_json::to_string(&post.media_urls)?)
        .bind(post.media_metadata.as_ref().map(serde_json::to_string).transpose()?)
        .bind(post.is_private)
        .bind(post.visibility.as_str())
        .bind(serde_json::to_string(&post.hashtags)?)
        .bind(serde_json::to_string(&post.mentions)?)
        .bind(serde_json::to_string(&post.edit_history)?)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_post(id)
            .await?
            .ok_or_else(|| anyhow!("post {} missing after insert", id))
    }

    pub async fn get_post(&self, id: PostId) -> Result<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    /// Full-row rewrite used by the edit path; counters are deliberately not
    /// writable here.
    pub async fn update_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            "UPDATE posts SET content = ?, image_url = ?, video_url = ?, media_urls = ?, \
             media_metadata = ?, is_private = ?, visibility = ?, hashtags = ?, mentions = ?, \
             edit_history = ?, edited_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .bind(serde_json::to_string(&post.media_urls)?)
        .bind(post.media_metadata.as_ref().map(serde_json::to_string).transpose()?)
        .bind(post.is_private)
        .bind(post.visibility.as_str())
        .bind(serde_json::to_string(&post.hashtags)?)
        .bind(serde_json::to_string(&post.mentions)?)
        .bind(serde_json::to_string(&post.edit_history)?)
        .bind(post.edited_at)
        .bind(post.updated_at)
        .bind(post.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the post and its dependent rows atomically. Cascade behavior
    /// belongs to the store, not to services.
    pub async fn delete_post(&self, id: PostId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM likes WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM bookmarks WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM reactions WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM collection_items WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_public_posts_latest(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE is_private = 0 ORDER BY created_at DESC, id DESC LIMIT ?",
            POST_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(post_from_row).collect()
    }

    pub async fn get_public_posts_trending(&self, limit: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE is_private = 0 \
             ORDER BY likes_count DESC, created_at DESC, id DESC LIMIT ?",
            POST_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(post_from_row).collect()
    }

    /// Posts authored by any of `author_ids`, excluding private-flagged
    /// rows, newest first. The `visibility` enum is not consulted here.
    pub async fn get_posts_by_authors(&self, author_ids: &[UserId], limit: i64) -> Result<Vec<Post>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM posts WHERE user_id IN ({}) AND is_private = 0 \
             ORDER BY created_at DESC, id DESC LIMIT ?",
            POST_COLUMNS,
            placeholders(author_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in author_ids {
            query = query.bind(id);
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(post_from_row).collect()
    }

    pub async fn get_posts_by_author(
        &self,
        author_id: UserId,
        include_private: bool,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let sql = if include_private {
            format!(
                "SELECT {} FROM posts WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
                POST_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM posts WHERE user_id = ? AND is_private = 0 \
                 ORDER BY created_at DESC, id DESC LIMIT ?",
                POST_COLUMNS
            )
        };

        let rows = sqlx::query(&sql)
            .bind(author_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(post_from_row).collect()
    }

    pub async fn get_post_ids_by_author(&self, author_id: UserId) -> Result<Vec<PostId>> {
        let rows = sqlx::query("SELECT id FROM posts WHERE user_id = ?")
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| Ok(row.try_get("id")?)).collect()
    }

    /// Containment query over the JSON token array. Tokens are `\w+` and
    /// stored lowercased, so the quoted LIKE pattern cannot over-match.
    pub async fn get_posts_with_hashtag(&self, tag: &str, limit: i64) -> Result<Vec<Post>> {
        self.get_posts_with_token("hashtags", tag, limit).await
    }

    pub async fn get_posts_with_mention(&self, username: &str, limit: i64) -> Result<Vec<Post>> {
        self.get_posts_with_token("mentions", username, limit).await
    }

    async fn get_posts_with_token(&self, column: &str, token: &str, limit: i64) -> Result<Vec<Post>> {
        let pattern = format!("%\"{}\"%", token.to_lowercase());
        let sql = format!(
            "SELECT {} FROM posts WHERE is_private = 0 AND {} LIKE ? \
             ORDER BY created_at DESC, id DESC LIMIT ?",
            POST_COLUMNS, column
        );

        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(post_from_row).collect()
    }

    // -- likes ---------------------------------------------------------------

    pub async fn get_like(&self, post_id: PostId, user_id: UserId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    pub async fn insert_like(&self, post_id: PostId, user_id: UserId) -> Result<()> {
        let now = current_time_millis();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO likes (post_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(post_id)
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE posts SET likes_count = likes_count + 1 WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_like(&self, post_id: PostId, user_id: UserId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE posts SET likes_count = likes_count - 1 WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Likes on any of `post_ids`, newest first. Activity source.
    pub async fn get_likes_for_posts(&self, post_ids: &[PostId], limit: i64) -> Result<Vec<LikeRow>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT post_id, user_id, created_at FROM likes WHERE post_id IN ({}) \
             ORDER BY created_at DESC, id DESC LIMIT ?",
            placeholders(post_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in post_ids {
            query = query.bind(id);
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                Ok(LikeRow {
                    post_id: row.try_get("post_id")?,
                    user_id: row.try_get("user_id")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    // -- bookmarks -----------------------------------------------------------

    pub async fn get_bookmark(&self, post_id: PostId, user_id: UserId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM bookmarks WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    pub async fn insert_bookmark(&self, post_id: PostId, user_id: UserId) -> Result<()> {
        sqlx::query("INSERT INTO bookmarks (post_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(post_id)
            .bind(user_id)
            .bind(current_time_millis())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_bookmark(&self, post_id: PostId, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // -- reactions -----------------------------------------------------------

    /// One reaction row per (post, user); re-reacting replaces the kind.
    pub async fn upsert_reaction(
        &self,
        post_id: PostId,
        user_id: UserId,
        kind: ReactionKind,
    ) -> Result<()> {
        let now = current_time_millis();

        sqlx::query(
            "INSERT INTO reactions (post_id, user_id, kind, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (post_id, user_id) DO UPDATE SET kind = excluded.kind, updated_at = ?",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(kind.as_str())
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_reaction(&self, post_id: PostId, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reactions WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_user_reaction(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Option<ReactionKind>> {
        let row = sqlx::query("SELECT kind FROM reactions WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let kind: String = row.try_get("kind")?;
                Ok(Some(ReactionKind::parse(&kind).ok_or_else(|| {
                    anyhow!("unknown reaction kind: {}", kind)
                })?))
            }
            None => Ok(None),
        }
    }

    pub async fn get_reaction_counts(&self, post_id: PostId) -> Result<Vec<ReactionCount>> {
        let rows = sqlx::query(
            "SELECT kind, COUNT(*) AS count FROM reactions WHERE post_id = ? \
             GROUP BY kind ORDER BY count DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let kind: String = row.try_get("kind")?;
                Ok(ReactionCount {
                    kind: ReactionKind::parse(&kind)
                        .ok_or_else(|| anyhow!("unknown reaction kind: {}", kind))?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    // -- comments ------------------------------------------------------------

    pub async fn insert_comment(
        &self,
        post_id: PostId,
        user_id: UserId,
        content: &str,
        parent_id: Option<CommentId>,
    ) -> Result<Comment> {
        let now = current_time_millis();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO comments (post_id, user_id, content, parent_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .bind(parent_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();

        sqlx::query("UPDATE posts SET comments_count = comments_count + 1 WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Comment {
            id,
            post_id,
            user_id,
            content: content.to_string(),
            parent_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM comments WHERE id = ?",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(comment_from_row).transpose()
    }

    pub async fn get_comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM comments WHERE post_id = ? ORDER BY created_at ASC",
            COMMENT_COLUMNS
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(comment_from_row).collect()
    }

    /// Deletes a comment together with its direct replies and keeps the
    /// post's comment counter in step, all in one transaction.
    pub async fn delete_comment(&self, id: CommentId, post_id: PostId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let replies = sqlx::query("DELETE FROM comments WHERE parent_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let roots = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let removed = (replies.rows_affected() + roots.rows_affected()) as i64;
        sqlx::query("UPDATE posts SET comments_count = comments_count - ? WHERE id = ?")
            .bind(removed)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Comments on any of `post_ids`, newest first. Activity source.
    pub async fn get_comments_for_posts(
        &self,
        post_ids: &[PostId],
        limit: i64,
    ) -> Result<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM comments WHERE post_id IN ({}) ORDER BY created_at DESC, id DESC LIMIT ?",
            COMMENT_COLUMNS,
            placeholders(post_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in post_ids {
            query = query.bind(id);
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(comment_from_row).collect()
    }

    // -- collections ---------------------------------------------------------

    pub async fn insert_collection(&self, user_id: UserId, name: &str) -> Result<Collection> {
        let now = current_time_millis();

        let result = sqlx::query(
            "INSERT INTO collections (user_id, name, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Collection {
            id: result.last_insert_rowid(),
            user_id,
            name: name.to_string(),
            created_at: now,
        })
    }

    pub async fn get_collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        let row = sqlx::query("SELECT id, user_id, name, created_at FROM collections WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Collection {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                name: row.try_get("name")?,
                created_at: row.try_get("created_at")?,
            })
        })
        .transpose()
    }

    pub async fn get_collections_by_user(&self, user_id: UserId) -> Result<Vec<Collection>> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, created_at FROM collections \
             WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Collection {
                    id: row.try_get("id")?,
                    user_id: row.try_get("user_id")?,
                    name: row.try_get("name")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    pub async fn rename_collection(&self, id: CollectionId, name: &str) -> Result<()> {
        sqlx::query("UPDATE collections SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_collection(&self, id: CollectionId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM collection_items WHERE collection_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM collections WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Saving twice is a no-op; membership is a set.
    pub async fn insert_collection_item(&self, collection_id: CollectionId, post_id: PostId) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO collection_items (collection_id, post_id, created_at) \
             VALUES (?, ?, ?)",
        )
        .bind(collection_id)
        .bind(post_id)
        .bind(current_time_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_collection_item(&self, collection_id: CollectionId, post_id: PostId) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM collection_items WHERE collection_id = ? AND post_id = ?",
        )
        .bind(collection_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_collection_post_ids(&self, collection_id: CollectionId) -> Result<Vec<PostId>> {
        let rows = sqlx::query(
            "SELECT post_id FROM collection_items WHERE collection_id = ? ORDER BY created_at DESC",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| Ok(row.try_get("post_id")?)).collect()
    }

    pub async fn get_posts_by_ids(&self, ids: &[PostId]) -> Result<Vec<Post>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM posts WHERE id IN ({})",
            POST_COLUMNS,
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(post_from_row).collect()
    }

    // -- stories -------------------------------------------------------------

    pub async fn insert_story(
        &self,
        user_id: UserId,
        story: &NewStory,
        expires_at: i64,
    ) -> Result<Story> {
        let now = current_time_millis();

        let result = sqlx::query(
            "INSERT INTO stories (user_id, content, image_url, video_url, expires_at, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&story.content)
        .bind(&story.image_url)
        .bind(&story.video_url)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Story {
            id: result.last_insert_rowid(),
            user_id,
            content: story.content.clone(),
            image_url: story.image_url.clone(),
            video_url: story.video_url.clone(),
            expires_at,
            created_at: now,
        })
    }

    pub async fn get_stories_by_authors(&self, author_ids: &[UserId]) -> Result<Vec<Story>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, user_id, content, image_url, video_url, expires_at, created_at \
             FROM stories WHERE user_id IN ({}) ORDER BY created_at DESC",
            placeholders(author_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in author_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(story_from_row).collect()
    }
}
