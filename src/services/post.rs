use std::sync::Arc;

use crate::core::{current_time_millis, PostId};
use crate::error::{AppError, AppResult};
use crate::models::{EditHistoryEntry, FollowStatus, NewPost, Post, PostUpdate, Visibility};
use crate::store::Store;
use crate::text;
use crate::viewer::ViewerContext;

pub struct PostService {
    store: Arc<Store>,
}

impl PostService {
    pub fn new(store: Arc<Store>) -> Self {
        PostService { store }
    }

    /// Creates a post owned by the viewer. Hashtag and mention arrays are
    /// derived from the content here, at write time. A post marked
    /// visibility=private always carries the legacy private flag as well,
    /// so the coarse feed filters can never surface it.
    pub async fn create_post(&self, vc: &ViewerContext, new_post: &NewPost) -> AppResult<Post> {
        let user_id = vc.require_user()?;

        let has_body = new_post.content.as_deref().is_some_and(|c| !c.trim().is_empty())
            || new_post.image_url.is_some()
            || new_post.video_url.is_some()
            || !new_post.media_urls.is_empty();
        if !has_body {
            return Err(AppError::Validation(
                "A post needs text or at least one media attachment".to_string(),
            ));
        }

        let visibility = new_post.visibility.unwrap_or(Visibility::Public);
        let is_private = new_post.is_private.unwrap_or(false) || visibility == Visibility::Private;

        let content = new_post.content.clone();
        let now = current_time_millis();
        let post = Post {
            id: 0,
            user_id,
            hashtags: content.as_deref().map(text::extract_hashtags).unwrap_or_default(),
            mentions: content.as_deref().map(text::extract_mentions).unwrap_or_default(),
            content,
            image_url: new_post.image_url.clone(),
            video_url: new_post.video_url.clone(),
            media_urls: new_post.media_urls.clone(),
            media_metadata: new_post.media_metadata.clone(),
            is_private,
            visibility,
            likes_count: 0,
            comments_count: 0,
            edit_history: Vec::new(),
            edited_at: None,
            created_at: now,
            updated_at: now,
        };

        Ok(self.store.insert_post(&post).await?)
    }

    /// Owner-only edit. The prior content, visibility and the edit time are
    /// appended to the history log; existing entries are never rewritten.
    pub async fn edit_post(
        &self,
        vc: &ViewerContext,
        post_id: PostId,
        update: &PostUpdate,
    ) -> AppResult<Post> {
        let user_id = vc.require_user()?;

        let mut post = self
            .store
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden("Only the author can edit a post".to_string()));
        }

        let now = current_time_millis();
        post.edit_history.push(EditHistoryEntry {
            content: post.content.clone(),
            visibility: post.visibility,
            edited_at: now,
        });

        if let Some(content) = &update.content {
            post.hashtags = text::extract_hashtags(content);
            post.mentions = text::extract_mentions(content);
            post.content = Some(content.clone());
        }
        if let Some(visibility) = update.visibility {
            post.visibility = visibility;
        }
        if let Some(is_private) = update.is_private {
            post.is_private = is_private;
        }
        if post.visibility == Visibility::Private {
            post.is_private = true;
        }

        post.edited_at = Some(now);
        post.updated_at = now;

        self.store.update_post(&post).await?;
        Ok(post)
    }

    pub async fn delete_post(&self, vc: &ViewerContext, post_id: PostId) -> AppResult<()> {
        let user_id = vc.require_user()?;

        let post = self
            .store
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden("Only the author can delete a post".to_string()));
        }

        self.store.delete_post(post_id).await?;
        Ok(())
    }

    /// Single-post fetch with the same gating as the profile view: owner
    /// sees everything, others never see private-flagged posts or posts by
    /// private profiles they do not follow.
    pub async fn get_post(&self, vc: &ViewerContext, post_id: PostId) -> AppResult<Post> {
        let post = self
            .store
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if vc.user_id == Some(post.user_id) {
            return Ok(post);
        }
        if post.is_private || post.visibility == Visibility::Private {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let author = self
            .store
            .get_profile(post.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
        if author.is_private {
            let follows = match vc.user_id {
                Some(viewer_id) => self
                    .store
                    .get_follow(viewer_id, post.user_id)
                    .await?
                    .map(|edge| edge.status == FollowStatus::Accepted)
                    .unwrap_or(false),
                None => false,
            };
            if !follows {
                return Err(AppError::NotFound("Post not found".to_string()));
            }
        }

        Ok(post)
    }
}
