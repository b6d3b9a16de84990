use std::sync::Arc;
use tracing::warn;

use super::profile_summaries_by_id;
use crate::core::{CommentId, PostId, UserId};
use crate::error::{AppError, AppResult};
use crate::models::{Comment, CommentReply, CommentThread};
use crate::store::Store;
use crate::viewer::ViewerContext;

pub struct CommentService {
    store: Arc<Store>,
}

impl CommentService {
    pub fn new(store: Arc<Store>) -> Self {
        CommentService { store }
    }

    /// Adds a comment, optionally as a reply. Threading is one level deep:
    /// the parent must be a root comment on the same post.
    pub async fn add_comment(
        &self,
        vc: &ViewerContext,
        post_id: PostId,
        content: &str,
        parent_id: Option<CommentId>,
    ) -> AppResult<Comment> {
        let user_id = vc.require_user()?;

        if content.trim().is_empty() {
            return Err(AppError::Validation("A comment cannot be empty".to_string()));
        }
        if self.store.get_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        if let Some(parent_id) = parent_id {
            let parent = self
                .store
                .get_comment(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
            if parent.post_id != post_id {
                return Err(AppError::Validation(
                    "Reply must target a comment on the same post".to_string(),
                ));
            }
            if parent.parent_id.is_some() {
                return Err(AppError::Validation(
                    "Replies can only target a top-level comment".to_string(),
                ));
            }
        }

        Ok(self
            .store
            .insert_comment(post_id, user_id, content.trim(), parent_id)
            .await?)
    }

    pub async fn delete_comment(&self, vc: &ViewerContext, comment_id: CommentId) -> AppResult<()> {
        let user_id = vc.require_user()?;

        let comment = self
            .store
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
        if comment.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can delete a comment".to_string(),
            ));
        }

        self.store.delete_comment(comment_id, comment.post_id).await?;
        Ok(())
    }

    /// Root comments with their `replies` lists, built by grouping on
    /// `parent_id` after a single flat fetch; authors hydrated in one batch.
    pub async fn get_comments(&self, post_id: PostId) -> AppResult<Vec<CommentThread>> {
        let comments = self.store.get_comments_for_post(post_id).await?;

        let author_ids: Vec<UserId> = comments.iter().map(|c| c.user_id).collect();
        let authors = profile_summaries_by_id(&self.store, &author_ids).await?;

        let (roots, replies): (Vec<Comment>, Vec<Comment>) =
            comments.into_iter().partition(|c| c.parent_id.is_none());

        let mut threads: Vec<CommentThread> = Vec::with_capacity(roots.len());
        for root in roots {
            let Some(author) = authors.get(&root.user_id) else {
                warn!("dropping comment {} with unknown author", root.id);
                continue;
            };
            threads.push(CommentThread {
                author: author.clone(),
                comment: root,
                replies: Vec::new(),
            });
        }

        for reply in replies {
            let Some(author) = authors.get(&reply.user_id) else {
                warn!("dropping reply {} with unknown author", reply.id);
                continue;
            };
            if let Some(thread) = threads
                .iter_mut()
                .find(|t| Some(t.comment.id) == reply.parent_id)
            {
                thread.replies.push(CommentReply {
                    author: author.clone(),
                    comment: reply,
                });
            }
        }

        Ok(threads)
    }
}
