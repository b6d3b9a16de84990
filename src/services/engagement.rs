use std::sync::Arc;

use crate::core::PostId;
use crate::error::{AppError, AppResult};
use crate::models::{ReactionKind, ReactionSummary};
use crate::store::Store;
use crate::viewer::ViewerContext;

pub struct EngagementService {
    store: Arc<Store>,
}

impl EngagementService {
    pub fn new(store: Arc<Store>) -> Self {
        EngagementService { store }
    }

    /// Flips the viewer's like on a post and returns the new state: true
    /// when the call liked, false when it unliked. The post's like counter
    /// moves with the row, inside the store transaction.
    pub async fn toggle_like(&self, vc: &ViewerContext, post_id: PostId) -> AppResult<bool> {
        let user_id = vc.require_user()?;
        self.require_post(post_id).await?;

        if self.store.get_like(post_id, user_id).await? {
            self.store.delete_like(post_id, user_id).await?;
            Ok(false)
        } else {
            self.store.insert_like(post_id, user_id).await?;
            Ok(true)
        }
    }

    pub async fn check_like(&self, vc: &ViewerContext, post_id: PostId) -> AppResult<bool> {
        let user_id = vc.require_user()?;
        Ok(self.store.get_like(post_id, user_id).await?)
    }

    pub async fn toggle_bookmark(&self, vc: &ViewerContext, post_id: PostId) -> AppResult<bool> {
        let user_id = vc.require_user()?;
        self.require_post(post_id).await?;

        if self.store.get_bookmark(post_id, user_id).await? {
            self.store.delete_bookmark(post_id, user_id).await?;
            Ok(false)
        } else {
            self.store.insert_bookmark(post_id, user_id).await?;
            Ok(true)
        }
    }

    /// Sets the viewer's typed reaction; reacting again with a different
    /// kind replaces the previous one.
    pub async fn set_reaction(
        &self,
        vc: &ViewerContext,
        post_id: PostId,
        kind: ReactionKind,
    ) -> AppResult<()> {
        let user_id = vc.require_user()?;
        self.require_post(post_id).await?;

        self.store.upsert_reaction(post_id, user_id, kind).await?;
        Ok(())
    }

    pub async fn clear_reaction(&self, vc: &ViewerContext, post_id: PostId) -> AppResult<()> {
        let user_id = vc.require_user()?;
        self.store.delete_reaction(post_id, user_id).await?;
        Ok(())
    }

    pub async fn reaction_summary(
        &self,
        vc: &ViewerContext,
        post_id: PostId,
    ) -> AppResult<ReactionSummary> {
        let counts = self.store.get_reaction_counts(post_id).await?;
        let viewer_reaction = match vc.user_id {
            Some(user_id) => self.store.get_user_reaction(post_id, user_id).await?,
            None => None,
        };

        Ok(ReactionSummary {
            counts,
            viewer_reaction,
        })
    }

    async fn require_post(&self, post_id: PostId) -> AppResult<()> {
        if self.store.get_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
        Ok(())
    }
}
