use std::sync::Arc;

use crate::core::{CollectionId, PostId};
use crate::error::{AppError, AppResult};
use crate::models::{Collection, Post};
use crate::store::Store;
use crate::viewer::ViewerContext;

pub struct CollectionService {
    store: Arc<Store>,
}

impl CollectionService {
    pub fn new(store: Arc<Store>) -> Self {
        CollectionService { store }
    }

    pub async fn create_collection(&self, vc: &ViewerContext, name: &str) -> AppResult<Collection> {
        let user_id = vc.require_user()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("A collection needs a name".to_string()));
        }

        Ok(self.store.insert_collection(user_id, name).await?)
    }

    pub async fn rename_collection(
        &self,
        vc: &ViewerContext,
        collection_id: CollectionId,
        name: &str,
    ) -> AppResult<()> {
        self.require_owned(vc, collection_id).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("A collection needs a name".to_string()));
        }

        self.store.rename_collection(collection_id, name).await?;
        Ok(())
    }

    pub async fn delete_collection(&self, vc: &ViewerContext, collection_id: CollectionId) -> AppResult<()> {
        self.require_owned(vc, collection_id).await?;
        self.store.delete_collection(collection_id).await?;
        Ok(())
    }

    pub async fn list_collections(&self, vc: &ViewerContext) -> AppResult<Vec<Collection>> {
        let user_id = vc.require_user()?;
        Ok(self.store.get_collections_by_user(user_id).await?)
    }

    /// Saving is idempotent; saving twice leaves one membership row.
    pub async fn save_post(
        &self,
        vc: &ViewerContext,
        collection_id: CollectionId,
        post_id: PostId,
    ) -> AppResult<()> {
        self.require_owned(vc, collection_id).await?;
        if self.store.get_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        self.store.insert_collection_item(collection_id, post_id).await?;
        Ok(())
    }

    pub async fn unsave_post(
        &self,
        vc: &ViewerContext,
        collection_id: CollectionId,
        post_id: PostId,
    ) -> AppResult<()> {
        self.require_owned(vc, collection_id).await?;
        self.store.delete_collection_item(collection_id, post_id).await?;
        Ok(())
    }

    /// Saved posts, resolved by id set after the membership fetch.
    pub async fn collection_posts(
        &self,
        vc: &ViewerContext,
        collection_id: CollectionId,
    ) -> AppResult<Vec<Post>> {
        self.require_owned(vc, collection_id).await?;

        let post_ids = self.store.get_collection_post_ids(collection_id).await?;
        let mut posts = self.store.get_posts_by_ids(&post_ids).await?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn require_owned(&self, vc: &ViewerContext, collection_id: CollectionId) -> AppResult<()> {
        let user_id = vc.require_user()?;

        let collection = self
            .store
            .get_collection(collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;
        if collection.user_id != user_id {
            return Err(AppError::Forbidden(
                "Collections can only be changed by their owner".to_string(),
            ));
        }
        Ok(())
    }
}
