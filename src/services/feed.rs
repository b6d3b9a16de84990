// Content-Visibility Composer: decides which posts a viewer may fetch in
// each feed context and assembles the result with fetch-then-hydrate
// pipelines. Any lookup failure aborts the whole composition; partial
// results are never returned.

use std::sync::Arc;
use tracing::warn;

use super::profile_summaries_by_id;
use crate::core::UserId;
use crate::error::{AppError, AppResult};
use crate::models::{ActivityEntry, ActivityKind, FollowStatus, Post, PostWithAuthor};
use crate::store::Store;
use crate::viewer::ViewerContext;

/// Most recent entries kept after merging the activity sources.
const ACTIVITY_LIMIT: i64 = 30;

pub struct FeedService {
    store: Arc<Store>,
}

impl FeedService {
    pub fn new(store: Arc<Store>) -> Self {
        FeedService { store }
    }

    /// Public posts, newest first.
    pub async fn explore_latest(&self, limit: i64) -> AppResult<Vec<PostWithAuthor>> {
        let posts = self.store.get_public_posts_latest(limit).await?;
        self.hydrate_authors(posts).await
    }

    /// Public posts ranked by the denormalized like counter.
    pub async fn explore_trending(&self, limit: i64) -> AppResult<Vec<PostWithAuthor>> {
        let posts = self.store.get_public_posts_trending(limit).await?;
        self.hydrate_authors(posts).await
    }

    /// Posts authored by profiles the viewer follows with an accepted edge.
    ///
    /// Filtering is on the coarse `is_private` flag only; the visibility
    /// enum's followers_only value is not consulted here, so such posts
    /// appear whenever their flag and enum disagree.
    pub async fn following_feed(&self, vc: &ViewerContext, limit: i64) -> AppResult<Vec<PostWithAuthor>> {
        let viewer_id = vc.require_user()?;

        let following = self.store.get_following_ids(viewer_id).await?;
        if following.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self.store.get_posts_by_authors(&following, limit).await?;
        self.hydrate_authors(posts).await
    }

    /// Posts shown on a profile page. Profile-level privacy gates before
    /// post-level visibility is consulted: a private profile shows zero
    /// posts to non-followers even if individual posts are public.
    pub async fn profile_posts(
        &self,
        vc: &ViewerContext,
        target_id: UserId,
        limit: i64,
    ) -> AppResult<Vec<PostWithAuthor>> {
        let posts = if vc.user_id == Some(target_id) {
            self.store.get_posts_by_author(target_id, true, limit).await?
        } else {
            let target = self
                .store
                .get_profile(target_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

            if target.is_private && !self.viewer_follows(vc, target_id).await? {
                return Ok(Vec::new());
            }

            self.store.get_posts_by_author(target_id, false, limit).await?
        };

        self.hydrate_authors(posts).await
    }

    /// Non-private posts whose hashtag array contains the queried token.
    pub async fn hashtag_posts(&self, tag: &str, limit: i64) -> AppResult<Vec<PostWithAuthor>> {
        let token = tag.trim_start_matches('#').to_lowercase();
        let posts = self.store.get_posts_with_hashtag(&token, limit).await?;
        self.hydrate_authors(posts).await
    }

    pub async fn mention_posts(&self, username: &str, limit: i64) -> AppResult<Vec<PostWithAuthor>> {
        let token = username.trim_start_matches('@').to_lowercase();
        let posts = self.store.get_posts_with_mention(&token, limit).await?;
        self.hydrate_authors(posts).await
    }

    /// Who-interacted-with-me feed: three independent sources fetched
    /// concurrently, merged, sorted by timestamp descending, capped.
    pub async fn activity(&self, vc: &ViewerContext) -> AppResult<Vec<ActivityEntry>> {
        let viewer_id = vc.require_user()?;

        let my_posts = self.store.get_post_ids_by_author(viewer_id).await?;

        let (likes, comments, follows) = tokio::join!(
            self.store.get_likes_for_posts(&my_posts, ACTIVITY_LIMIT),
            self.store.get_comments_for_posts(&my_posts, ACTIVITY_LIMIT),
            self.store.get_accepted_edges_targeting(viewer_id, ACTIVITY_LIMIT),
        );
        let (likes, comments, follows) = (likes?, comments?, follows?);

        let mut actor_ids: Vec<UserId> = Vec::new();
        actor_ids.extend(likes.iter().map(|l| l.user_id));
        actor_ids.extend(comments.iter().map(|c| c.user_id));
        actor_ids.extend(follows.iter().map(|f| f.follower_id));
        let actors = profile_summaries_by_id(&self.store, &actor_ids).await?;

        let mut entries: Vec<ActivityEntry> = Vec::new();
        for like in likes {
            if let Some(actor) = actors.get(&like.user_id) {
                entries.push(ActivityEntry {
                    kind: ActivityKind::Like,
                    actor: actor.clone(),
                    post_id: Some(like.post_id),
                    occurred_at: like.created_at,
                });
            }
        }
        for comment in comments {
            if let Some(actor) = actors.get(&comment.user_id) {
                entries.push(ActivityEntry {
                    kind: ActivityKind::Comment,
                    actor: actor.clone(),
                    post_id: Some(comment.post_id),
                    occurred_at: comment.created_at,
                });
            }
        }
        for follow in follows {
            if let Some(actor) = actors.get(&follow.follower_id) {
                entries.push(ActivityEntry {
                    kind: ActivityKind::Follow,
                    actor: actor.clone(),
                    post_id: None,
                    occurred_at: follow.updated_at,
                });
            }
        }

        entries.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        entries.truncate(ACTIVITY_LIMIT as usize);
        Ok(entries)
    }

    async fn viewer_follows(&self, vc: &ViewerContext, target_id: UserId) -> AppResult<bool> {
        let Some(viewer_id) = vc.user_id else {
            return Ok(false);
        };
        Ok(self
            .store
            .get_follow(viewer_id, target_id)
            .await?
            .map(|edge| edge.status == FollowStatus::Accepted)
            .unwrap_or(false))
    }

    /// Second pipeline phase: resolve author profiles with one batched
    /// lookup and merge in memory.
    async fn hydrate_authors(&self, posts: Vec<Post>) -> AppResult<Vec<PostWithAuthor>> {
        let ids: Vec<UserId> = posts.iter().map(|p| p.user_id).collect();
        let authors = profile_summaries_by_id(&self.store, &ids).await?;

        Ok(posts
            .into_iter()
            .filter_map(|post| match authors.get(&post.user_id) {
                Some(author) => Some(PostWithAuthor {
                    author: author.clone(),
                    post,
                }),
                None => {
                    warn!("dropping post {} with unknown author", post.id);
                    None
                }
            })
            .collect())
    }
}
