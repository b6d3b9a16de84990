// Domain services. Each service is a stateless namespace over the store,
// constructed per request; joined shapes are assembled here with a second
// batched profile lookup (fetch-then-hydrate), never by the store.

mod collection;
mod comment;
mod engagement;
mod feed;
mod follow;
mod group;
mod post;
mod profile;
mod project;
mod story;

pub use collection::CollectionService;
pub use comment::CommentService;
pub use engagement::EngagementService;
pub use feed::FeedService;
pub use follow::FollowService;
pub use group::GroupService;
pub use post::PostService;
pub use profile::ProfileService;
pub use project::ProjectService;
pub use story::StoryService;

use std::collections::HashMap;

use crate::core::UserId;
use crate::error::AppResult;
use crate::models::ProfileSummary;
use crate::store::Store;

/// Second phase of the fetch-then-hydrate pipeline: one batched lookup of
/// the counterpart profiles, keyed for in-memory merging.
pub(crate) async fn profile_summaries_by_id(
    store: &Store,
    ids: &[UserId],
) -> AppResult<HashMap<UserId, ProfileSummary>> {
    let mut unique: Vec<UserId> = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let profiles = store.get_profiles_by_ids(&unique).await?;
    Ok(profiles
        .into_iter()
        .map(|p| (p.user_id, p.summary()))
        .collect())
}
