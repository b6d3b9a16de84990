// Social portal routes: profiles, the follow edge, posts, engagement,
// comments, collections, stories.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::viewer::Vc;
use crate::app_state::AppState;
use crate::core::{CollectionId, CommentId, PostId, UserId};
use crate::error::AppError;
use crate::models::{
    Collection, FollowerEntry, NewPost, NewProfile, NewStory, PendingRequest, Post, PostUpdate,
    Profile, ProfileUpdate, ReactionKind, ReactionSummary, Story,
};
use crate::services::{
    CollectionService, CommentService, EngagementService, FollowService, PostService,
    ProfileService, StoryService,
};

pub fn router() -> Router<AppState> {
    Router::new()
        // Profiles
        .route("/profiles", post(create_profile))
        .route("/profiles/me", patch(update_profile))
        .route("/profiles/{username}", get(get_profile))
        // Follow edge
        .route("/users/{id}/follow", post(follow_user))
        .route("/users/{id}/follow", delete(unfollow_user))
        .route("/users/{id}/follow-status", get(follow_status))
        .route("/users/{id}/followers", get(followers))
        .route("/users/{id}/following", get(following))
        .route("/follow-requests", get(pending_requests))
        .route("/follow-requests/{follower_id}/accept", post(accept_request))
        .route("/follow-requests/{follower_id}/reject", post(reject_request))
        // Posts
        .route("/posts", post(create_post))
        .route("/posts/{id}", get(get_post))
        .route("/posts/{id}", patch(edit_post))
        .route("/posts/{id}", delete(delete_post))
        // Engagement
        .route("/posts/{id}/like", post(toggle_like))
        .route("/posts/{id}/like", get(check_like))
        .route("/posts/{id}/bookmark", post(toggle_bookmark))
        .route("/posts/{id}/reaction", put(set_reaction))
        .route("/posts/{id}/reaction", delete(clear_reaction))
        .route("/posts/{id}/reactions", get(reactions))
        // Comments
        .route("/posts/{id}/comments", get(get_comments))
        .route("/posts/{id}/comments", post(add_comment))
        .route("/comments/{id}", delete(delete_comment))
        // Collections
        .route("/collections", post(create_collection))
        .route("/collections", get(list_collections))
        .route("/collections/{id}", patch(rename_collection))
        .route("/collections/{id}", delete(delete_collection))
        .route("/collections/{id}/posts", get(collection_posts))
        .route("/collections/{id}/posts/{post_id}", put(save_post))
        .route("/collections/{id}/posts/{post_id}", delete(unsave_post))
        // Stories
        .route("/stories", post(create_story))
        .route("/stories/active", get(active_stories))
}

// -- profiles ----------------------------------------------------------------

async fn create_profile(
    State(state): State<AppState>,
    vc: Vc,
    Json(body): Json<NewProfile>,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::new(state.store.clone())
        .create_profile(&vc, &body)
        .await?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<AppState>,
    vc: Vc,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::new(state.store.clone())
        .update_profile(&vc, &body)
        .await?;
    Ok(Json(profile))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::new(state.store.clone())
        .get_by_username(&username)
        .await?;
    Ok(Json(profile))
}

// -- follow edge -------------------------------------------------------------

async fn follow_user(
    State(state): State<AppState>,
    vc: Vc,
    Path(target_id): Path<UserId>,
) -> Result<Json<Value>, AppError> {
    let edge = FollowService::new(state.store.clone(), state.realtime.clone())
        .follow_user(&vc, target_id)
        .await?;
    Ok(Json(json!({ "status": edge.status, "following_id": edge.following_id })))
}

async fn unfollow_user(
    State(state): State<AppState>,
    vc: Vc,
    Path(target_id): Path<UserId>,
) -> Result<Json<Value>, AppError> {
    FollowService::new(state.store.clone(), state.realtime.clone())
        .unfollow_user(&vc, target_id)
        .await?;
    Ok(Json(json!({ "unfollowed": true })))
}

async fn follow_status(
    State(state): State<AppState>,
    vc: Vc,
    Path(target_id): Path<UserId>,
) -> Result<Json<Value>, AppError> {
    let status = FollowService::new(state.store.clone(), state.realtime.clone())
        .get_follow_status(&vc, target_id)
        .await?;
    Ok(Json(json!({ "status": status })))
}

async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<FollowerEntry>>, AppError> {
    let entries = FollowService::new(state.store.clone(), state.realtime.clone())
        .get_followers(user_id)
        .await?;
    Ok(Json(entries))
}

async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<FollowerEntry>>, AppError> {
    let entries = FollowService::new(state.store.clone(), state.realtime.clone())
        .get_following(user_id)
        .await?;
    Ok(Json(entries))
}

async fn pending_requests(
    State(state): State<AppState>,
    vc: Vc,
) -> Result<Json<Vec<PendingRequest>>, AppError> {
    let requests = FollowService::new(state.store.clone(), state.realtime.clone())
        .get_pending_requests(&vc)
        .await?;
    Ok(Json(requests))
}

async fn accept_request(
    State(state): State<AppState>,
    vc: Vc,
    Path(follower_id): Path<UserId>,
) -> Result<Json<Value>, AppError> {
    FollowService::new(state.store.clone(), state.realtime.clone())
        .accept_follow_request(&vc, follower_id)
        .await?;
    Ok(Json(json!({ "accepted": true })))
}

async fn reject_request(
    State(state): State<AppState>,
    vc: Vc,
    Path(follower_id): Path<UserId>,
) -> Result<Json<Value>, AppError> {
    FollowService::new(state.store.clone(), state.realtime.clone())
        .reject_follow_request(&vc, follower_id)
        .await?;
    Ok(Json(json!({ "rejected": true })))
}

// -- posts -------------------------------------------------------------------

async fn create_post(
    State(state): State<AppState>,
    vc: Vc,
    Json(body): Json<NewPost>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.store.clone()).create_post(&vc, &body).await?;
    Ok(Json(post))
}

async fn get_post(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.store.clone()).get_post(&vc, post_id).await?;
    Ok(Json(post))
}

async fn edit_post(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
    Json(body): Json<PostUpdate>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.store.clone())
        .edit_post(&vc, post_id, &body)
        .await?;
    Ok(Json(post))
}

async fn delete_post(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
) -> Result<Json<Value>, AppError> {
    PostService::new(state.store.clone()).delete_post(&vc, post_id).await?;
    Ok(Json(json!({ "deleted": true })))
}

// -- engagement --------------------------------------------------------------

async fn toggle_like(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
) -> Result<Json<Value>, AppError> {
    let liked = EngagementService::new(state.store.clone())
        .toggle_like(&vc, post_id)
        .await?;
    Ok(Json(json!({ "liked": liked })))
}

async fn check_like(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
) -> Result<Json<Value>, AppError> {
    let liked = EngagementService::new(state.store.clone())
        .check_like(&vc, post_id)
        .await?;
    Ok(Json(json!({ "liked": liked })))
}

async fn toggle_bookmark(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
) -> Result<Json<Value>, AppError> {
    let bookmarked = EngagementService::new(state.store.clone())
        .toggle_bookmark(&vc, post_id)
        .await?;
    Ok(Json(json!({ "bookmarked": bookmarked })))
}

#[derive(Deserialize)]
struct ReactionBody {
    kind: ReactionKind,
}

async fn set_reaction(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
    Json(body): Json<ReactionBody>,
) -> Result<Json<Value>, AppError> {
    EngagementService::new(state.store.clone())
        .set_reaction(&vc, post_id, body.kind)
        .await?;
    Ok(Json(json!({ "reaction": body.kind })))
}

async fn clear_reaction(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
) -> Result<Json<Value>, AppError> {
    EngagementService::new(state.store.clone())
        .clear_reaction(&vc, post_id)
        .await?;
    Ok(Json(json!({ "cleared": true })))
}

async fn reactions(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
) -> Result<Json<ReactionSummary>, AppError> {
    let summary = EngagementService::new(state.store.clone())
        .reaction_summary(&vc, post_id)
        .await?;
    Ok(Json(summary))
}

// -- comments ----------------------------------------------------------------

#[derive(Deserialize)]
struct CommentBody {
    content: String,
    parent_id: Option<CommentId>,
}

async fn add_comment(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<PostId>,
    Json(body): Json<CommentBody>,
) -> Result<Json<Value>, AppError> {
    let comment = CommentService::new(state.store.clone())
        .add_comment(&vc, post_id, &body.content, body.parent_id)
        .await?;
    Ok(Json(serde_json::to_value(comment)?))
}

async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
) -> Result<Json<Value>, AppError> {
    let threads = CommentService::new(state.store.clone()).get_comments(post_id).await?;
    Ok(Json(serde_json::to_value(threads)?))
}

async fn delete_comment(
    State(state): State<AppState>,
    vc: Vc,
    Path(comment_id): Path<CommentId>,
) -> Result<Json<Value>, AppError> {
    CommentService::new(state.store.clone())
        .delete_comment(&vc, comment_id)
        .await?;
    Ok(Json(json!({ "deleted": true })))
}

// -- collections -------------------------------------------------------------

#[derive(Deserialize)]
struct CollectionBody {
    name: String,
}

async fn create_collection(
    State(state): State<AppState>,
    vc: Vc,
    Json(body): Json<CollectionBody>,
) -> Result<Json<Collection>, AppError> {
    let collection = CollectionService::new(state.store.clone())
        .create_collection(&vc, &body.name)
        .await?;
    Ok(Json(collection))
}

async fn list_collections(
    State(state): State<AppState>,
    vc: Vc,
) -> Result<Json<Vec<Collection>>, AppError> {
    let collections = CollectionService::new(state.store.clone())
        .list_collections(&vc)
        .await?;
    Ok(Json(collections))
}

async fn rename_collection(
    State(state): State<AppState>,
    vc: Vc,
    Path(collection_id): Path<CollectionId>,
    Json(body): Json<CollectionBody>,
) -> Result<Json<Value>, AppError> {
    CollectionService::new(state.store.clone())
        .rename_collection(&vc, collection_id, &body.name)
        .await?;
    Ok(Json(json!({ "renamed": true })))
}

async fn delete_collection(
    State(state): State<AppState>,
    vc: Vc,
    Path(collection_id): Path<CollectionId>,
) -> Result<Json<Value>, AppError> {
    CollectionService::new(state.store.clone())
        .delete_collection(&vc, collection_id)
        .await?;
    Ok(Json(json!({ "deleted": true })))
}

async fn collection_posts(
    State(state): State<AppState>,
    vc: Vc,
    Path(collection_id): Path<CollectionId>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = CollectionService::new(state.store.clone())
        .collection_posts(&vc, collection_id)
        .await?;
    Ok(Json(posts))
}

async fn save_post(
    State(state): State<AppState>,
    vc: Vc,
    Path((collection_id, post_id)): Path<(CollectionId, PostId)>,
) -> Result<Json<Value>, AppError> {
    CollectionService::new(state.store.clone())
        .save_post(&vc, collection_id, post_id)
        .await?;
    Ok(Json(json!({ "saved": true })))
}

async fn unsave_post(
    State(state): State<AppState>,
    vc: Vc,
    Path((collection_id, post_id)): Path<(CollectionId, PostId)>,
) -> Result<Json<Value>, AppError> {
    CollectionService::new(state.store.clone())
        .unsave_post(&vc, collection_id, post_id)
        .await?;
    Ok(Json(json!({ "removed": true })))
}

// -- stories -----------------------------------------------------------------

async fn create_story(
    State(state): State<AppState>,
    vc: Vc,
    Json(body): Json<NewStory>,
) -> Result<Json<Story>, AppError> {
    let story = StoryService::new(state.store.clone()).create_story(&vc, &body).await?;
    Ok(Json(story))
}

async fn active_stories(
    State(state): State<AppState>,
    vc: Vc,
) -> Result<Json<Vec<Story>>, AppError> {
    let stories = StoryService::new(state.store.clone()).active_stories(&vc).await?;
    Ok(Json(stories))
}

