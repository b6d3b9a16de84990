// Feed routes, all backed by the visibility composer.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use super::viewer::Vc;
use crate::app_state::AppState;
use crate::core::UserId;
use crate::error::AppError;
use crate::models::{ActivityEntry, PostWithAuthor};
use crate::services::FeedService;

const DEFAULT_FEED_LIMIT: i64 = 50;

#[derive(Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

impl FeedQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, 200)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed/following", get(following_feed))
        .route("/explore/latest", get(explore_latest))
        .route("/explore/trending", get(explore_trending))
        .route("/users/{id}/posts", get(profile_posts))
        .route("/hashtags/{tag}/posts", get(hashtag_posts))
        .route("/mentions/{username}/posts", get(mention_posts))
        .route("/activity", get(activity))
}

async fn following_feed(
    State(state): State<AppState>,
    vc: Vc,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = FeedService::new(state.store.clone())
        .following_feed(&vc, query.limit())
        .await?;
    Ok(Json(posts))
}

async fn explore_latest(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = FeedService::new(state.store.clone())
        .explore_latest(query.limit())
        .await?;
    Ok(Json(posts))
}

async fn explore_trending(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = FeedService::new(state.store.clone())
        .explore_trending(query.limit())
        .await?;
    Ok(Json(posts))
}

async fn profile_posts(
    State(state): State<AppState>,
    vc: Vc,
    Path(user_id): Path<UserId>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = FeedService::new(state.store.clone())
        .profile_posts(&vc, user_id, query.limit())
        .await?;
    Ok(Json(posts))
}

async fn hashtag_posts(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = FeedService::new(state.store.clone())
        .hashtag_posts(&tag, query.limit())
        .await?;
    Ok(Json(posts))
}

async fn mention_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = FeedService::new(state.store.clone())
        .mention_posts(&username, query.limit())
        .await?;
    Ok(Json(posts))
}

async fn activity(
    State(state): State<AppState>,
    vc: Vc,
) -> Result<Json<Vec<ActivityEntry>>, AppError> {
    let entries = FeedService::new(state.store.clone()).activity(&vc).await?;
    Ok(Json(entries))
}
