// Group chat routes.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::viewer::Vc;
use crate::app_state::AppState;
use crate::core::{GroupId, UserId};
use crate::error::AppError;
use crate::models::{Group, GroupMemberEntry, GroupRole, Message, MessageEntry, NewGroup};
use crate::services::GroupService;

const DEFAULT_MESSAGE_LIMIT: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{id}", get(get_group))
        .route("/groups/{id}/members", get(get_members))
        .route("/groups/{id}/members", post(add_member))
        .route("/groups/{id}/members/{user_id}", patch(update_role))
        .route("/groups/{id}/members/{user_id}", delete(remove_member))
        .route("/groups/{id}/join", post(join_group))
        .route("/groups/{id}/leave", post(leave_group))
        .route("/groups/{id}/messages", get(get_messages))
        .route("/groups/{id}/messages", post(send_message))
}

fn service(state: &AppState) -> GroupService {
    GroupService::new(state.store.clone(), state.realtime.clone())
}

async fn create_group(
    State(state): State<AppState>,
    vc: Vc,
    Json(body): Json<NewGroup>,
) -> Result<Json<Group>, AppError> {
    let group = service(&state).create_group(&vc, &body).await?;
    Ok(Json(group))
}

async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Group>, AppError> {
    let group = service(&state).get_group(group_id).await?;
    Ok(Json(group))
}

async fn get_members(
    State(state): State<AppState>,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Vec<GroupMemberEntry>>, AppError> {
    let members = service(&state).get_group_members(group_id).await?;
    Ok(Json(members))
}

#[derive(Deserialize)]
struct AddMemberBody {
    user_id: UserId,
    role: Option<GroupRole>,
}

async fn add_member(
    State(state): State<AppState>,
    vc: Vc,
    Path(group_id): Path<GroupId>,
    Json(body): Json<AddMemberBody>,
) -> Result<Json<Value>, AppError> {
    let member = service(&state)
        .add_member(&vc, group_id, body.user_id, body.role.unwrap_or(GroupRole::Member))
        .await?;
    Ok(Json(json!({ "user_id": member.user_id, "role": member.role })))
}

#[derive(Deserialize)]
struct RoleBody {
    role: GroupRole,
}

async fn update_role(
    State(state): State<AppState>,
    vc: Vc,
    Path((group_id, user_id)): Path<(GroupId, UserId)>,
    Json(body): Json<RoleBody>,
) -> Result<Json<Value>, AppError> {
    service(&state)
        .update_role(&vc, group_id, user_id, body.role)
        .await?;
    Ok(Json(json!({ "updated": true })))
}

async fn remove_member(
    State(state): State<AppState>,
    vc: Vc,
    Path((group_id, user_id)): Path<(GroupId, UserId)>,
) -> Result<Json<Value>, AppError> {
    service(&state).remove_member(&vc, group_id, user_id).await?;
    Ok(Json(json!({ "removed": true })))
}

async fn join_group(
    State(state): State<AppState>,
    vc: Vc,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Value>, AppError> {
    let member = service(&state).join_group(&vc, group_id).await?;
    Ok(Json(json!({ "joined": true, "role": member.role })))
}

async fn leave_group(
    State(state): State<AppState>,
    vc: Vc,
    Path(group_id): Path<GroupId>,
) -> Result<Json<Value>, AppError> {
    service(&state).leave_group(&vc, group_id).await?;
    Ok(Json(json!({ "left": true })))
}

#[derive(Deserialize)]
struct MessagesQuery {
    limit: Option<i64>,
}

async fn get_messages(
    State(state): State<AppState>,
    vc: Vc,
    Path(group_id): Path<GroupId>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageEntry>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT).clamp(1, 500);
    let messages = service(&state).get_messages(&vc, group_id, limit).await?;
    Ok(Json(messages))
}

#[derive(Deserialize)]
struct MessageBody {
    content: String,
}

async fn send_message(
    State(state): State<AppState>,
    vc: Vc,
    Path(group_id): Path<GroupId>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Message>, AppError> {
    let message = service(&state).send_message(&vc, group_id, &body.content).await?;
    Ok(Json(message))
}
