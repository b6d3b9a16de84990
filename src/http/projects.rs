// Project showcase routes.

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
use crate::core::{ProjectId, UserId};
use crate::error::AppError;
use crate::models::{NewProject, Project, ProjectUpdate};
use crate::services::ProjectService;

const DEFAULT_PROJECT_LIMIT: i64 = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects", get(list_projects))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}", patch(update_project))
        .route("/projects/{id}", delete(delete_project))
        .route("/projects/{id}/star", post(toggle_star))
        .route("/projects/{id}/fork", post(fork_project))
        .route("/users/{id}/projects", get(projects_by_owner))
}

async fn create_project(
    State(state): State<AppState>,
    vc: Vc,
    Json(body): Json<NewProject>,
) -> Result<Json<Project>, AppError> {
    let project = ProjectService::new(state.store.clone())
        .create_project(&vc, &body)
        .await?;
    Ok(Json(project))
}

#[derive(Deserialize)]
struct ProjectsQuery {
    limit: Option<i64>,
}

async fn list_projects(
    State(state): State<AppState>,
    vc: Vc,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<Vec<Project>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PROJECT_LIMIT).clamp(1, 200);
    let projects = ProjectService::new(state.store.clone())
        .list_projects(&vc, limit)
        .await?;
    Ok(Json(projects))
}

async fn get_project(
    State(state): State<AppState>,
    vc: Vc,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Project>, AppError> {
    let project = ProjectService::new(state.store.clone())
        .get_project(&vc, project_id)
        .await?;
    Ok(Json(project))
}

async fn update_project(
    State(state): State<AppState>,
    vc: Vc,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<ProjectUpdate>,
) -> Result<Json<Project>, AppError> {
    let project = ProjectService::new(state.store.clone())
        .update_project(&vc, project_id, &body)
        .await?;
    Ok(Json(project))
}

async fn delete_project(
    State(state): State<AppState>,
    vc: Vc,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Value>, AppError> {
    ProjectService::new(state.store.clone())
        .delete_project(&vc, project_id)
        .await?;
    Ok(Json(json!({ "deleted": true })))
}

async fn toggle_star(
    State(state): State<AppState>,
    vc: Vc,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Value>, AppError> {
    let starred = ProjectService::new(state.store.clone())
        .toggle_star(&vc, project_id)
        .await?;
    Ok(Json(json!({ "starred": starred })))
}

async fn fork_project(
    State(state): State<AppState>,
    vc: Vc,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Project>, AppError> {
    let fork = ProjectService::new(state.store.clone())
        .fork_project(&vc, project_id)
        .await?;
    Ok(Json(fork))
}

async fn projects_by_owner(
    State(state): State<AppState>,
    vc: Vc,
    Path(owner_id): Path<UserId>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = ProjectService::new(state.store.clone())
        .list_by_owner(&vc, owner_id)
        .await?;
    Ok(Json(projects))
}
