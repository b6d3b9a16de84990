// Media upload route. Uploads land in a named storage bucket under a
// `{user_id}/{timestamp}.{ext}` key and return a public URL.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::viewer::Vc;
use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::storage::{allowed_extension, is_known_bucket, object_key};

pub fn router() -> Router<AppState> {
    Router::new().route("/media/{bucket}", post(upload))
}

#[derive(Deserialize)]
struct UploadQuery {
    ext: String,
}

async fn upload(
    State(state): State<AppState>,
    vc: Vc,
    Path(bucket): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let user_id = vc.require_user()?;

    if !is_known_bucket(&bucket) {
        return Err(AppError::Validation(format!("Unknown bucket: {}", bucket)));
    }
    if !allowed_extension(&bucket, &query.ext) {
        return Err(AppError::Validation(format!(
            "File type .{} is not accepted for {}",
            query.ext, bucket
        )));
    }
    if body.is_empty() {
        return Err(AppError::Validation("Upload is empty".to_string()));
    }

    let key = object_key(user_id, &query.ext);
    let url = state.storage.put(&bucket, &key, &body).await?;

    Ok(Json(json!({ "url": url })))
}
