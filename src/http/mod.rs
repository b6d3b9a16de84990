// HTTP surface: per-domain routers nested under /api/v1, a viewer-context
// middleware, and static serving of the storage root for public media URLs.

pub mod events;
pub mod feeds;
pub mod groups;
pub mod media;
pub mod projects;
pub mod social;
pub mod viewer;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::app_state::AppState;

pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(social::router())
        .merge(feeds::router())
        .merge(groups::router())
        .merge(projects::router())
        .merge(media::router())
        .merge(events::router())
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", api)
        .nest_service("/storage", ServeDir::new(&state.config.storage.root))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(viewer::viewer_context_middleware)),
        )
}
