// Server-sent event streams over the realtime hub. Each event is a thin
// insert notification; the handler performs a secondary fetch to
// materialize the full joined record before emitting it. Rows that are
// already gone by fetch time are skipped. The subscription lives exactly as
// long as the response stream.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use super::viewer::Vc;
use crate::app_state::AppState;
use crate::core::GroupId;
use crate::error::AppResult;
use crate::models::{MessageEntry, PendingRequest};
use crate::realtime::RealtimeEvent;
use crate::services::GroupService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/realtime/groups/{id}/messages", get(group_messages))
        .route("/realtime/follow-requests", get(follow_requests))
}

/// Live message inserts for one room, members only.
async fn group_messages(
    State(state): State<AppState>,
    vc: Vc,
    Path(group_id): Path<GroupId>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    GroupService::new(state.store.clone(), state.realtime.clone())
        .require_member(&vc, group_id)
        .await?;

    let rx = state.realtime.subscribe();
    let store = state.store.clone();

    let stream = stream::unfold((rx, store), move |(mut rx, store)| async move {
        loop {
            match rx.recv().await {
                Ok(RealtimeEvent::MessageInserted {
                    group_id: event_group,
                    message_id,
                }) if event_group == group_id => {
                    let Ok(Some(message)) = store.get_message(message_id).await else {
                        continue;
                    };
                    let Ok(Some(sender)) = store.get_profile(message.user_id).await else {
                        continue;
                    };
                    let entry = MessageEntry {
                        sender: sender.summary(),
                        message,
                    };
                    match Event::default().event("message").json_data(&entry) {
                        Ok(event) => return Some((Ok(event), (rx, store))),
                        Err(_) => continue,
                    }
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Live pending follow requests targeting the signed-in user.
async fn follow_requests(
    State(state): State<AppState>,
    vc: Vc,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let viewer_id = vc.require_user()?;

    let rx = state.realtime.subscribe();
    let store = state.store.clone();

    let stream = stream::unfold((rx, store), move |(mut rx, store)| async move {
        loop {
            match rx.recv().await {
                Ok(RealtimeEvent::FollowRequested {
                    target_id,
                    follower_id,
                }) if target_id == viewer_id => {
                    let Ok(Some(edge)) = store.get_follow(follower_id, target_id).await else {
                        continue;
                    };
                    let Ok(Some(follower)) = store.get_profile(follower_id).await else {
                        continue;
                    };
                    let request = PendingRequest {
                        follower: follower.summary(),
                        requested_at: edge.created_at,
                    };
                    match Event::default().event("follow_request").json_data(&request) {
                        Ok(event) => return Some((Ok(event), (rx, store))),
                        Err(_) => continue,
                    }
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
