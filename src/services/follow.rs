// Follow-State Service: owns the directed follow edge and its transitions.
//
// Per ordered (follower, following) pair:
//
//   [no edge] --follow (private target)--> pending --accept--> accepted
//   [no edge] --follow (public target)---> accepted
//   pending  --reject / unfollow--> [no edge]
//   accepted --unfollow--> [no edge]
//
// Edges are deleted, never archived. Counter maintenance on the accepted
// transitions happens in the store, not here.

use std::sync::Arc;
use tracing::warn;

use super::profile_summaries_by_id;
use crate::core::UserId;
use crate::error::{AppError, AppResult};
use crate::models::{FollowEdge, FollowState, FollowStatus, FollowerEntry, PendingRequest};
use crate::realtime::{RealtimeEvent, RealtimeHub};
use crate::store::Store;
use crate::viewer::ViewerContext;

pub struct FollowService {
    store: Arc<Store>,
    realtime: Arc<RealtimeHub>,
}

impl FollowService {
    pub fn new(store: Arc<Store>, realtime: Arc<RealtimeHub>) -> Self {
        FollowService { store, realtime }
    }

    /// Creates the edge for viewer -> target. Pending iff the target profile
    /// is private at creation time, accepted otherwise. Self-follow and
    /// duplicate edges are rejected locally, before any write.
    pub async fn follow_user(&self, vc: &ViewerContext, target_id: UserId) -> AppResult<FollowEdge> {
        let viewer_id = vc.require_user()?;

        if viewer_id == target_id {
            return Err(AppError::Validation("You cannot follow yourself".to_string()));
        }
        if self.store.get_follow(viewer_id, target_id).await?.is_some() {
            return Err(AppError::Validation(
                "You already follow or have requested to follow this user".to_string(),
            ));
        }

        let target = self
            .store
            .get_profile(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        let status = if target.is_private {
            FollowStatus::Pending
        } else {
            FollowStatus::Accepted
        };

        let edge = self.store.insert_follow(viewer_id, target_id, status).await?;

        if edge.status == FollowStatus::Pending {
            self.realtime.publish(RealtimeEvent::FollowRequested {
                target_id,
                follower_id: viewer_id,
            });
        }

        Ok(edge)
    }

    /// Removes the edge regardless of status, covering both "unfollow" and
    /// "cancel pending request". Absent edges are not an error: the end
    /// state is not_following either way.
    pub async fn unfollow_user(&self, vc: &ViewerContext, target_id: UserId) -> AppResult<()> {
        let viewer_id = vc.require_user()?;
        self.store.delete_follow(viewer_id, target_id).await?;
        Ok(())
    }

    /// pending -> accepted, where the acting user is the target.
    pub async fn accept_follow_request(
        &self,
        vc: &ViewerContext,
        follower_id: UserId,
    ) -> AppResult<()> {
        let viewer_id = vc.require_user()?;

        let accepted = self.store.accept_follow(follower_id, viewer_id).await?;
        if !accepted {
            return Err(AppError::Validation(
                "No pending follow request from this user".to_string(),
            ));
        }
        Ok(())
    }

    /// Deletes a pending edge where the acting user is the target.
    pub async fn reject_follow_request(
        &self,
        vc: &ViewerContext,
        follower_id: UserId,
    ) -> AppResult<()> {
        let viewer_id = vc.require_user()?;

        let rejected = self.store.delete_pending_follow(follower_id, viewer_id).await?;
        if !rejected {
            return Err(AppError::Validation(
                "No pending follow request from this user".to_string(),
            ));
        }
        Ok(())
    }

    /// Tri-state status from the viewer towards the target; an absent edge
    /// is not_following.
    pub async fn get_follow_status(
        &self,
        vc: &ViewerContext,
        target_id: UserId,
    ) -> AppResult<FollowState> {
        let viewer_id = vc.require_user()?;

        Ok(match self.store.get_follow(viewer_id, target_id).await? {
            None => FollowState::NotFollowing,
            Some(edge) if edge.status == FollowStatus::Accepted => FollowState::Following,
            Some(_) => FollowState::Pending,
        })
    }

    pub async fn get_followers(&self, user_id: UserId) -> AppResult<Vec<FollowerEntry>> {
        let edges = self.store.get_follower_edges(user_id).await?;
        self.hydrate_entries(edges, |edge| edge.follower_id).await
    }

    pub async fn get_following(&self, user_id: UserId) -> AppResult<Vec<FollowerEntry>> {
        let edges = self.store.get_following_edges(user_id).await?;
        self.hydrate_entries(edges, |edge| edge.following_id).await
    }

    /// Pending edges targeting the current user, joined with the requester.
    pub async fn get_pending_requests(&self, vc: &ViewerContext) -> AppResult<Vec<PendingRequest>> {
        let viewer_id = vc.require_user()?;

        let edges = self.store.get_pending_edges_targeting(viewer_id).await?;
        let ids: Vec<UserId> = edges.iter().map(|e| e.follower_id).collect();
        let profiles = profile_summaries_by_id(&self.store, &ids).await?;

        Ok(edges
            .into_iter()
            .filter_map(|edge| match profiles.get(&edge.follower_id) {
                Some(profile) => Some(PendingRequest {
                    follower: profile.clone(),
                    requested_at: edge.created_at,
                }),
                None => {
                    warn!("dropping request edge with unknown profile {}", edge.follower_id);
                    None
                }
            })
            .collect())
    }

    /// Two-step join: edge list first, then one batched profile lookup.
    async fn hydrate_entries(
        &self,
        edges: Vec<FollowEdge>,
        counterpart: impl Fn(&FollowEdge) -> UserId,
    ) -> AppResult<Vec<FollowerEntry>> {
        let ids: Vec<UserId> = edges.iter().map(&counterpart).collect();
        let profiles = profile_summaries_by_id(&self.store, &ids).await?;

        Ok(edges
            .into_iter()
            .filter_map(|edge| {
                let id = counterpart(&edge);
                match profiles.get(&id) {
                    Some(profile) => Some(FollowerEntry {
                        profile: profile.clone(),
                        since: edge.created_at,
                    }),
                    None => {
                        warn!("dropping follow edge with unknown profile {}", id);
                        None
                    }
                }
            })
            .collect())
    }
}
