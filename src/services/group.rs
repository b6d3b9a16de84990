use std::sync::Arc;
use tracing::warn;

use super::profile_summaries_by_id;
use crate::core::{GroupId, UserId};
use crate::error::{AppError, AppResult};
use crate::models::{Group, GroupMember, GroupMemberEntry, GroupRole, Message, MessageEntry, NewGroup};
use crate::realtime::{RealtimeEvent, RealtimeHub};
use crate::store::Store;
use crate::viewer::ViewerContext;

pub struct GroupService {
    store: Arc<Store>,
    realtime: Arc<RealtimeHub>,
}

impl GroupService {
    pub fn new(store: Arc<Store>, realtime: Arc<RealtimeHub>) -> Self {
        GroupService { store, realtime }
    }

    /// Creates a chat room; the creator is seeded as its first admin inside
    /// the same store transaction.
    pub async fn create_group(&self, vc: &ViewerContext, group: &NewGroup) -> AppResult<Group> {
        let creator_id = vc.require_user()?;

        if group.name.trim().is_empty() {
            return Err(AppError::Validation("A group needs a name".to_string()));
        }

        Ok(self.store.insert_group(creator_id, group).await?)
    }

    pub async fn get_group(&self, group_id: GroupId) -> AppResult<Group> {
        self.store
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))
    }

    pub async fn get_group_members(&self, group_id: GroupId) -> AppResult<Vec<GroupMemberEntry>> {
        self.get_group(group_id).await?;

        let members = self.store.get_group_members(group_id).await?;
        let ids: Vec<UserId> = members.iter().map(|m| m.user_id).collect();
        let profiles = profile_summaries_by_id(&self.store, &ids).await?;

        Ok(members
            .into_iter()
            .filter_map(|member| match profiles.get(&member.user_id) {
                Some(profile) => Some(GroupMemberEntry {
                    profile: profile.clone(),
                    member,
                }),
                None => {
                    warn!("dropping member row with unknown profile {}", member.user_id);
                    None
                }
            })
            .collect())
    }

    /// Self-service join, open to anyone for public groups. Private groups
    /// only grow through an admin's add_member.
    pub async fn join_group(&self, vc: &ViewerContext, group_id: GroupId) -> AppResult<GroupMember> {
        let user_id = vc.require_user()?;

        let group = self.get_group(group_id).await?;
        if group.is_private {
            return Err(AppError::Forbidden(
                "This group is private; a group admin must add you".to_string(),
            ));
        }
        if self.store.get_group_member(group_id, user_id).await?.is_some() {
            return Err(AppError::Validation("You are already a member of this group".to_string()));
        }

        Ok(self
            .store
            .insert_group_member(group_id, user_id, GroupRole::Member)
            .await?)
    }

    pub async fn add_member(
        &self,
        vc: &ViewerContext,
        group_id: GroupId,
        user_id: UserId,
        role: GroupRole,
    ) -> AppResult<GroupMember> {
        self.require_admin(vc, group_id).await?;

        if self.store.get_profile(user_id).await?.is_none() {
            return Err(AppError::NotFound("Profile not found".to_string()));
        }
        if self.store.get_group_member(group_id, user_id).await?.is_some() {
            return Err(AppError::Validation("Already a member of this group".to_string()));
        }

        Ok(self.store.insert_group_member(group_id, user_id, role).await?)
    }

    /// Role changes take effect silently; there is no audit trail and the
    /// affected member is not notified.
    pub async fn update_role(
        &self,
        vc: &ViewerContext,
        group_id: GroupId,
        user_id: UserId,
        role: GroupRole,
    ) -> AppResult<()> {
        self.require_admin(vc, group_id).await?;

        let member = self
            .store
            .get_group_member(group_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not a member of this group".to_string()))?;

        // Demoting the sole admin would orphan the group the same way a
        // leave would.
        if member.role == GroupRole::Admin
            && role == GroupRole::Member
            && self.store.count_group_admins(group_id).await? <= 1
        {
            return Err(AppError::Validation(
                "A group must keep at least one admin".to_string(),
            ));
        }

        self.store.update_group_member_role(group_id, user_id, role).await?;
        Ok(())
    }

    pub async fn remove_member(
        &self,
        vc: &ViewerContext,
        group_id: GroupId,
        user_id: UserId,
    ) -> AppResult<()> {
        self.require_admin(vc, group_id).await?;

        let member = self
            .store
            .get_group_member(group_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not a member of this group".to_string()))?;
        if member.role == GroupRole::Admin && self.store.count_group_admins(group_id).await? <= 1 {
            return Err(AppError::Validation(
                "A group must keep at least one admin".to_string(),
            ));
        }

        self.store.delete_group_member(group_id, user_id).await?;
        Ok(())
    }

    /// A member leaving on their own. The sole admin may not leave: the
    /// group must retain at least one admin.
    pub async fn leave_group(&self, vc: &ViewerContext, group_id: GroupId) -> AppResult<()> {
        let user_id = vc.require_user()?;

        let member = self
            .store
            .get_group_member(group_id, user_id)
            .await?
            .ok_or_else(|| AppError::Validation("You are not a member of this group".to_string()))?;

        if member.role == GroupRole::Admin && self.store.count_group_admins(group_id).await? <= 1 {
            return Err(AppError::Validation(
                "You are the only admin of this group. Promote another member before leaving"
                    .to_string(),
            ));
        }

        self.store.delete_group_member(group_id, user_id).await?;
        Ok(())
    }

    /// Appends to the room's message log and publishes the insert event for
    /// live subscribers.
    pub async fn send_message(
        &self,
        vc: &ViewerContext,
        group_id: GroupId,
        content: &str,
    ) -> AppResult<Message> {
        let user_id = vc.require_user()?;

        if content.trim().is_empty() {
            return Err(AppError::Validation("A message cannot be empty".to_string()));
        }
        self.require_member(vc, group_id).await?;

        let message = self.store.insert_message(group_id, user_id, content).await?;

        self.realtime.publish(RealtimeEvent::MessageInserted {
            group_id,
            message_id: message.id,
        });

        Ok(message)
    }

    /// Most recent messages joined with sender profiles, oldest first.
    pub async fn get_messages(
        &self,
        vc: &ViewerContext,
        group_id: GroupId,
        limit: i64,
    ) -> AppResult<Vec<MessageEntry>> {
        self.require_member(vc, group_id).await?;

        let messages = self.store.get_messages(group_id, limit).await?;
        let ids: Vec<UserId> = messages.iter().map(|m| m.user_id).collect();
        let senders = profile_summaries_by_id(&self.store, &ids).await?;

        Ok(messages
            .into_iter()
            .filter_map(|message| match senders.get(&message.user_id) {
                Some(sender) => Some(MessageEntry {
                    sender: sender.clone(),
                    message,
                }),
                None => {
                    warn!("dropping message {} with unknown sender", message.id);
                    None
                }
            })
            .collect())
    }

    pub async fn require_member(&self, vc: &ViewerContext, group_id: GroupId) -> AppResult<GroupMember> {
        let user_id = vc.require_user()?;

        self.store
            .get_group_member(group_id, user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("You are not a member of this group".to_string()))
    }

    async fn require_admin(&self, vc: &ViewerContext, group_id: GroupId) -> AppResult<GroupMember> {
        let member = self.require_member(vc, group_id).await?;
        if member.role != GroupRole::Admin {
            return Err(AppError::Forbidden(
                "Only a group admin can manage members".to_string(),
            ));
        }
        Ok(member)
    }
}
