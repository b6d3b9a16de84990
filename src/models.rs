// Record models for every collection consumed from the backing store.
// Uniqueness, foreign-key and cascade invariants live in the store schema;
// these types only describe the shapes the application reads and writes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{
    CollectionId, CommentId, GroupId, MessageId, PostId, ProjectId, StoryId, TimeMs, UserId,
};

// ---------------------------------------------------------------------------
// Profiles

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: bool,
    pub followers_count: i64,
    pub following_count: i64,
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub nutech_id: Option<String>,
    pub department: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: TimeMs,
    pub updated_at: TimeMs,
}

impl Profile {
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            user_id: self.user_id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Public display fields used when hydrating joined records client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub nutech_id: Option<String>,
    pub department: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: Option<bool>,
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub department: Option<String>,
    pub phone_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Follows

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    Pending,
    Accepted,
}

impl FollowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowStatus::Pending => "pending",
            FollowStatus::Accepted => "accepted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(FollowStatus::Pending),
            "accepted" => Some(FollowStatus::Accepted),
            _ => None,
        }
    }
}

/// Tri-state answer for "does the viewer follow this user".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowState {
    NotFollowing,
    Pending,
    Following,
}

/// Directed follower -> following edge. At most one edge exists per ordered
/// pair; edges are deleted, never archived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub following_id: UserId,
    pub status: FollowStatus,
    pub created_at: TimeMs,
    pub updated_at: TimeMs,
}

/// Accepted edge joined with the counterpart profile's public fields.
#[derive(Debug, Clone, Serialize)]
pub struct FollowerEntry {
    pub profile: ProfileSummary,
    pub since: TimeMs,
}

/// Pending edge targeting the current user, joined with the requester.
#[derive(Debug, Clone, Serialize)]
pub struct PendingRequest {
    pub follower: ProfileSummary,
    pub requested_at: TimeMs,
}

// ---------------------------------------------------------------------------
// Posts

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    FollowersOnly,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::FollowersOnly => "followers_only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "followers_only" => Some(Visibility::FollowersOnly),
            _ => None,
        }
    }
}

/// Snapshot of a post's prior content appended to `edit_history` on every
/// edit. Entries are appended, never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditHistoryEntry {
    pub content: Option<String>,
    pub visibility: Visibility,
    pub edited_at: TimeMs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub media_urls: Vec<String>,
    pub media_metadata: Option<Value>,
    pub is_private: bool,
    pub visibility: Visibility,
    pub likes_count: i64,
    pub comments_count: i64,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub edit_history: Vec<EditHistoryEntry>,
    pub edited_at: Option<TimeMs>,
    pub created_at: TimeMs,
    pub updated_at: TimeMs,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: ProfileSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub media_metadata: Option<Value>,
    pub visibility: Option<Visibility>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
    pub is_private: Option<bool>,
}

// ---------------------------------------------------------------------------
// Stories

/// Ephemeral content unit. Expiry is advisory: checked client-side for
/// display, never enforced as deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub user_id: UserId,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub expires_at: TimeMs,
    pub created_at: TimeMs,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStory {
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Comments

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub created_at: TimeMs,
    pub updated_at: TimeMs,
}

/// One level of threading, materialized client-side: root comments carry a
/// `replies` list built by grouping on `parent_id`.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: ProfileSummary,
    pub replies: Vec<CommentReply>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentReply {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: ProfileSummary,
}

// ---------------------------------------------------------------------------
// Engagement

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeRow {
    pub post_id: PostId,
    pub user_id: UserId,
    pub created_at: TimeMs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Laugh,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Love => "love",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Wow => "wow",
            ReactionKind::Sad => "sad",
            ReactionKind::Angry => "angry",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(ReactionKind::Like),
            "love" => Some(ReactionKind::Love),
            "laugh" => Some(ReactionKind::Laugh),
            "wow" => Some(ReactionKind::Wow),
            "sad" => Some(ReactionKind::Sad),
            "angry" => Some(ReactionKind::Angry),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionCount {
    pub kind: ReactionKind,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionSummary {
    pub counts: Vec<ReactionCount>,
    pub viewer_reaction: Option<ReactionKind>,
}

// ---------------------------------------------------------------------------
// Collections

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: TimeMs,
}

// ---------------------------------------------------------------------------
// Groups

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub created_by: UserId,
    pub created_at: TimeMs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Admin,
    Member,
}

impl GroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Admin => "admin",
            GroupRole::Member => "member",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(GroupRole::Admin),
            "member" => Some(GroupRole::Member),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub role: GroupRole,
    pub joined_at: TimeMs,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupMemberEntry {
    #[serde(flatten)]
    pub member: GroupMember,
    pub profile: ProfileSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub group_id: GroupId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: TimeMs,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageEntry {
    #[serde(flatten)]
    pub message: Message,
    pub sender: ProfileSummary,
}

// ---------------------------------------------------------------------------
// Projects

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectVisibility {
    Public,
    Private,
    Internal,
}

impl ProjectVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectVisibility::Public => "public",
            ProjectVisibility::Private => "private",
            ProjectVisibility::Internal => "internal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(ProjectVisibility::Public),
            "private" => Some(ProjectVisibility::Private),
            "internal" => Some(ProjectVisibility::Internal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub visibility: ProjectVisibility,
    pub technologies: Vec<String>,
    pub attachments: Vec<String>,
    pub stars_count: i64,
    pub forks_count: i64,
    pub forked_from: Option<ProjectId>,
    pub created_at: TimeMs,
    pub updated_at: TimeMs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub visibility: Option<ProjectVisibility>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<ProjectVisibility>,
    pub technologies: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Activity

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Like,
    Comment,
    Follow,
}

/// One entry of the who-interacted-with-me feed, merged from three
/// independent sources and sorted by timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub actor: ProfileSummary,
    pub post_id: Option<PostId>,
    pub occurred_at: TimeMs,
}
