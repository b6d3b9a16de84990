// Core primitives shared across the store and service layers

/// Row id for a profile (allocated by the authentication provider, not by us)
pub type UserId = i64;

/// Row ids allocated by the backing store
pub type PostId = i64;
pub type CommentId = i64;
pub type StoryId = i64;
pub type CollectionId = i64;
pub type GroupId = i64;
pub type MessageId = i64;
pub type ProjectId = i64;

/// Epoch timestamp in milliseconds
pub type TimeMs = i64;

/// Current time in milliseconds since Unix epoch
pub fn current_time_millis() -> TimeMs {
    chrono::Utc::now().timestamp_millis()
}
