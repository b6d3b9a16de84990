use crate::core::UserId;
use crate::error::{AppError, AppResult};

/// Identity of the caller for a single request. The authentication provider
/// is an external collaborator: by the time a request reaches this layer the
/// gateway has already verified the session token, so the context only
/// carries the resolved user id (or none for anonymous traffic).
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub user_id: Option<UserId>,
    pub request_id: String,
}

impl ViewerContext {
    pub fn new(user_id: Option<UserId>, request_id: String) -> Self {
        ViewerContext { user_id, request_id }
    }

    pub fn authenticated(user_id: UserId) -> Self {
        ViewerContext {
            user_id: Some(user_id),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn anonymous() -> Self {
        ViewerContext {
            user_id: None,
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Short-circuits actions that require a signed-in user before any
    /// network call is made.
    pub fn require_user(&self) -> AppResult<UserId> {
        self.user_id.ok_or_else(|| {
            AppError::Unauthorized("You must be signed in to perform this action".to_string())
        })
    }
}
