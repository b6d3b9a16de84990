use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::core::UserId;
use crate::error::{AppError, AppResult};
use crate::models::{NewProfile, Profile, ProfileUpdate};
use crate::store::Store;
use crate::viewer::ViewerContext;

// Lowercase letters, digits and underscores only.
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]{3,30}$").unwrap());

pub struct ProfileService {
    store: Arc<Store>,
}

impl ProfileService {
    pub fn new(store: Arc<Store>) -> Self {
        ProfileService { store }
    }

    /// Account-setup completion: creates the identity record for the signed
    /// in user. Runs once; the profile is never hard-deleted afterwards.
    pub async fn create_profile(&self, vc: &ViewerContext, profile: &NewProfile) -> AppResult<Profile> {
        let user_id = vc.require_user()?;

        if !USERNAME_RE.is_match(&profile.username) {
            return Err(AppError::Validation(
                "Username may only contain lowercase letters, numbers and underscores".to_string(),
            ));
        }
        if profile.display_name.trim().is_empty() {
            return Err(AppError::Validation("Display name is required".to_string()));
        }
        if self.store.get_profile(user_id).await?.is_some() {
            return Err(AppError::Validation("Profile already exists".to_string()));
        }
        if self
            .store
            .get_profile_by_username(&profile.username)
            .await?
            .is_some()
        {
            return Err(AppError::Validation("Username is already taken".to_string()));
        }

        Ok(self.store.create_profile(user_id, profile).await?)
    }

    /// Owner-only mutation of the caller's own profile.
    pub async fn update_profile(&self, vc: &ViewerContext, update: &ProfileUpdate) -> AppResult<Profile> {
        let user_id = vc.require_user()?;

        if self.store.get_profile(user_id).await?.is_none() {
            return Err(AppError::NotFound("Profile not found".to_string()));
        }
        if let Some(name) = &update.display_name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Display name is required".to_string()));
            }
        }

        Ok(self.store.update_profile(user_id, update).await?)
    }

    pub async fn get_profile(&self, user_id: UserId) -> AppResult<Profile> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    pub async fn get_by_username(&self, username: &str) -> AppResult<Profile> {
        self.store
            .get_profile_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }
}
