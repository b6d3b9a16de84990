use chrono::Duration;
use std::sync::Arc;

use crate::core::current_time_millis;
use crate::error::{AppError, AppResult};
use crate::models::{NewStory, Story};
use crate::store::Store;
use crate::viewer::ViewerContext;

pub struct StoryService {
    store: Arc<Store>,
}

impl StoryService {
    pub fn new(store: Arc<Store>) -> Self {
        StoryService { store }
    }

    /// Creates a story with a fixed 24 hour expiry stamped at creation.
    /// Exactly one of text, image or video must be populated.
    pub async fn create_story(&self, vc: &ViewerContext, story: &NewStory) -> AppResult<Story> {
        let user_id = vc.require_user()?;

        let populated = [
            story.content.as_deref().is_some_and(|c| !c.trim().is_empty()),
            story.image_url.is_some(),
            story.video_url.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();
        if populated != 1 {
            return Err(AppError::Validation(
                "A story needs exactly one of text, image or video".to_string(),
            ));
        }

        let expires_at = current_time_millis() + Duration::hours(24).num_milliseconds();
        Ok(self.store.insert_story(user_id, story, expires_at).await?)
    }

    /// Unexpired stories from the viewer's accepted follows and themselves.
    /// Expiry is advisory: rows past their timestamp are filtered out here
    /// for display but never deleted.
    pub async fn active_stories(&self, vc: &ViewerContext) -> AppResult<Vec<Story>> {
        let viewer_id = vc.require_user()?;

        let mut author_ids = self.store.get_following_ids(viewer_id).await?;
        author_ids.push(viewer_id);

        let now = current_time_millis();
        let stories = self.store.get_stories_by_authors(&author_ids).await?;
        Ok(stories.into_iter().filter(|s| s.expires_at > now).collect())
    }
}
