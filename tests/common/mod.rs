// Shared fixture: an in-memory store with the full schema plus per-domain
// service constructors, mirroring how the HTTP layer builds services per
// request.

#![allow(dead_code)]

use std::sync::Arc;

use social_portal::{
    models::{NewPost, NewProfile, Post, Visibility},
    realtime::RealtimeHub,
    services::{
        CollectionService, CommentService, EngagementService, FeedService, FollowService,
        GroupService, PostService, ProfileService, ProjectService, StoryService,
    },
    store::Store,
    viewer::ViewerContext,
};

pub struct TestApp {
    pub store: Arc<Store>,
    pub realtime: Arc<RealtimeHub>,
}

pub async fn setup() -> TestApp {
    let store = Store::connect("sqlite::memory:").await.unwrap();
    store.init().await.unwrap();

    TestApp {
        store: Arc::new(store),
        realtime: Arc::new(RealtimeHub::new(32)),
    }
}

impl TestApp {
    /// Registers a profile for `user_id` and returns its signed-in context.
    pub async fn create_user(&self, user_id: i64, username: &str, is_private: bool) -> ViewerContext {
        let vc = ViewerContext::authenticated(user_id);
        self.profiles()
            .create_profile(
                &vc,
                &NewProfile {
                    username: username.to_string(),
                    display_name: username.to_string(),
                    bio: None,
                    avatar_url: None,
                    is_private,
                    full_name: None,
                    dob: None,
                    nutech_id: None,
                    department: None,
                    phone_number: None,
                },
            )
            .await
            .unwrap();
        vc
    }

    pub async fn create_text_post(&self, vc: &ViewerContext, content: &str) -> Post {
        self.posts()
            .create_post(
                vc,
                &NewPost {
                    content: Some(content.to_string()),
                    visibility: Some(Visibility::Public),
                    ..NewPost::default()
                },
            )
            .await
            .unwrap()
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::new(self.store.clone())
    }

    pub fn follows(&self) -> FollowService {
        FollowService::new(self.store.clone(), self.realtime.clone())
    }

    pub fn feeds(&self) -> FeedService {
        FeedService::new(self.store.clone())
    }

    pub fn posts(&self) -> PostService {
        PostService::new(self.store.clone())
    }

    pub fn engagement(&self) -> EngagementService {
        EngagementService::new(self.store.clone())
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(self.store.clone())
    }

    pub fn collections(&self) -> CollectionService {
        CollectionService::new(self.store.clone())
    }

    pub fn stories(&self) -> StoryService {
        StoryService::new(self.store.clone())
    }

    pub fn groups(&self) -> GroupService {
        GroupService::new(self.store.clone(), self.realtime.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.store.clone())
    }
}
