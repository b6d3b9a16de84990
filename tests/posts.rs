// Post lifecycle: token derivation, edit history, cascade delete, stories.

mod common;

use social_portal::error::AppError;
use social_portal::models::{NewPost, NewStory, PostUpdate, Visibility};

#[tokio::test]
async fn create_derives_hashtags_and_mentions() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let post = app.create_text_post(&alice, "hello #a @bob").await;
    assert_eq!(post.hashtags, vec!["a"]);
    assert_eq!(post.mentions, vec!["bob"]);
    assert!(post.edit_history.is_empty());
    assert!(post.edited_at.is_none());
}

#[tokio::test]
async fn edit_appends_history_and_rederives_tokens() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let post = app.create_text_post(&alice, "hello #a @bob").await;

    let edited = app
        .posts()
        .edit_post(
            &alice,
            post.id,
            &PostUpdate {
                content: Some("hi #c".to_string()),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.content.as_deref(), Some("hi #c"));
    assert_eq!(edited.hashtags, vec!["c"]);
    assert!(edited.mentions.is_empty());
    assert!(edited.edited_at.is_some());

    // The prior content, visibility and timestamp are snapshotted.
    assert_eq!(edited.edit_history.len(), 1);
    let entry = &edited.edit_history[0];
    assert_eq!(entry.content.as_deref(), Some("hello #a @bob"));
    assert_eq!(entry.visibility, Visibility::Public);
    assert!(entry.edited_at >= post.created_at);

    // A second edit appends; the first entry is untouched.
    let edited_again = app
        .posts()
        .edit_post(
            &alice,
            post.id,
            &PostUpdate {
                content: Some("final".to_string()),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited_again.edit_history.len(), 2);
    assert_eq!(edited_again.edit_history[0].content.as_deref(), Some("hello #a @bob"));
    assert_eq!(edited_again.edit_history[1].content.as_deref(), Some("hi #c"));
}

#[tokio::test]
async fn only_the_author_can_edit_or_delete() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "mine").await;

    let err = app
        .posts()
        .edit_post(&bob, post.id, &PostUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = app.posts().delete_post(&bob, post.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn an_empty_post_is_rejected_locally() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let err = app
        .posts()
        .create_post(&alice, &NewPost::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = app
        .posts()
        .create_post(
            &alice,
            &NewPost {
                content: Some("   ".to_string()),
                ..NewPost::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn private_visibility_always_sets_the_legacy_flag() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let post = app
        .posts()
        .create_post(
            &alice,
            &NewPost {
                content: Some("draft".to_string()),
                visibility: Some(Visibility::Private),
                is_private: Some(false),
                ..NewPost::default()
            },
        )
        .await
        .unwrap();
    assert!(post.is_private);

    // Same coupling on edit.
    let public = app.create_text_post(&alice, "soon private").await;
    let edited = app
        .posts()
        .edit_post(
            &alice,
            public.id,
            &PostUpdate {
                visibility: Some(Visibility::Private),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(edited.is_private);
}

#[tokio::test]
async fn delete_removes_dependents() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "short lived").await;
    app.engagement().toggle_like(&bob, post.id).await.unwrap();
    app.comments().add_comment(&bob, post.id, "bye", None).await.unwrap();

    app.posts().delete_post(&alice, post.id).await.unwrap();

    assert!(app.store.get_post(post.id).await.unwrap().is_none());
    assert!(app.store.get_comments_for_post(post.id).await.unwrap().is_empty());
    assert!(!app.store.get_like(post.id, 2).await.unwrap());
}

#[tokio::test]
async fn stories_expire_advisorily_after_a_day() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;
    app.follows().follow_user(&bob, 1).await.unwrap();

    let story = app
        .stories()
        .create_story(
            &alice,
            &NewStory {
                content: Some("fresh".to_string()),
                ..NewStory::default()
            },
        )
        .await
        .unwrap();
    assert!(story.expires_at > story.created_at);

    // An already-expired row stays in the store but is filtered at read.
    app.store
        .insert_story(
            1,
            &NewStory {
                content: Some("stale".to_string()),
                ..NewStory::default()
            },
            social_portal::core::current_time_millis() - 1_000,
        )
        .await
        .unwrap();

    let visible = app.stories().active_stories(&bob).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, story.id);

    // The stale row was never deleted.
    assert_eq!(app.store.get_stories_by_authors(&[1]).await.unwrap().len(), 2);
}

#[tokio::test]
async fn a_story_needs_exactly_one_medium() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let err = app
        .stories()
        .create_story(&alice, &NewStory::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = app
        .stories()
        .create_story(
            &alice,
            &NewStory {
                content: Some("both".to_string()),
                image_url: Some("https://cdn/img.png".to_string()),
                ..NewStory::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
