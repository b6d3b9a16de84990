// Likes, typed reactions, bookmarks, collections and comment threading.

mod common;

use social_portal::error::AppError;
use social_portal::models::ReactionKind;

#[tokio::test]
async fn toggle_like_flips_state_and_counter() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "likeable").await;

    assert!(app.engagement().toggle_like(&bob, post.id).await.unwrap());
    assert!(app.engagement().check_like(&bob, post.id).await.unwrap());
    assert_eq!(app.store.get_post(post.id).await.unwrap().unwrap().likes_count, 1);

    assert!(!app.engagement().toggle_like(&bob, post.id).await.unwrap());
    assert!(!app.engagement().check_like(&bob, post.id).await.unwrap());
    assert_eq!(app.store.get_post(post.id).await.unwrap().unwrap().likes_count, 0);
}

#[tokio::test]
async fn reacting_again_replaces_the_previous_kind() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "reactable").await;

    app.engagement()
        .set_reaction(&bob, post.id, ReactionKind::Like)
        .await
        .unwrap();
    app.engagement()
        .set_reaction(&bob, post.id, ReactionKind::Love)
        .await
        .unwrap();

    let summary = app.engagement().reaction_summary(&bob, post.id).await.unwrap();
    assert_eq!(summary.counts.len(), 1);
    assert_eq!(summary.counts[0].kind, ReactionKind::Love);
    assert_eq!(summary.counts[0].count, 1);
    assert_eq!(summary.viewer_reaction, Some(ReactionKind::Love));
}

#[tokio::test]
async fn clearing_a_reaction_removes_the_row() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "fleeting").await;

    app.engagement()
        .set_reaction(&bob, post.id, ReactionKind::Wow)
        .await
        .unwrap();
    app.engagement().clear_reaction(&bob, post.id).await.unwrap();

    let summary = app.engagement().reaction_summary(&bob, post.id).await.unwrap();
    assert!(summary.counts.is_empty());
    assert_eq!(summary.viewer_reaction, None);
}

#[tokio::test]
async fn bookmark_toggle_parity() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "save me").await;

    assert!(app.engagement().toggle_bookmark(&bob, post.id).await.unwrap());
    assert!(!app.engagement().toggle_bookmark(&bob, post.id).await.unwrap());
    assert!(app.engagement().toggle_bookmark(&bob, post.id).await.unwrap());
}

#[tokio::test]
async fn liking_a_missing_post_is_not_found() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let err = app.engagement().toggle_like(&alice, 9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn collections_hold_saved_posts() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&bob, "worth keeping").await;
    let collection = app.collections().create_collection(&alice, "Inspiration").await.unwrap();

    app.collections().save_post(&alice, collection.id, post.id).await.unwrap();
    // Saving again is a no-op, not an error.
    app.collections().save_post(&alice, collection.id, post.id).await.unwrap();

    let saved = app.collections().collection_posts(&alice, collection.id).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, post.id);

    app.collections().unsave_post(&alice, collection.id, post.id).await.unwrap();
    assert!(app
        .collections()
        .collection_posts(&alice, collection.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn collections_can_be_renamed_by_their_owner() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let collection = app.collections().create_collection(&alice, "Drafts").await.unwrap();
    app.collections()
        .rename_collection(&alice, collection.id, "Keepers")
        .await
        .unwrap();

    let names: Vec<String> = app
        .collections()
        .list_collections(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Keepers"]);

    let err = app
        .collections()
        .rename_collection(&alice, collection.id, "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn collections_are_owner_only() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let collection = app.collections().create_collection(&alice, "Private shelf").await.unwrap();

    let err = app
        .collections()
        .collection_posts(&bob, collection.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn comments_thread_one_level_deep() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "discuss").await;

    let root = app.comments().add_comment(&bob, post.id, "first", None).await.unwrap();
    app.comments()
        .add_comment(&alice, post.id, "reply", Some(root.id))
        .await
        .unwrap();

    let threads = app.comments().get_comments(post.id).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].comment.id, root.id);
    assert_eq!(threads[0].author.username, "bob");
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].author.username, "alice");

    assert_eq!(app.store.get_post(post.id).await.unwrap().unwrap().comments_count, 2);
}

#[tokio::test]
async fn replies_to_replies_are_rejected() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "discuss").await;
    let root = app.comments().add_comment(&bob, post.id, "first", None).await.unwrap();
    let reply = app
        .comments()
        .add_comment(&alice, post.id, "reply", Some(root.id))
        .await
        .unwrap();

    let err = app
        .comments()
        .add_comment(&bob, post.id, "nested", Some(reply.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn deleting_a_root_comment_takes_its_replies() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let post = app.create_text_post(&alice, "discuss").await;
    let root = app.comments().add_comment(&bob, post.id, "first", None).await.unwrap();
    app.comments()
        .add_comment(&alice, post.id, "reply", Some(root.id))
        .await
        .unwrap();

    app.comments().delete_comment(&bob, root.id).await.unwrap();

    assert!(app.comments().get_comments(post.id).await.unwrap().is_empty());
    assert_eq!(app.store.get_post(post.id).await.unwrap().unwrap().comments_count, 0);
}
