// Follow edge state machine: creation against public and private targets,
// accept/reject transitions, idempotent teardown, and the hydrated lists.

mod common;

use social_portal::error::AppError;
use social_portal::models::{FollowState, FollowStatus};
use social_portal::realtime::RealtimeEvent;
use social_portal::viewer::ViewerContext;

#[tokio::test]
async fn self_follow_is_rejected_before_any_write() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let err = app.follows().follow_user(&alice, 1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(app.store.get_follow(1, 1).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_follow_is_rejected() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    app.create_user(2, "bob", false).await;

    app.follows().follow_user(&alice, 2).await.unwrap();
    let err = app.follows().follow_user(&alice, 2).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn following_a_public_target_is_accepted_immediately() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    app.create_user(2, "bob", false).await;

    let edge = app.follows().follow_user(&alice, 2).await.unwrap();
    assert_eq!(edge.status, FollowStatus::Accepted);

    let status = app.follows().get_follow_status(&alice, 2).await.unwrap();
    assert_eq!(status, FollowState::Following);

    // Counters move with the accepted edge, in the store.
    let bob = app.profiles().get_profile(2).await.unwrap();
    assert_eq!(bob.followers_count, 1);
    let alice_profile = app.profiles().get_profile(1).await.unwrap();
    assert_eq!(alice_profile.following_count, 1);
}

#[tokio::test]
async fn private_target_goes_through_pending_then_accept() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let sara = app.create_user(2, "sara", true).await;

    let edge = app.follows().follow_user(&alice, 2).await.unwrap();
    assert_eq!(edge.status, FollowStatus::Pending);
    assert_eq!(
        app.follows().get_follow_status(&alice, 2).await.unwrap(),
        FollowState::Pending
    );

    // No counters while pending.
    assert_eq!(app.profiles().get_profile(2).await.unwrap().followers_count, 0);

    app.follows().accept_follow_request(&sara, 1).await.unwrap();
    assert_eq!(
        app.follows().get_follow_status(&alice, 2).await.unwrap(),
        FollowState::Following
    );
    assert_eq!(app.profiles().get_profile(2).await.unwrap().followers_count, 1);
}

#[tokio::test]
async fn reject_deletes_the_pending_edge() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let sara = app.create_user(2, "sara", true).await;

    app.follows().follow_user(&alice, 2).await.unwrap();
    app.follows().reject_follow_request(&sara, 1).await.unwrap();

    assert_eq!(
        app.follows().get_follow_status(&alice, 2).await.unwrap(),
        FollowState::NotFollowing
    );
    assert!(app.store.get_follow(1, 2).await.unwrap().is_none());

    // The pair can start over.
    let edge = app.follows().follow_user(&alice, 2).await.unwrap();
    assert_eq!(edge.status, FollowStatus::Pending);
}

#[tokio::test]
async fn unfollow_cancels_a_pending_request() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    app.create_user(2, "sara", true).await;

    app.follows().follow_user(&alice, 2).await.unwrap();
    app.follows().unfollow_user(&alice, 2).await.unwrap();

    assert_eq!(
        app.follows().get_follow_status(&alice, 2).await.unwrap(),
        FollowState::NotFollowing
    );
}

#[tokio::test]
async fn unfollow_without_an_edge_is_not_an_error() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    app.create_user(2, "bob", false).await;

    app.follows().unfollow_user(&alice, 2).await.unwrap();
    assert_eq!(
        app.follows().get_follow_status(&alice, 2).await.unwrap(),
        FollowState::NotFollowing
    );

    // Unfollow after a real follow, then again: same terminal state.
    app.follows().follow_user(&alice, 2).await.unwrap();
    app.follows().unfollow_user(&alice, 2).await.unwrap();
    app.follows().unfollow_user(&alice, 2).await.unwrap();
    assert_eq!(app.profiles().get_profile(2).await.unwrap().followers_count, 0);
}

#[tokio::test]
async fn accept_without_a_pending_edge_fails() {
    let app = common::setup().await;
    app.create_user(1, "alice", false).await;
    let sara = app.create_user(2, "sara", true).await;

    let err = app.follows().accept_follow_request(&sara, 1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn accept_does_not_touch_an_already_accepted_edge() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    app.follows().follow_user(&alice, 2).await.unwrap();
    let err = app.follows().accept_follow_request(&bob, 1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Counters unchanged by the failed accept.
    assert_eq!(app.profiles().get_profile(2).await.unwrap().followers_count, 1);
}

#[tokio::test]
async fn lists_join_counterpart_profiles_and_skip_pending() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;
    app.create_user(3, "sara", true).await;

    app.follows().follow_user(&alice, 2).await.unwrap();
    app.follows().follow_user(&alice, 3).await.unwrap(); // pending
    app.follows().follow_user(&bob, 1).await.unwrap();

    let following = app.follows().get_following(1).await.unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].profile.username, "bob");

    let followers = app.follows().get_followers(1).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].profile.username, "bob");
}

#[tokio::test]
async fn pending_requests_are_joined_with_the_requester() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;
    let sara = app.create_user(3, "sara", true).await;

    app.follows().follow_user(&alice, 3).await.unwrap();
    app.follows().follow_user(&bob, 3).await.unwrap();

    let requests = app.follows().get_pending_requests(&sara).await.unwrap();
    assert_eq!(requests.len(), 2);
    let usernames: Vec<&str> = requests.iter().map(|r| r.follower.username.as_str()).collect();
    assert!(usernames.contains(&"alice"));
    assert!(usernames.contains(&"bob"));
}

#[tokio::test]
async fn follow_requires_a_signed_in_user() {
    let app = common::setup().await;
    app.create_user(1, "alice", false).await;

    let err = app
        .follows()
        .follow_user(&ViewerContext::anonymous(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn pending_request_publishes_an_insert_event() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    app.create_user(2, "sara", true).await;

    let mut rx = app.realtime.subscribe();
    app.follows().follow_user(&alice, 2).await.unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        RealtimeEvent::FollowRequested {
            target_id: 2,
            follower_id: 1
        }
    );
}
