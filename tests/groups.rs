// Group chat: creator auto-admin, the last-admin invariant, membership
// management and the message log with its insert events.

mod common;

use social_portal::error::AppError;
use social_portal::models::{GroupRole, NewGroup};
use social_portal::realtime::RealtimeEvent;

fn design_group() -> NewGroup {
    NewGroup {
        name: "Design".to_string(),
        description: None,
        is_private: false,
    }
}

#[tokio::test]
async fn creator_is_seeded_as_the_only_admin() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();

    let members = app.groups().get_group_members(group.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].member.user_id, 1);
    assert_eq!(members[0].member.role, GroupRole::Admin);
    assert_eq!(members[0].profile.username, "alice");
}

#[tokio::test]
async fn the_sole_admin_cannot_leave() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();
    app.groups().join_group(&bob, group.id).await.unwrap();

    let err = app.groups().leave_group(&alice, group.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Still a member afterwards.
    assert_eq!(app.groups().get_group_members(group.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn with_two_admins_either_may_leave() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();
    app.groups().join_group(&bob, group.id).await.unwrap();
    app.groups()
        .update_role(&alice, group.id, 2, GroupRole::Admin)
        .await
        .unwrap();

    app.groups().leave_group(&alice, group.id).await.unwrap();

    let members = app.groups().get_group_members(group.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].member.user_id, 2);
    assert_eq!(members[0].member.role, GroupRole::Admin);
}

#[tokio::test]
async fn the_sole_admin_cannot_be_demoted_or_removed() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    app.create_user(2, "bob", false).await;

    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();

    let err = app
        .groups()
        .update_role(&alice, group.id, 1, GroupRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = app.groups().remove_member(&alice, group.id, 1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn private_groups_grow_only_through_admins() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let group = app
        .groups()
        .create_group(
            &alice,
            &NewGroup {
                name: "Core team".to_string(),
                description: None,
                is_private: true,
            },
        )
        .await
        .unwrap();

    let err = app.groups().join_group(&bob, group.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    app.groups()
        .add_member(&alice, group.id, 2, GroupRole::Member)
        .await
        .unwrap();
    assert_eq!(app.groups().get_group_members(group.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn only_admins_manage_members() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;
    app.create_user(3, "carol", false).await;

    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();
    app.groups().join_group(&bob, group.id).await.unwrap();

    let err = app
        .groups()
        .add_member(&bob, group.id, 3, GroupRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = app
        .groups()
        .update_role(&bob, group.id, 1, GroupRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn messages_are_members_only_and_hydrated_in_order() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;
    let carol = app.create_user(3, "carol", false).await;

    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();
    app.groups().join_group(&bob, group.id).await.unwrap();

    app.groups().send_message(&alice, group.id, "welcome").await.unwrap();
    app.groups().send_message(&bob, group.id, "thanks").await.unwrap();

    let err = app
        .groups()
        .send_message(&carol, group.id, "let me in")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = app.groups().get_messages(&carol, group.id, 50).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let log = app.groups().get_messages(&bob, group.id, 50).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].message.content, "welcome");
    assert_eq!(log[0].sender.username, "alice");
    assert_eq!(log[1].message.content, "thanks");
    assert_eq!(log[1].sender.username, "bob");
}

#[tokio::test]
async fn sending_a_message_publishes_an_insert_event() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;

    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();

    let mut rx = app.realtime.subscribe();
    let message = app.groups().send_message(&alice, group.id, "ping").await.unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        RealtimeEvent::MessageInserted {
            group_id: group.id,
            message_id: message.id
        }
    );

    // The secondary fetch pattern: the event id resolves to the full row.
    let fetched = app.store.get_message(message.id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "ping");
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let group = app.groups().create_group(&alice, &design_group()).await.unwrap();

    let err = app.groups().send_message(&alice, group.id, "  ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
