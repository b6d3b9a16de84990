// Project showcase: the three-way visibility gate, star toggles, forks.

mod common;

use social_portal::error::AppError;
use social_portal::models::{NewProject, ProjectVisibility};
use social_portal::viewer::ViewerContext;

fn project(title: &str, visibility: ProjectVisibility) -> NewProject {
    NewProject {
        title: title.to_string(),
        description: None,
        visibility: Some(visibility),
        technologies: vec!["rust".to_string()],
        attachments: Vec::new(),
    }
}

#[tokio::test]
async fn listing_honors_the_three_way_visibility() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    app.projects()
        .create_project(&alice, &project("open", ProjectVisibility::Public))
        .await
        .unwrap();
    app.projects()
        .create_project(&alice, &project("campus", ProjectVisibility::Internal))
        .await
        .unwrap();
    app.projects()
        .create_project(&alice, &project("secret", ProjectVisibility::Private))
        .await
        .unwrap();

    let anon = app
        .projects()
        .list_projects(&ViewerContext::anonymous(), 50)
        .await
        .unwrap();
    assert_eq!(anon.len(), 1);
    assert_eq!(anon[0].title, "open");

    let signed_in: Vec<String> = app
        .projects()
        .list_projects(&bob, 50)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(signed_in.len(), 2);
    assert!(signed_in.contains(&"open".to_string()));
    assert!(signed_in.contains(&"campus".to_string()));

    let owner = app.projects().list_projects(&alice, 50).await.unwrap();
    assert_eq!(owner.len(), 3);
}

#[tokio::test]
async fn single_project_fetch_applies_the_same_gate() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let secret = app
        .projects()
        .create_project(&alice, &project("secret", ProjectVisibility::Private))
        .await
        .unwrap();
    let campus = app
        .projects()
        .create_project(&alice, &project("campus", ProjectVisibility::Internal))
        .await
        .unwrap();

    let err = app.projects().get_project(&bob, secret.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = app
        .projects()
        .get_project(&ViewerContext::anonymous(), campus.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(app.projects().get_project(&bob, campus.id).await.is_ok());
    assert!(app.projects().get_project(&alice, secret.id).await.is_ok());
}

#[tokio::test]
async fn star_toggle_parity_moves_the_counter() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let proj = app
        .projects()
        .create_project(&alice, &project("starry", ProjectVisibility::Public))
        .await
        .unwrap();

    assert!(app.projects().toggle_star(&bob, proj.id).await.unwrap());
    assert_eq!(
        app.projects().get_project(&bob, proj.id).await.unwrap().stars_count,
        1
    );

    assert!(!app.projects().toggle_star(&bob, proj.id).await.unwrap());
    assert_eq!(
        app.projects().get_project(&bob, proj.id).await.unwrap().stars_count,
        0
    );
}

#[tokio::test]
async fn fork_copies_the_project_and_bumps_the_source() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let source = app
        .projects()
        .create_project(&alice, &project("original", ProjectVisibility::Public))
        .await
        .unwrap();

    let fork = app.projects().fork_project(&bob, source.id).await.unwrap();
    assert_eq!(fork.user_id, 2);
    assert_eq!(fork.title, "original");
    assert_eq!(fork.forked_from, Some(source.id));
    assert_eq!(fork.stars_count, 0);

    let source_after = app.projects().get_project(&alice, source.id).await.unwrap();
    assert_eq!(source_after.forks_count, 1);
}

#[tokio::test]
async fn forking_your_own_or_an_invisible_project_fails() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let own = app
        .projects()
        .create_project(&alice, &project("own", ProjectVisibility::Public))
        .await
        .unwrap();
    let err = app.projects().fork_project(&alice, own.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let hidden = app
        .projects()
        .create_project(&alice, &project("hidden", ProjectVisibility::Private))
        .await
        .unwrap();
    let err = app.projects().fork_project(&bob, hidden.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn owner_updates_are_guarded() {
    let app = common::setup().await;
    let alice = app.create_user(1, "alice", false).await;
    let bob = app.create_user(2, "bob", false).await;

    let proj = app
        .projects()
        .create_project(&alice, &project("guarded", ProjectVisibility::Public))
        .await
        .unwrap();

    let err = app
        .projects()
        .delete_project(&bob, proj.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}
