// Seeds a database with demo profiles, follows, posts, a chat group and
// showcase projects, exercising the real service paths.

use rand::Rng;
use std::sync::Arc;

use social_portal::{
    config::Config,
    error::AppResult,
    models::{NewGroup, NewPost, NewProfile, NewProject, ProjectVisibility, Visibility},
    realtime::RealtimeHub,
    services::{
        EngagementService, FollowService, GroupService, PostService, ProfileService,
        ProjectService,
    },
    store::Store,
    viewer::ViewerContext,
};

const DEMO_USERS: &[(&str, &str, bool)] = &[
    ("ayesha_k", "Ayesha Khan", false),
    ("bilal_dev", "Bilal Ahmed", false),
    ("cs_sara", "Sara Iqbal", true),
    ("hamza_designs", "Hamza Raza", false),
    ("maryam_t", "Maryam Tariq", true),
];

const DEMO_POSTS: &[&str] = &[
    "Campus fest photos are up! #campusfest #photography",
    "Shipped the first cut of our compiler project #rustlang @bilal_dev",
    "Looking for teammates for the hackathon #hackathon",
    "Late night lab session #fyp",
    "New design drop, feedback welcome @hamza_designs #uidesign",
];

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    println!("Seeding demo data into {}", config.database.url);

    let store = Store::connect(&config.database.url).await?;
    store.init().await?;
    let store = Arc::new(store);
    let realtime = Arc::new(RealtimeHub::new(config.realtime.channel_capacity));

    let profiles = ProfileService::new(store.clone());
    let follows = FollowService::new(store.clone(), realtime.clone());
    let posts = PostService::new(store.clone());
    let engagement = EngagementService::new(store.clone());
    let groups = GroupService::new(store.clone(), realtime.clone());
    let projects = ProjectService::new(store.clone());

    let mut rng = rand::rng();

    // Profiles: caller ids stand in for the auth provider's user ids.
    let mut viewers = Vec::new();
    for (i, (username, display_name, is_private)) in DEMO_USERS.iter().enumerate() {
        let vc = ViewerContext::authenticated(i as i64 + 1);
        profiles
            .create_profile(
                &vc,
                &NewProfile {
                    username: username.to_string(),
                    display_name: display_name.to_string(),
                    bio: Some("Demo account".to_string()),
                    avatar_url: None,
                    is_private: *is_private,
                    full_name: Some(display_name.to_string()),
                    dob: None,
                    nutech_id: Some(format!("NT-{:04}", 1000 + i)),
                    department: Some("Computer Science".to_string()),
                    phone_number: None,
                },
            )
            .await?;
        viewers.push(vc);
    }
    println!("Created {} profiles", viewers.len());

    // A loose follow graph; requests to private targets stay pending.
    for follower in &viewers {
        for target in &viewers {
            if follower.user_id == target.user_id || rng.random_bool(0.5) {
                continue;
            }
            let _ = follows.follow_user(follower, target.user_id.unwrap()).await;
        }
    }

    // Posts with derived hashtags and mentions, plus a few likes.
    let mut post_ids = Vec::new();
    for (i, content) in DEMO_POSTS.iter().enumerate() {
        let author = &viewers[i % viewers.len()];
        let post = posts
            .create_post(
                author,
                &NewPost {
                    content: Some(content.to_string()),
                    visibility: Some(Visibility::Public),
                    ..NewPost::default()
                },
            )
            .await?;
        post_ids.push(post.id);
    }
    for viewer in &viewers {
        for post_id in &post_ids {
            if rng.random_bool(0.4) {
                let _ = engagement.toggle_like(viewer, *post_id).await;
            }
        }
    }
    println!("Created {} posts", post_ids.len());

    // A chat group seeded with members and a short log.
    let creator = &viewers[0];
    let group = groups
        .create_group(
            creator,
            &NewGroup {
                name: "Design".to_string(),
                description: Some("Design crit and show-and-tell".to_string()),
                is_private: false,
            },
        )
        .await?;
    for viewer in viewers.iter().skip(1).take(3) {
        groups.join_group(viewer, group.id).await?;
        groups
            .send_message(viewer, group.id, "Hey everyone!")
            .await?;
    }
    println!("Created group '{}' with messages", group.name);

    // Showcase projects with a few stars.
    for (i, viewer) in viewers.iter().enumerate().take(3) {
        let project = projects
            .create_project(
                viewer,
                &NewProject {
                    title: format!("Semester Project {}", i + 1),
                    description: Some("Built for the portal showcase".to_string()),
                    visibility: Some(ProjectVisibility::Public),
                    technologies: vec!["rust".to_string(), "axum".to_string()],
                    attachments: Vec::new(),
                },
            )
            .await?;
        for other in &viewers {
            if other.user_id != viewer.user_id && rng.random_bool(0.6) {
                let _ = projects.toggle_star(other, project.id).await;
            }
        }
    }
    println!("Seeding complete");

    Ok(())
}
