//! Client against a live in-process server

use api::{AppConfig, AppState, create_router};
use client::{ApiClient, ClientError, LoginForm, NotificationStream, SignupForm};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_server() -> (String, AppState) {
    let state = AppState::in_memory(AppConfig::for_tests()).unwrap();
    let app = create_router(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    (format!("http://{address}"), state)
}

fn signup_form(name: &str, email: &str) -> SignupForm {
    SignupForm {
        name: name.into(),
        email: email.into(),
        password: "Secret123".into(),
        confirm_password: "Secret123".into(),
    }
}

#[tokio::test]
async fn test_session_resources_and_errors() {
    let (base, _) = spawn_server().await;
    let jane = ApiClient::new(&base).unwrap();

    let session = jane.signup(&signup_form("Jane Doe", "jane@example.com")).await.unwrap();
    assert_eq!(session.user.name, "Jane Doe");
    assert!(jane.tokens().is_authenticated());
    let me = jane.me().await.unwrap();
    assert_eq!(me.student.unwrap()["firstName"], "Jane");

    let err = jane
        .signup(&signup_form("Jane Again", "jane@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
    assert_eq!(err.status(), Some(400));

    let project = jane
        .create_project(&json!({
            "title": "Client project",
            "description": "Created through the client library",
            "technologies": ["Rust"],
            "category": "Web Development",
        }))
        .await
        .unwrap();
    let project_id = project["id"].as_str().unwrap().parse().unwrap();

    let listing = jane.list_projects(&[("limit", "5")]).await.unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(jane.cache().len().await, 1);

    // Served from cache until the entry expires
    jane.delete_project(project_id).await.unwrap();
    let cached = jane.list_projects(&[("limit", "5")]).await.unwrap();
    assert_eq!(cached.total, 1);
    let fresh = jane.list_projects(&[("limit", "6")]).await.unwrap();
    assert_eq!(fresh.total, 0);

    let err = jane.get_project(project_id).await.unwrap_err();
    assert_eq!(err.to_string(), "Project not found");

    let anonymous = ApiClient::new(&base).unwrap();
    let err = anonymous
        .login(&LoginForm {
            email: "jane@example.com".into(),
            password: "Wrong1234".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");

    jane.tokens().set("not-a-token");
    let err = jane.me().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert!(!jane.tokens().is_authenticated());
    assert!(!jane.tracker().is_loading());
}

#[tokio::test]
async fn test_offline_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(&format!("http://{address}")).unwrap();
    let err = api.list_blogs(&[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Offline));
}

#[tokio::test]
async fn test_live_notifications() {
    let (base, state) = spawn_server().await;
    let jane = ApiClient::new(&base).unwrap();
    let bob = ApiClient::new(&base).unwrap();
    jane.signup(&signup_form("Jane Doe", "jane@example.com")).await.unwrap();
    bob.signup(&signup_form("Bob Smith", "bob@example.com")).await.unwrap();

    let mut stream = NotificationStream::connect(&jane).await.unwrap();
    stream.ping().await.unwrap();
    for _ in 0..100 {
        if state.hub.room_count().await == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let blog = jane
        .create_blog(&json!({
            "title": "Live updates in Rust",
            "content": "Streaming notifications over a socket. ".repeat(5),
            "excerpt": "How the live feed works",
            "category": "Programming",
            "isPublished": true,
        }))
        .await
        .unwrap();
    let blog_id = blog["id"].as_str().unwrap().parse().unwrap();

    let status = bob.like_blog(blog_id).await.unwrap();
    assert!(status.is_liked);

    let pushed = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("notification in time")
        .expect("stream open")
        .unwrap();
    assert_eq!(pushed.kind, "like");
    assert_eq!(pushed.sender.unwrap().name, "Bob Smith");

    let inbox = jane.notifications(1, 20).await.unwrap();
    assert_eq!(inbox.unread_count, 1);
    let read = jane.mark_notification_read(pushed.id).await.unwrap();
    assert!(read.is_read);

    stream.close().await.unwrap();
}
