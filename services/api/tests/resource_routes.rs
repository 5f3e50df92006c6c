mod common;

use axum::http::StatusCode;
use common::{TestApp, blog_body, course_body, project_body};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn test_project_crud_and_owner_scoping() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    let bob = app.signup("Bob Smith", "bob@example.com").await;

    let (status, body) = app
        .post("/api/projects", Some(&jane.token), project_body("Portfolio site"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Project created successfully");
    assert_eq!(body["data"]["status"], "In Progress");
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/projects/{id}");

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["views"], 1);
    assert_eq!(body["data"]["owner"]["name"], "Jane Doe");
    let (_, body) = app.get(&uri, Some(&jane.token)).await;
    assert_eq!(body["data"]["views"], 2);

    // Foreign and absent documents answer identically
    let (status, foreign) = app
        .put(&uri, Some(&bob.token), json!({ "title": "Hijacked" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, absent) = app
        .put(
            &format!("/api/projects/{}", Uuid::new_v4()),
            Some(&bob.token),
            json!({ "title": "Hijacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(foreign, absent);
    assert_eq!(foreign["message"], "Project not found or unauthorized");

    let (status, body) = app
        .put(&uri, Some(&jane.token), json!({ "status": "Completed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Completed");
    assert_eq!(body["data"]["title"], "Portfolio site");

    let (status, body) = app
        .put(&uri, Some(&jane.token), json!({ "title": "ab" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title must be between 3 and 100 characters");

    let (_, mine) = app.get("/api/projects/my", Some(&jane.token)).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&uri, Some(&bob.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app.delete(&uri, Some(&jane.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_toggles() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    let bob = app.signup("Bob Smith", "bob@example.com").await;

    let (_, body) = app
        .post("/api/projects", Some(&jane.token), project_body("Likeable"))
        .await;
    let like_uri = format!("/api/projects/{}/like", body["data"]["id"].as_str().unwrap());

    let (status, body) = app.post(&like_uri, Some(&bob.token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "likes": 1, "isLiked": true }));

    let (_, body) = app.post(&like_uri, Some(&bob.token), json!({})).await;
    assert_eq!(body["data"], json!({ "likes": 0, "isLiked": false }));
}

#[tokio::test]
async fn test_project_pagination_window() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    for n in 0..25 {
        let (status, _) = app
            .post(
                "/api/projects",
                Some(&jane.token),
                project_body(&format!("Project number {n}")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/projects?page=2&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 10);
    assert_eq!(body["total"], 25);
    assert_eq!(body["page"], 2);
    assert_eq!(body["pages"], 3);

    let (_, body) = app.get("/api/projects?page=3&limit=10", None).await;
    assert_eq!(body["count"], 5);

    let (_, body) = app.get("/api/projects?search=number%2024", None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    let (status, _) = app
        .post("/api/projects", Some(&jane.token), project_body("Lone project"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .get("/api/projects?page=1000000000000000000&limit=100", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_blog_listing_newest_first() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    for n in 1..=5 {
        let (status, _) = app
            .post(
                "/api/blogs",
                Some(&jane.token),
                blog_body(&format!("Technology post {n}"), true),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    app.post("/api/blogs", Some(&jane.token), blog_body("Unpublished draft", false))
        .await;

    let (status, body) = app
        .get("/api/blogs?category=Technology&page=1&limit=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["data"][0]["title"], "Technology post 5");
    assert_eq!(body["data"][1]["title"], "Technology post 4");
    assert!(body["data"][0].get("content").is_none());
    assert_eq!(body["data"][0]["owner"]["name"], "Jane Doe");

    let (_, mine) = app.get("/api/blogs/my", Some(&jane.token)).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_blog_slug_drafts_and_comments() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    let bob = app.signup("Bob Smith", "bob@example.com").await;

    let (status, body) = app
        .post("/api/blogs", Some(&jane.token), blog_body("Hello, Rust World!", true))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["slug"], "hello-rust-world");
    assert_eq!(body["data"]["readTime"], 1);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post("/api/blogs", Some(&bob.token), blog_body("Hello Rust World", true))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Slug already exists");

    let (status, body) = app.get("/api/blogs/slug/hello-rust-world", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["views"], 1);

    let (_, draft) = app
        .post("/api/blogs", Some(&jane.token), blog_body("Draft thoughts here", false))
        .await;
    let draft_uri = format!("/api/blogs/{}", draft["data"]["id"].as_str().unwrap());
    let (status, _) = app.get(&draft_uri, Some(&bob.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&draft_uri, Some(&jane.token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post(&format!("{draft_uri}/comments"), Some(&bob.token), json!({ "content": "hi" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            &format!("/api/blogs/{id}/comments"),
            Some(&bob.token),
            json!({ "content": "Great post!" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["name"], "Bob Smith");
    let comment_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            &format!("/api/blogs/{id}/comments/{comment_id}/replies"),
            Some(&jane.token),
            json!({ "content": "Thanks Bob" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["name"], "Jane Doe");

    let (status, body) = app
        .post(
            &format!("/api/blogs/{id}/comments/{}/replies", Uuid::new_v4()),
            Some(&jane.token),
            json!({ "content": "Lost reply" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Comment not found");

    let (_, body) = app.get(&format!("/api/blogs/{id}"), None).await;
    let comments = body["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["replies"][0]["content"], "Thanks Bob");
    assert_eq!(body["data"]["commentCount"], 1);

    let (_, tags) = app.get("/api/blogs/tags", None).await;
    assert!(tags["data"].as_array().unwrap().contains(&json!("rust")));
}

#[tokio::test]
async fn test_course_enrolment_and_reviews() {
    let app = TestApp::new();
    let teacher = app.signup("Tina Teacher", "tina@example.com").await;
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    let bob = app.signup("Bob Smith", "bob@example.com").await;

    let (status, body) = app
        .post("/api/courses", Some(&teacher.token), course_body("Rust for the web", true))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let course_uri = format!("/api/courses/{id}");

    let (status, body) = app
        .post(
            &format!("{course_uri}/review"),
            Some(&jane.token),
            json!({ "rating": 5, "comment": "Loved every chapter" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Must complete course before reviewing");

    let (status, _) = app
        .post(&format!("{course_uri}/enroll"), Some(&jane.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .post(&format!("{course_uri}/enroll"), Some(&jane.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Already enrolled in this course");

    let (status, body) = app
        .post(&format!("{course_uri}/complete"), Some(&bob.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Not enrolled in this course");

    let (status, _) = app
        .post(&format!("{course_uri}/enroll"), Some(&bob.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    for (user, rating) in [(&jane, 4), (&bob, 2)] {
        let (status, _) = app
            .post(&format!("{course_uri}/complete"), Some(&user.token), json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app
            .post(
                &format!("{course_uri}/review"),
                Some(&user.token),
                json!({ "rating": rating, "comment": "An honest review text" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.get(&course_uri, None).await;
    assert_eq!(body["data"]["rating"]["count"], 2);
    assert_eq!(body["data"]["rating"]["average"], 3.0);

    let (status, body) = app
        .post(
            &format!("{course_uri}/review"),
            Some(&jane.token),
            json!({ "rating": 5, "comment": "Changed my mind about it" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have already reviewed this course");

    let (_, me) = app.get("/api/auth/me", Some(&jane.token)).await;
    assert_eq!(me["student"]["enrolledCourses"], json!([id]));
    assert_eq!(me["student"]["completedCourses"], json!([id]));

    let (_, mine) = app
        .get("/api/courses/my?type=completed", Some(&jane.token))
        .await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
    let (_, created) = app
        .get("/api/courses/my?type=created", Some(&teacher.token))
        .await;
    assert_eq!(created["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_draft_course_hidden() {
    let app = TestApp::new();
    let teacher = app.signup("Tina Teacher", "tina@example.com").await;
    let jane = app.signup("Jane Doe", "jane@example.com").await;

    let (_, body) = app
        .post("/api/courses", Some(&teacher.token), course_body("Draft course", false))
        .await;
    let uri = format!("/api/courses/{}", body["data"]["id"].as_str().unwrap());

    let (_, list) = app.get("/api/courses", None).await;
    assert_eq!(list["total"], 0);
    let (status, _) = app.get(&uri, Some(&jane.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&uri, Some(&teacher.token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post(&format!("{uri}/enroll"), Some(&jane.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_skills() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;

    for (name, category, percentage) in [
        ("Rust", "Programming", 80),
        ("Figma", "Design", 60),
        ("Go", "Programming", 90),
    ] {
        let (status, _) = app
            .post(
                "/api/skills",
                Some(&jane.token),
                json!({
                    "name": name,
                    "category": category,
                    "level": "Advanced",
                    "percentage": percentage,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .post(
            "/api/skills",
            Some(&jane.token),
            json!({ "name": "Overflow", "category": "Other", "level": "Beginner", "percentage": 101 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Percentage must be between 0 and 100");

    let (_, body) = app.get("/api/skills?category=Programming", None).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"][0]["name"], "Go");

    let (_, body) = app.get(&format!("/api/skills?userId={}", jane.id), None).await;
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_student_profile_update_and_search() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    app.signup("Bob Smith", "bob@example.com").await;

    let (status, body) = app
        .put(
            "/api/students/profile/me",
            Some(&jane.token),
            json!({ "bio": "Rustacean", "skills": ["rust", "sql"], "gpa": 3.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gpa"], 3.5);

    let (status, _) = app
        .put("/api/students/profile/me", Some(&jane.token), json!({ "gpa": 4.5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/students/search?search=jane", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["owner"]["email"], "jane@example.com");

    let (_, body) = app.get("/api/students?skills=sql", None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_portfolio_lifecycle() {
    let app = TestApp::new();
    let jane = app.signup("Jane Doe", "jane@example.com").await;
    let bob = app.signup("Bob Smith", "bob@example.com").await;

    let (status, body) = app.get("/api/portfolios/my", Some(&jane.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Jane Doe's Portfolio");
    assert_eq!(body["data"]["theme"]["primaryColor"], "#6366f1");
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let subdomain = body["data"]["subdomain"].as_str().unwrap().to_string();
    assert!(subdomain.starts_with("janedoe"));

    let (_, again) = app.get("/api/portfolios/my", Some(&jane.token)).await;
    assert_eq!(again["data"]["id"], id);

    let (status, body) = app
        .post("/api/portfolios", Some(&jane.token), json!({ "title": "Second one" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Portfolio already exists. Use update instead.");

    let (_, check) = app
        .get(&format!("/api/portfolios/check-subdomain/{subdomain}"), None)
        .await;
    assert_eq!(check["available"], false);
    assert_eq!(check["message"], "Subdomain is already taken");
    let (status, _) = app
        .get("/api/portfolios/check-subdomain/Bad_Name", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/portfolios",
            Some(&bob.token),
            json!({ "title": "Bob's work", "subdomain": subdomain }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Subdomain already exists");

    let (status, _) = app.get(&format!("/api/portfolios/{id}"), Some(&bob.token)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&format!("/api/portfolios/{id}"), Some(&jane.token)).await;
    assert_eq!(body["data"]["views"], 1);

    let (status, _) = app
        .put("/api/portfolios", Some(&jane.token), json!({ "isPublic": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/portfolios/{id}"), Some(&bob.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .get(&format!("/api/portfolios/subdomain/{subdomain}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/api/portfolios/{id}"), Some(&jane.token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(
            "/api/portfolios/theme",
            Some(&jane.token),
            json!({ "theme": { "primaryColor": "#000000" } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["theme"]["primaryColor"], "#000000");
    assert_eq!(body["data"]["theme"]["fontFamily"], "Inter");

    let (status, body) = app
        .put("/api/portfolios/theme", Some(&bob.token), json!({ "theme": {} }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Portfolio not found");

    let (status, _) = app.delete("/api/portfolios", Some(&jane.token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete("/api/portfolios", Some(&jane.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
