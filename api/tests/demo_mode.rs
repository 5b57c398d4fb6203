mod common;

use axum::{Router, http::StatusCode};
use common::{auth_body, get, post_json};
use serde_json::json;
use social_analytics_api::{AppState, app, config::Config};

fn demo_app() -> Router {
    app(AppState::new(Config::demo()))
}

#[tokio::test]
async fn stats_are_the_fixed_sample_totals() {
    let app = demo_app();
    let (status, body) = get(&app, "/api/social/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 10);
    assert_eq!(body["totalPosts"], 15);
    assert_eq!(body["totalComments"], 15);
    assert_eq!(body["avgPostsPerUser"], 1.5);
}

#[tokio::test]
async fn top_users_come_with_stats() {
    let app = demo_app();
    let (status, body) = get(&app, "/api/social/users").await;

    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 5);
    assert_eq!(users[0]["name"], "Aditya Sharma");
    assert_eq!(users[0]["postCount"], 2);
    assert_eq!(users[0]["avatar"], "AS");
    assert_eq!(body["stats"]["totalUsers"], 10);
}

#[tokio::test]
async fn latest_posts_paginate_in_fives() {
    let app = demo_app();

    let (status, first) = get(&app, "/api/social/posts?type=latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["posts"].as_array().unwrap().len(), 5);
    assert_eq!(first["posts"][0]["id"], 15);
    assert_eq!(
        first["pagination"],
        json!({ "currentPage": 1, "totalPages": 3, "hasMore": true })
    );

    let (_, last) = get(&app, "/api/social/posts?type=latest&page=3").await;
    assert_eq!(last["posts"].as_array().unwrap().len(), 5);
    assert_eq!(last["posts"][4]["id"], 1);
    assert_eq!(last["pagination"]["hasMore"], false);

    let (_, beyond) = get(&app, "/api/social/posts?type=latest&page=4").await;
    assert!(beyond["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn popular_is_the_default_feed() {
    let app = demo_app();
    let (status, body) = get(&app, "/api/social/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"][0]["rank"], 1);
    assert_eq!(body["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn empty_query_parameters_fall_back_to_defaults() {
    let app = demo_app();
    let (status, body) = get(&app, "/api/social/posts?type=&page=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"][0]["rank"], 1);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn invalid_query_parameters_are_rejected() {
    let app = demo_app();

    let (status, body) = get(&app, "/api/social/posts?type=trending").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = get(&app, "/api/social/posts?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/social/posts?page=two").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_ids_are_rejected() {
    let app = demo_app();

    let (status, body) = get(&app, "/api/social/posts/abc/comments").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid post ID");

    let (status, body) = get(&app, "/api/social/users/abc/posts").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid user ID");
}

#[tokio::test]
async fn sample_comments_and_user_posts_are_served() {
    let app = demo_app();

    let (_, comments) = get(&app, "/api/social/posts/1/comments").await;
    assert_eq!(comments["comments"].as_array().unwrap().len(), 2);

    let (_, posts) = get(&app, "/api/social/users/1/posts").await;
    let posts = posts["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["userData"]["name"], "Aditya Sharma");
    assert_eq!(posts[0]["commentCount"], 2);
}

#[tokio::test]
async fn demo_authentication_marks_session_as_demo() {
    let app = demo_app();

    let (_, before) = get(&app, "/api/auth/status").await;
    assert_eq!(before, json!({ "authenticated": false }));

    let (status, body) = post_json(&app, "/api/auth/authenticate", auth_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, after) = get(&app, "/api/auth/status").await;
    assert_eq!(after, json!({ "authenticated": true, "demoMode": true }));
}

#[tokio::test]
async fn authentication_requires_a_valid_email() {
    let app = demo_app();
    let mut body = auth_body();
    body["email"] = json!("not-an-email");

    let (status, body) = post_json(&app, "/api/auth/authenticate", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn credentials_status_reports_missing_configuration() {
    let app = demo_app();
    let (_, body) = get(&app, "/api/auth/credentials").await;

    assert_eq!(body["hasCredentials"], false);
}

#[tokio::test]
async fn health_reports_mode() {
    let app = demo_app();
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mode"], "demo");
}
