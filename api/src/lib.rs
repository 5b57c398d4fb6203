//! Social analytics API.
//!
//! Pulls users, posts and comments from the upstream evaluation service,
//! caches them in memory and serves rankings and summary statistics to the
//! dashboard. With `MODE=demo` every upstream call is replaced by fixed
//! sample data.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod aggregate;
pub mod config;
pub mod demo;
pub mod dto;
pub mod errors;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod present;
pub mod routes;
pub mod states;
pub mod store;
pub mod upstream;

pub use states::AppState;

use routes::{auth, health::health_check, social};

/// Builds the full router: auth and social APIs, health check, and the
/// static client bundle when one is configured.
pub fn app(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/authenticate", post(auth::authenticate))
        .route("/status", get(auth::status))
        .route("/credentials", get(auth::credentials));

    let social_routes = Router::new()
        .route("/users", get(social::top_users))
        .route("/users/{user_id}/posts", get(social::user_posts))
        .route("/posts", get(social::posts))
        .route("/posts/{post_id}/comments", get(social::post_comments))
        .route("/stats", get(social::stats));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/social", social_routes);

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
