use crate::{
    AppState,
    aggregate::{self, Dataset, PostKind, TOP_N, paginate},
    demo,
    dto::{CommentsResponse, PostsQuery, PostsResponse, UserPostsResponse, UsersResponse},
    errors::{ApiError, ServiceError},
    loader::Loader,
    models::{AnalyticsStat, PostWithCommentCount},
    present::Presenter,
    store::CacheKey,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use chrono::Utc;
use tracing::info;
use validator::Validate;

/// Most comments returned for one post.
const COMMENT_LIMIT: usize = 5;
/// Most posts returned for one user.
const USER_POST_LIMIT: usize = 5;

/// Re-fetches everything from upstream and hands back the fresh dataset.
async fn refresh(state: &AppState) -> Result<Dataset, ServiceError> {
    let token = state.bearer_token().await?;
    Loader::new(&state.store, &state.upstream, &token)
        .refresh()
        .await?;
    Ok(state.store.dataset().await)
}

/// GET /api/social/users
pub async fn top_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    if state.demo_mode() {
        let users = demo::top_users();
        let stats = demo::stats();
        state.store.set_top_users(users.clone()).await;
        state.store.set_stats(stats).await;

        return Ok(Json(UsersResponse {
            users,
            stats: Some(stats),
        }));
    }

    if !state.is_stale(CacheKey::TopUsers) {
        let cached = state.store.top_users().await;
        if !cached.is_empty() {
            return Ok(Json(UsersResponse {
                users: cached,
                stats: None,
            }));
        }
    }

    let data = refresh(&state)
        .await
        .map_err(ApiError::failed("Failed to fetch top users"))?;

    let rankings = aggregate::compute_top_users(&data, TOP_N);
    let stats = aggregate::compute_stats(&data);
    let users = Presenter::live().users(&rankings);

    state.store.set_top_users(users.clone()).await;
    state.store.set_stats(stats).await;
    state.store.set_last_update(CacheKey::TopUsers, Utc::now());

    info!(
        "Cache {} refreshed over {} users",
        CacheKey::TopUsers.as_str(),
        stats.total_users
    );

    Ok(Json(UsersResponse {
        users,
        stats: Some(stats),
    }))
}

/// GET /api/social/posts?type=popular|latest&page=1
pub async fn posts(
    State(state): State<AppState>,
    query: Result<Query<PostsQuery>, QueryRejection>,
) -> Result<Json<PostsResponse>, ApiError> {
    let Query(query) = query?;
    query
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let kind = query.kind;
    let key = match kind {
        PostKind::Popular => CacheKey::PopularPosts,
        PostKind::Latest => CacheKey::LatestPosts,
    };

    if state.demo_mode() {
        let feed = demo::post_feed(kind);
        store_feed(&state, kind, feed.clone()).await;
        return Ok(Json(page_of(&feed, query.page)));
    }

    if !state.is_stale(key) {
        let cached = match kind {
            PostKind::Popular => state.store.popular_posts().await,
            PostKind::Latest => state.store.latest_posts().await,
        };
        if !cached.is_empty() {
            return Ok(Json(page_of(&cached, query.page)));
        }
    }

    let data = refresh(&state)
        .await
        .map_err(ApiError::failed(format!("Failed to fetch {} posts", kind.as_str())))?;

    let rankings = aggregate::compute_posts(&data, kind, TOP_N);
    let feed = Presenter::live().posts(&rankings, &data, kind == PostKind::Popular);

    store_feed(&state, kind, feed.clone()).await;
    state.store.set_last_update(key, Utc::now());

    info!("Cache {} refreshed with {} posts", key.as_str(), feed.len());

    Ok(Json(page_of(&feed, query.page)))
}

async fn store_feed(state: &AppState, kind: PostKind, feed: Vec<PostWithCommentCount>) {
    match kind {
        PostKind::Popular => state.store.set_popular_posts(feed).await,
        PostKind::Latest => state.store.set_latest_posts(feed).await,
    }
}

fn page_of(feed: &[PostWithCommentCount], page: usize) -> PostsResponse {
    let (posts, pagination) = paginate(feed, page);
    PostsResponse { posts, pagination }
}

/// GET /api/social/posts/{post_id}/comments
pub async fn post_comments(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let Path(post_id) = path.map_err(|_| ApiError::ValidationError("Invalid post ID".into()))?;

    let cached = state.store.comments(post_id);
    let mut comments = if !cached.is_empty() {
        cached
    } else if state.demo_mode() {
        demo::post_comments(post_id)
    } else {
        let message = format!("Failed to fetch comments for post {post_id}");
        let token = state
            .bearer_token()
            .await
            .map_err(ApiError::failed(message.clone()))?;
        Loader::new(&state.store, &state.upstream, &token)
            .load_post_comments(post_id)
            .await
            .map_err(ApiError::failed(message))?
    };

    comments.truncate(COMMENT_LIMIT);
    Ok(Json(CommentsResponse { comments }))
}

/// GET /api/social/users/{user_id}/posts
/// Served from cache only; posts are loaded by the aggregate endpoints.
pub async fn user_posts(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<UserPostsResponse>, ApiError> {
    let Path(user_id) = path.map_err(|_| ApiError::ValidationError("Invalid user ID".into()))?;

    let mut posts = if state.demo_mode() {
        demo::user_posts(user_id)
    } else {
        let cached = state.store.posts(user_id);
        let users = state.store.users().await;
        let author = users.iter().find(|user| user.id == user_id);
        let store = &state.store;

        Presenter::live().user_posts(
            &cached[..cached.len().min(USER_POST_LIMIT)],
            author,
            |post_id| store.comment_count(post_id),
        )
    };

    posts.truncate(USER_POST_LIMIT);
    Ok(Json(UserPostsResponse { posts }))
}

/// GET /api/social/stats
/// All zeros until an aggregate pass has run.
pub async fn stats(State(state): State<AppState>) -> Json<AnalyticsStat> {
    if state.demo_mode() {
        let stats = demo::stats();
        state.store.set_stats(stats).await;
        return Json(stats);
    }

    Json(state.store.stats().await.unwrap_or_default())
}
