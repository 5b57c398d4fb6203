//! Ranking and summary statistics over the cached collections.
//!
//! Everything here is deterministic. Display-only fields are added later by
//! [`crate::present`].

use serde::Serialize;
use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
};

use crate::models::{AnalyticsStat, SocialComment, SocialPost, SocialUser};

/// Length of every ranked list.
pub const TOP_N: usize = 5;
pub const PAGE_SIZE: usize = 5;

/// The base collections an aggregation pass runs over.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Users in upstream order.
    pub users: Vec<SocialUser>,
    /// Every known post, deduplicated by id.
    pub posts: Vec<SocialPost>,
    pub posts_by_user: HashMap<u64, Vec<SocialPost>>,
    pub comment_counts: HashMap<u64, usize>,
}

impl Dataset {
    /// Builds a dataset from flat record lists, grouping posts by author.
    pub fn from_records(
        users: Vec<SocialUser>,
        posts: Vec<SocialPost>,
        comments: &[SocialComment],
    ) -> Self {
        let mut posts_by_user: HashMap<u64, Vec<SocialPost>> = HashMap::new();
        for post in &posts {
            posts_by_user.entry(post.userid).or_default().push(post.clone());
        }

        let mut comment_counts: HashMap<u64, usize> = HashMap::new();
        for comment in comments {
            *comment_counts.entry(comment.postid).or_default() += 1;
        }

        Self {
            users,
            posts,
            posts_by_user,
            comment_counts,
        }
    }

    pub fn user(&self, id: u64) -> Option<&SocialUser> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn user_posts(&self, user_id: u64) -> &[SocialPost] {
        self.posts_by_user
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn comment_count(&self, post_id: u64) -> usize {
        self.comment_counts.get(&post_id).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRanking {
    pub user_id: u64,
    pub name: String,
    pub post_count: usize,
    pub comment_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostRanking {
    pub post: SocialPost,
    pub comment_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Popular,
    Latest,
}

impl PostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Popular => "popular",
            PostKind::Latest => "latest",
        }
    }
}

impl FromStr for PostKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(PostKind::Popular),
            "latest" => Ok(PostKind::Latest),
            other => Err(format!(
                "unknown post type {other:?}, expected popular or latest"
            )),
        }
    }
}

/// Users with the most posts, at most `limit` of them.
///
/// The sort is stable, so equal post counts keep upstream order. Duplicate
/// user ids are collapsed to their first occurrence.
pub fn compute_top_users(data: &Dataset, limit: usize) -> Vec<UserRanking> {
    let mut seen = HashSet::new();
    let mut rankings: Vec<UserRanking> = data
        .users
        .iter()
        .filter(|user| seen.insert(user.id))
        .map(|user| {
            let posts = data.user_posts(user.id);
            UserRanking {
                user_id: user.id,
                name: user.name.clone(),
                post_count: posts.len(),
                comment_count: posts.iter().map(|post| data.comment_count(post.id)).sum(),
            }
        })
        .collect();

    rankings.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    rankings.truncate(limit);
    rankings
}

/// Popular posts rank by comment count; latest posts by id, higher ids
/// being newer.
pub fn compute_posts(data: &Dataset, kind: PostKind, limit: usize) -> Vec<PostRanking> {
    let mut rankings: Vec<PostRanking> = data
        .posts
        .iter()
        .map(|post| PostRanking {
            post: post.clone(),
            comment_count: data.comment_count(post.id),
        })
        .collect();

    match kind {
        PostKind::Popular => rankings.sort_by(|a, b| b.comment_count.cmp(&a.comment_count)),
        PostKind::Latest => rankings.sort_by(|a, b| b.post.id.cmp(&a.post.id)),
    }

    rankings.truncate(limit);
    rankings
}

pub fn compute_stats(data: &Dataset) -> AnalyticsStat {
    let total_users = data.users.len();
    let total_posts = data.posts.len();
    let total_comments: usize = data
        .posts
        .iter()
        .map(|post| data.comment_count(post.id))
        .sum();

    let avg_posts_per_user = if total_users == 0 {
        0.0
    } else {
        total_posts as f64 / total_users as f64
    };

    AnalyticsStat {
        total_users,
        total_posts,
        total_comments,
        avg_posts_per_user,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

/// Slices one fixed-size page out of an already sorted list. `page` is
/// 1-based.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> (Vec<T>, Pagination) {
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    let end = start.saturating_add(PAGE_SIZE).min(total);

    let slice = if start < total {
        items[start..end].to_vec()
    } else {
        vec![]
    };

    let pagination = Pagination {
        current_page: page,
        total_pages: total.div_ceil(PAGE_SIZE),
        has_more: start.saturating_add(PAGE_SIZE) < total,
    };

    (slice, pagination)
}
