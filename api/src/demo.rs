//! Fixed sample data served when the server runs with `MODE=demo`.
//!
//! Views are built with the same aggregation code as live data, with a
//! pinned seed and clock so every response is reproducible.

use chrono::{DateTime, Utc};

use crate::{
    aggregate::{self, Dataset, PostKind},
    models::{
        AnalyticsStat, PostWithCommentCount, SocialComment, SocialPost, SocialUser, UserPost,
        UserWithPostCount,
    },
    present::Presenter,
};

const SEED: u64 = 2025;
// 2025-01-15T10:30:00Z
const NOW_SECS: i64 = 1_736_937_000;

const POPULAR_LIMIT: usize = 10;
const LATEST_LIMIT: usize = 15;

const USERS: [(u64, &str, &str); 10] = [
    (1, "Aditya Sharma", "aditya.sharma"),
    (2, "Priya Patel", "priya.patel"),
    (3, "Rahul Verma", "rahul.verma"),
    (4, "Neha Singh", "neha.singh"),
    (5, "Vikram Malhotra", "vikram.malhotra"),
    (6, "Anjali Desai", "anjali.desai"),
    (7, "Sanjay Kumar", "sanjay.kumar"),
    (8, "Meera Reddy", "meera.reddy"),
    (9, "Rajesh Khanna", "rajesh.khanna"),
    (10, "Pooja Gupta", "pooja.gupta"),
];

const POSTS: [(u64, u64, &str); 15] = [
    (1, 1, "Just finished an amazing project! #coding #achievement"),
    (2, 2, "Learning new tech stack today. So exciting! #learning #tech"),
    (3, 3, "Had a great team meeting. Ideas flowing! #teamwork"),
    (4, 4, "Working on improving my skills in React. #react #webdev"),
    (5, 5, "Coffee and code - perfect morning! #coffee #developer"),
    (
        6,
        1,
        "Debugging is like being a detective in a crime movie where you are also the murderer. #programming #humor",
    ),
    (7, 2, "Just deployed my first app! So proud! #milestone #coding"),
    (8, 3, "Participated in a hackathon this weekend. #hackathon #coding"),
    (9, 4, "Trying out a new productivity technique. #productivity"),
    (10, 5, "Working from home today. My cat is my new colleague! #wfh #pets"),
    (
        11,
        6,
        "Learning about microservices architecture. Complex but fascinating! #architecture #learning",
    ),
    (
        12,
        7,
        "Just solved a tricky bug that has been bothering me for days! #debugging #victory",
    ),
    (
        13,
        8,
        "Starting a new open source project. Excited to collaborate! #opensource #community",
    ),
    (
        14,
        9,
        "AI and ML are changing everything. Time to level up my skills. #AI #machinelearning",
    ),
    (
        15,
        10,
        "Clean code principles save lives (or at least save developer sanity) #cleancode #bestpractices",
    ),
];

const COMMENTS: [(u64, u64, &str); 15] = [
    (1, 1, "Great post! Thanks for sharing."),
    (2, 1, "I completely agree with you."),
    (3, 2, "This is really insightful."),
    (4, 2, "Could you elaborate on this point?"),
    (5, 3, "I had a similar experience recently."),
    (6, 3, "I learned a lot from this!"),
    (7, 4, "Looking forward to more posts like this."),
    (8, 4, "Have you tried this alternative approach?"),
    (9, 5, "This helped me solve a problem I was facing."),
    (10, 5, "Would love to discuss this more."),
    (11, 6, "Haha, that is so true! Story of my life."),
    (12, 7, "Congratulations! What technologies did you use?"),
    (13, 8, "That sounds fun! Did your team win anything?"),
    (14, 9, "What productivity technique are you trying?"),
    (15, 10, "Cats make the best coworkers!"),
];

pub fn users() -> Vec<SocialUser> {
    USERS
        .iter()
        .map(|&(id, name, handle)| SocialUser {
            id,
            name: name.to_string(),
            email: format!("{handle}@example.com"),
            roll_no: format!("ROLL{}", 100 + id),
            access_code: Some("demo".to_string()),
        })
        .collect()
}

pub fn posts() -> Vec<SocialPost> {
    POSTS
        .iter()
        .map(|&(id, userid, content)| SocialPost {
            id,
            userid,
            content: content.to_string(),
        })
        .collect()
}

pub fn comments() -> Vec<SocialComment> {
    COMMENTS
        .iter()
        .map(|&(id, postid, content)| SocialComment {
            id,
            postid,
            content: content.to_string(),
        })
        .collect()
}

pub fn dataset() -> Dataset {
    Dataset::from_records(users(), posts(), &comments())
}

fn presenter() -> Presenter<rand::rngs::StdRng> {
    let now = DateTime::<Utc>::from_timestamp(NOW_SECS, 0).unwrap_or_default();
    Presenter::seeded(SEED, now)
}

pub fn top_users() -> Vec<UserWithPostCount> {
    let rankings = aggregate::compute_top_users(&dataset(), aggregate::TOP_N);
    presenter().users(&rankings)
}

/// Demo lists are longer than live ones so paging has something to do.
pub fn post_feed(kind: PostKind) -> Vec<PostWithCommentCount> {
    let data = dataset();
    let (limit, ranked) = match kind {
        PostKind::Popular => (POPULAR_LIMIT, true),
        PostKind::Latest => (LATEST_LIMIT, false),
    };
    let rankings = aggregate::compute_posts(&data, kind, limit);
    presenter().posts(&rankings, &data, ranked)
}

pub fn stats() -> AnalyticsStat {
    aggregate::compute_stats(&dataset())
}

pub fn post_comments(post_id: u64) -> Vec<SocialComment> {
    comments()
        .into_iter()
        .filter(|comment| comment.postid == post_id)
        .collect()
}

pub fn user_posts(user_id: u64) -> Vec<UserPost> {
    let data = dataset();
    presenter().user_posts(data.user_posts(user_id), data.user(user_id), |post_id| {
        data.comment_count(post_id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_match_sample_totals() {
        let stats = stats();

        assert_eq!(stats.total_users, 10);
        assert_eq!(stats.total_posts, 15);
        assert_eq!(stats.total_comments, 15);
        assert_eq!(stats.avg_posts_per_user, 1.5);
    }

    #[test]
    fn top_users_are_the_five_busiest_posters() {
        let users = top_users();
        let ids: Vec<u64> = users.iter().map(|u| u.id).collect();

        // Users 1..=5 each wrote two posts; ties keep sample order.
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(users.iter().all(|u| u.post_count == 2));
        assert_eq!(users[0].comment_count, 3);
    }

    #[test]
    fn feeds_are_deterministic() {
        assert_eq!(post_feed(PostKind::Popular), post_feed(PostKind::Popular));
        assert_eq!(top_users(), top_users());
    }

    #[test]
    fn popular_feed_is_ranked_by_comment_count() {
        let feed = post_feed(PostKind::Popular);

        assert_eq!(feed.len(), 10);
        assert!(feed.windows(2).all(|w| w[0].comment_count >= w[1].comment_count));
        assert_eq!(feed[0].rank, Some(1));
    }

    #[test]
    fn latest_feed_lists_every_post_newest_first() {
        let feed = post_feed(PostKind::Latest);

        assert_eq!(feed.len(), 15);
        assert_eq!(feed[0].id, 15);
        assert_eq!(feed[14].id, 1);
    }

    #[test]
    fn user_posts_are_annotated() {
        let posts = user_posts(1);

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].user_data.name, "Aditya Sharma");
        assert_eq!(posts[0].user_data.avatar, "AS");
        assert_eq!(posts[0].comment_count, 2);
    }
}
