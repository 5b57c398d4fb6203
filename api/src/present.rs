//! Display decoration for ranked results.
//!
//! Join dates, created-at times and trend percentages are made up for the
//! dashboard. They are not analytics and nothing should rely on them. The
//! random source and clock are injected so demo output can be pinned.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    aggregate::{Dataset, PostRanking, UserRanking},
    models::{PostWithCommentCount, SocialPost, SocialUser, UserPost, UserPostAuthor, UserWithPostCount},
};

pub const UNKNOWN_USER: &str = "Unknown User";

// Spread of the synthesized timestamps, in milliseconds before "now".
const JOIN_DATE_SPREAD_MS: i64 = 10_000_000_000;
const CREATED_AT_SPREAD_MS: i64 = 50_000_000;

/// Uppercase initials of the first two words of `name`.
pub fn avatar(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub struct Presenter<R> {
    rng: R,
    now: DateTime<Utc>,
}

impl Presenter<StdRng> {
    pub fn live() -> Self {
        Self::new(StdRng::from_entropy(), Utc::now())
    }

    pub fn seeded(seed: u64, now: DateTime<Utc>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), now)
    }
}

impl<R: Rng> Presenter<R> {
    pub fn new(rng: R, now: DateTime<Utc>) -> Self {
        Self { rng, now }
    }

    pub fn users(&mut self, rankings: &[UserRanking]) -> Vec<UserWithPostCount> {
        rankings
            .iter()
            .map(|ranking| UserWithPostCount {
                id: ranking.user_id,
                name: ranking.name.clone(),
                post_count: ranking.post_count,
                comment_count: ranking.comment_count,
                join_date: self.join_date(),
                avatar: avatar(&ranking.name),
                trend: self.rng.gen_range(1..=15),
            })
            .collect()
    }

    /// Attaches author details by id lookup. With `ranked`, entries get
    /// their 1-based position as `rank`.
    pub fn posts(
        &mut self,
        rankings: &[PostRanking],
        data: &Dataset,
        ranked: bool,
    ) -> Vec<PostWithCommentCount> {
        rankings
            .iter()
            .enumerate()
            .map(|(index, ranking)| {
                let user_name = data
                    .user(ranking.post.userid)
                    .map(|user| user.name.clone())
                    .unwrap_or_else(|| UNKNOWN_USER.to_string());

                PostWithCommentCount {
                    id: ranking.post.id,
                    userid: ranking.post.userid,
                    user_avatar: avatar(&user_name),
                    user_name,
                    content: ranking.post.content.clone(),
                    comment_count: ranking.comment_count,
                    created_at: self.created_at(),
                    trend: self.rng.gen_range(5..=29),
                    rank: ranked.then_some(index + 1),
                }
            })
            .collect()
    }

    pub fn user_posts<F>(
        &mut self,
        posts: &[SocialPost],
        author: Option<&SocialUser>,
        comment_count: F,
    ) -> Vec<UserPost>
    where
        F: Fn(u64) -> usize,
    {
        let name = author.map_or(UNKNOWN_USER, |user| user.name.as_str());

        posts
            .iter()
            .map(|post| UserPost {
                id: post.id,
                userid: post.userid,
                content: post.content.clone(),
                user_data: UserPostAuthor {
                    name: name.to_string(),
                    avatar: avatar(name),
                },
                comment_count: comment_count(post.id),
                created_at: self
                    .moment_before(CREATED_AT_SPREAD_MS)
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            })
            .collect()
    }

    fn join_date(&mut self) -> String {
        self.moment_before(JOIN_DATE_SPREAD_MS)
            .format("%B %Y")
            .to_string()
    }

    fn created_at(&mut self) -> String {
        self.moment_before(CREATED_AT_SPREAD_MS)
            .format("%-m/%-d, %-I:%M %p")
            .to_string()
    }

    fn moment_before(&mut self, spread_ms: i64) -> DateTime<Utc> {
        self.now - Duration::milliseconds(self.rng.gen_range(0..spread_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{PostKind, TOP_N, compute_posts, compute_top_users};
    use chrono::TimeZone;

    fn sample() -> Dataset {
        Dataset::from_records(
            vec![SocialUser::from_name(1, "ada lovelace byron")],
            vec![
                SocialPost {
                    id: 1,
                    userid: 1,
                    content: "first".into(),
                },
                SocialPost {
                    id: 2,
                    userid: 77,
                    content: "orphan".into(),
                },
            ],
            &[],
        )
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn avatar_takes_first_two_initials() {
        assert_eq!(avatar("ada lovelace byron"), "AL");
        assert_eq!(avatar("Cher"), "C");
        assert_eq!(avatar(""), "");
    }

    #[test]
    fn decorated_users_keep_real_counts() {
        let data = sample();
        let rankings = compute_top_users(&data, TOP_N);
        let users = Presenter::seeded(7, fixed_now()).users(&rankings);

        assert_eq!(users[0].post_count, 1);
        assert_eq!(users[0].avatar, "AL");
        assert!((1..=15).contains(&users[0].trend));
    }

    #[test]
    fn posts_fall_back_to_unknown_author() {
        let data = sample();
        let rankings = compute_posts(&data, PostKind::Latest, TOP_N);
        let posts = Presenter::seeded(7, fixed_now()).posts(&rankings, &data, false);

        assert_eq!(posts[0].id, 2);
        assert_eq!(posts[0].user_name, UNKNOWN_USER);
        assert_eq!(posts[0].user_avatar, "UU");
        assert_eq!(posts[1].user_name, "ada lovelace byron");
        assert!(posts.iter().all(|p| p.rank.is_none()));
        assert!(posts.iter().all(|p| (5..=29).contains(&p.trend)));
    }

    #[test]
    fn ranked_posts_are_numbered_from_one() {
        let data = sample();
        let rankings = compute_posts(&data, PostKind::Popular, TOP_N);
        let posts = Presenter::seeded(7, fixed_now()).posts(&rankings, &data, true);
        let ranks: Vec<Option<usize>> = posts.iter().map(|p| p.rank).collect();

        assert_eq!(ranks, vec![Some(1), Some(2)]);
    }

    #[test]
    fn same_seed_gives_same_decoration() {
        let data = sample();
        let rankings = compute_top_users(&data, TOP_N);

        let first = Presenter::seeded(42, fixed_now()).users(&rankings);
        let second = Presenter::seeded(42, fixed_now()).users(&rankings);

        assert_eq!(first, second);
    }

    #[test]
    fn synthesized_dates_are_not_in_the_future() {
        let mut presenter = Presenter::seeded(3, fixed_now());
        for _ in 0..50 {
            assert!(presenter.moment_before(JOIN_DATE_SPREAD_MS) <= fixed_now());
        }
    }

    #[test]
    fn user_posts_carry_author_and_comment_counts() {
        let data = sample();
        let author = data.user(1);
        let posts = Presenter::seeded(1, fixed_now()).user_posts(
            data.user_posts(1),
            author,
            |post_id| if post_id == 1 { 3 } else { 0 },
        );

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].user_data.avatar, "AL");
        assert_eq!(posts[0].comment_count, 3);
    }
}
