mod analytics;
mod post;
mod token;
mod user;

pub use analytics::{AnalyticsStat, PostWithCommentCount, UserPost, UserPostAuthor, UserWithPostCount};
pub use post::{SocialComment, SocialPost};
pub use token::AuthToken;
pub use user::SocialUser;
