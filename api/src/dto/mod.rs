mod requests;
mod responses;

pub use requests::{AuthRequest, PostsQuery};
pub use responses::{
    AuthResponse, AuthStatusResponse, CommentsResponse, CredentialsResponse, PostsResponse,
    UserPostsResponse, UsersResponse,
};
