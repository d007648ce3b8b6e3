pub mod database;
pub mod auth;
pub mod user;
pub mod follow;
pub mod rec;
pub mod feed;
pub mod like;
pub mod comment;
pub mod notification;

pub use database::Database;
pub use auth::AuthService;
pub use user::UserService;
pub use follow::FollowService;
pub use rec::RecService;
pub use feed::FeedService;
pub use like::LikeService;
pub use comment::CommentService;
pub use notification::NotificationService;
