pub mod user;
pub mod rec;
pub mod follow;
pub mod like;
pub mod comment;
pub mod notification;
