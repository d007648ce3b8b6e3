use crate::{
    config::Config,
    error::Result,
    services::{
        AuthService, CommentService, Database, FeedService, FollowService, LikeService,
        NotificationService, RecService, UserService,
    },
};
use std::sync::Arc;

/// Shared application state: configuration, the store handle and every
/// service built on top of it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Arc<Database>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub follow_service: FollowService,
    pub rec_service: RecService,
    pub feed_service: FeedService,
    pub like_service: LikeService,
    pub comment_service: CommentService,
    pub notification_service: NotificationService,
}

impl AppState {
    /// Wires every service onto one database handle.
    pub async fn new(config: Config, db: Arc<Database>) -> Result<Arc<Self>> {
        let auth_service = AuthService::new(db.clone(), &config).await?;
        let user_service = UserService::new(db.clone(), &config).await?;
        let follow_service = FollowService::new(db.clone(), user_service.clone()).await?;
        let rec_service = RecService::new(db.clone()).await?;
        let feed_service = FeedService::new(db.clone(), user_service.clone(), &config).await?;
        let like_service = LikeService::new(db.clone(), rec_service.clone()).await?;
        let comment_service = CommentService::new(db.clone(), rec_service.clone(), &config).await?;
        let notification_service = NotificationService::new(db.clone(), &config).await?;

        Ok(Arc::new(Self {
            config,
            db,
            auth_service,
            user_service,
            follow_service,
            rec_service,
            feed_service,
            like_service,
            comment_service,
            notification_service,
        }))
    }
}
