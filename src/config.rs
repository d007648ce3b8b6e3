use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_format: String,

    // Database configuration
    pub database_url: String,
    pub database_max_connections: u32,

    // Authentication configuration
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,

    // Pagination
    pub default_feed_limit: i64,
    pub default_user_recs_limit: i64,
    pub max_page_size: i64,
    pub search_max_results: i64,
    pub notifications_limit: i64,

    // Content settings
    pub max_comment_length: usize,
    pub max_bio_length: usize,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "recs=debug,tower_http=debug".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://recs.db".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_expiry_minutes: env::var("JWT_EXPIRY_MINUTES")
                .unwrap_or_else(|_| "10080".to_string())
                .parse()?,

            default_feed_limit: env::var("DEFAULT_FEED_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,
            default_user_recs_limit: env::var("DEFAULT_USER_RECS_LIMIT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,
            search_max_results: env::var("SEARCH_MAX_RESULTS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            notifications_limit: env::var("NOTIFICATIONS_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,

            max_comment_length: env::var("MAX_COMMENT_LENGTH")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()?,
            max_bio_length: env::var("MAX_BIO_LENGTH")
                .unwrap_or_else(|_| "500".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Clamps a client-supplied `skip`/`limit` pair to the configured bounds.
    pub fn page(&self, skip: Option<i64>, limit: Option<i64>, default_limit: i64) -> (i64, i64) {
        let skip = skip.unwrap_or(0).max(0);
        let limit = limit.unwrap_or(default_limit).clamp(1, self.max_page_size.max(1));
        (skip, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        crate::test_support::test_config()
    }

    #[test]
    fn page_uses_default_limit_when_absent() {
        let config = config();
        assert_eq!(config.page(None, None, 50), (0, 50));
        assert_eq!(config.page(None, None, 20), (0, 20));
    }

    #[test]
    fn page_clamps_out_of_range_values() {
        let config = config();
        assert_eq!(config.page(Some(-5), Some(0), 50), (0, 1));
        assert_eq!(config.page(Some(10), Some(10_000), 50), (10, config.max_page_size));
    }
}
