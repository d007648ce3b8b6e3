use crate::{
    config::Config,
    error::{AppError, Result},
    models::user::{SignupRequest, User, UserOut},
    services::Database,
};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct AuthService {
    db: Arc<Database>,
    config: Config,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
}

impl AuthService {
    pub async fn new(db: Arc<Database>, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            config: config.clone(),
        })
    }

    /// Creates an account. Email is checked before username, and the store's
    /// unique constraints settle any race between the checks and the insert.
    pub async fn register(&self, request: SignupRequest) -> Result<UserOut> {
        request.validate()?;
        debug!("Registering user: {}", request.username);

        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&request.email)
                .fetch_one(self.db.pool())
                .await?;
        if email_taken {
            return Err(AppError::conflict("Email already registered"));
        }

        let username_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(&request.username)
                .fetch_one(self.db.pool())
                .await?;
        if username_taken {
            return Err(AppError::conflict("Username already taken"));
        }

        let digest = self.hash_password(&request.password)?;

        let user: User = sqlx::query_as(
            r#"
                INSERT INTO users (username, email, password, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id, username, email, password, bio, avatar, created_at
            "#,
        )
        .bind(&request.username)
        .bind(&request.email)
        .bind(&digest)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| AppError::from_unique_violation(e, "Username or email already registered"))?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user.into())
    }

    /// Exchanges credentials for a bearer token. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let user: Option<User> = sqlx::query_as(
            "SELECT id, username, email, password, bio, avatar, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        let user = match user {
            Some(user) if self.verify_password(password, &user.password) => user,
            _ => {
                warn!("Failed login attempt for {}", email);
                return Err(AppError::unauthorized("Invalid credentials"));
            }
        };

        info!("User {} logged in", user.id);
        self.issue_token(user.id)
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    pub fn verify_password(&self, password: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!("Stored password digest is malformed: {}", e);
                false
            }
        }
    }

    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.config.jwt_expiry_minutes)).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?)
    }

    pub fn verify_jwt(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                debug!("JWT token verified for user: {}", token_data.claims.sub);
                Ok(token_data.claims)
            }
            Err(e) => {
                warn!("JWT verification failed: {}", e);
                Err(AppError::Jwt(e))
            }
        }
    }

    /// Validates a bearer token and returns the user id it carries.
    pub fn verify_token(&self, token: &str) -> Result<i64> {
        let claims = self.verify_jwt(token)?;
        claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))
    }
}
