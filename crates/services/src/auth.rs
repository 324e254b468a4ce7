//! # Auth Service
//!
//! Registration, login and bearer resolution. Hashing and token mechanics
//! are delegated to the [`PasswordHasher`] and [`AuthProvider`] ports.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    AuthProvider, Caller, Credentials, DomainError, PasswordHasher, Registration, Result, Role,
    User, UserRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

/// A login or registration outcome.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    provider: Arc<dyn AuthProvider>,
}

const BAD_CREDENTIALS: &str = "Invalid email or password";

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        provider: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            users,
            hasher,
            provider,
        }
    }

    /// Public sign-up. Always yields a `Registered` account.
    pub async fn register(&self, input: Registration) -> Result<Session> {
        let user = self.create_user(input, Role::Registered).await?;
        let token = self.provider.issue_token(&user)?;
        Ok(Session { user, token })
    }

    /// Creates an account with an explicit role; used by the seed tool.
    pub async fn create_user(&self, input: Registration, role: Role) -> Result<User> {
        let username = input.username.trim().to_owned();
        let email = input.email.trim().to_lowercase();
        if username.is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(DomainError::validation(
                "Username, email, and password are required",
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("Email address is not valid"));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::conflict("Username already taken"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered"));
        }

        let password_hash = self.hash_blocking(input.password).await?;
        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        };

        // Lost a race with a concurrent registration.
        if !self.users.insert(&user).await? {
            return Err(DomainError::conflict("Username or email already registered"));
        }
        info!(user_id = %user.id, username = %user.username, role = %user.role, "user registered");
        Ok(user)
    }

    pub async fn login(&self, input: Credentials) -> Result<Session> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || input.password.is_empty() {
            return Err(DomainError::validation("Email and password are required"));
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login attempt for unknown email");
            return Err(DomainError::authentication(BAD_CREDENTIALS));
        };

        if !self.verify_blocking(input.password, user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(DomainError::authentication(BAD_CREDENTIALS));
        }

        let token = self.provider.issue_token(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok(Session { user, token })
    }

    /// Resolves a bearer token to the user it belongs to.
    ///
    /// The stored role wins over whatever the token was minted with.
    pub async fn authenticate(&self, token: &str) -> Result<(Caller, User)> {
        let claimed = self.provider.resolve(token)?;
        let user = self
            .users
            .find_by_id(claimed.user_id)
            .await?
            .ok_or_else(|| DomainError::authentication("User not found"))?;
        Ok((Caller::from(&user), user))
    }

    async fn hash_blocking(&self, password: String) -> Result<String> {
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(anyhow::Error::from)??;
        Ok(hash)
    }

    async fn verify_blocking(&self, password: String, hash: String) -> Result<bool> {
        let hasher = self.hasher.clone();
        let ok = tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(ok)
    }
}
