//! HS256 JWT implementation of the `AuthProvider` port.

use chrono::{Duration, Utc};
use domains::{AuthProvider, Caller, DomainError, Role, User};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Minimum accepted secret length, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    role: Role,
    iat: i64,
    exp: i64,
}

pub struct JwtAuthProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtAuthProvider {
    pub fn new(secret: &[u8], ttl: Duration) -> anyhow::Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT secret must be at least {MIN_SECRET_LEN} bytes");
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }
}

impl AuthProvider for JwtAuthProvider {
    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::Persistence(anyhow::anyhow!("token signing failed: {e}")))
    }

    fn resolve(&self, token: &str) -> Result<Caller, DomainError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "rejected bearer token");
            DomainError::authentication("Invalid token")
        })?;
        Ok(Caller::new(data.claims.sub, data.claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef-test-secret";

    fn user(role: Role) -> User {
        User {
            id: Uuid::now_v7(),
            username: "nova".into(),
            email: "nova@example.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_resolves_to_same_identity() {
        let provider = JwtAuthProvider::new(SECRET, Duration::hours(1)).unwrap();
        let admin = user(Role::Admin);
        let token = provider.issue_token(&admin).unwrap();

        let caller = provider.resolve(&token).unwrap();
        assert_eq!(caller.user_id, admin.id);
        assert_eq!(caller.role, Role::Admin);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let ours = JwtAuthProvider::new(SECRET, Duration::hours(1)).unwrap();
        let theirs = JwtAuthProvider::new(b"another-secret-of-enough-length", Duration::hours(1)).unwrap();
        let token = theirs.issue_token(&user(Role::Registered)).unwrap();
        assert!(matches!(ours.resolve(&token), Err(DomainError::Authentication(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let provider = JwtAuthProvider::new(SECRET, Duration::hours(-1)).unwrap();
        let token = provider.issue_token(&user(Role::Registered)).unwrap();
        assert!(provider.resolve(&token).is_err());
    }

    #[test]
    fn short_secret_is_refused() {
        assert!(JwtAuthProvider::new(b"short", Duration::hours(1)).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let provider = JwtAuthProvider::new(SECRET, Duration::hours(1)).unwrap();
        assert!(provider.resolve("not.a.jwt").is_err());
    }
}
