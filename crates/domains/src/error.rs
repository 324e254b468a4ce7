//! # DomainError
//!
//! Centralized error handling for the bulletin core.
//! Every service operation fails with exactly one of these kinds; the HTTP
//! boundary decides what each kind looks like to a client.

use thiserror::Error;

/// The primary error type for all core operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed or missing required input (e.g., empty title, rating of 9)
    #[error("{0}")]
    Validation(String),

    /// Referenced entity absent (e.g., Game, Review)
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// Authenticated, but not allowed to touch this resource
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness violation (e.g., duplicate favorite, taken username)
    #[error("{0}")]
    Conflict(String),

    /// Missing, malformed or expired credential
    #[error("{0}")]
    Authentication(String),

    /// Infrastructure failure (e.g., DB down). Propagated, never retried here.
    #[error("persistence error: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }
}

/// A specialized Result type for core logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = DomainError::not_found("Game", "abc");
        assert_eq!(err.to_string(), "Game not found with ID abc");
    }

    #[test]
    fn storage_failures_lift_into_persistence() {
        fn fails() -> Result<()> {
            Err::<(), _>(anyhow::anyhow!("connection reset"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(DomainError::Persistence(_))));
    }
}
