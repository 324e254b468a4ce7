//! # auth-adapters
//!
//! Authentication Provider implementations.
//! Password hashing (Argon2) is always compiled; bearer tokens (JWT) sit
//! behind the `auth-jwt` feature.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::Argon2Hasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtAuthProvider;
