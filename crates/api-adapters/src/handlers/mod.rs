//! Request handlers, one module per resource.

pub mod auth;
pub mod favorites;
pub mod games;
pub mod reviews;
