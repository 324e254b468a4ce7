//! game-bulletin/crates/domains/src/lib.rs
//!
//! Entities, inputs, rating math and the port traits of the game bulletin.
//! Nothing in here performs I/O.

pub mod error;
pub mod inputs;
pub mod models;
pub mod rating;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use inputs::*;
pub use models::*;
pub use rating::*;
pub use traits::*;
