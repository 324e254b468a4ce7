//! Rating math shared by every store and the aggregator.

use serde::Serialize;

use crate::error::{DomainError, Result};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// The two derived fields of a Game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: u32,
}

impl RatingSummary {
    /// Full re-derivation from the current set of ratings; no rounding.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u32), |(sum, count), r| (sum + u64::from(r), count + 1));

        if count == 0 {
            return Self::default();
        }

        Self {
            average_rating: sum as f64 / f64::from(count),
            total_ratings: count,
        }
    }
}

/// Checks a client-supplied rating against the 1-5 scale.
pub fn validate_rating(rating: i64) -> Result<u8> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(DomainError::validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )))
    }
}
