//! Evaluation rating rules.
//!
//! An evaluation carries a mandatory 1-5 integer rating and an optional
//! free-text review. A user may evaluate each game at most once; the DB
//! enforces this with the `uq_evaluations_user_game` composite constraint.

use crate::error::CoreError;
use crate::moderation::validate_content;

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;

/// Validate that a rating is within the accepted 1-5 range.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}

/// Validate an optional review text. `None` and empty-after-trim are both
/// treated as "no review".
pub fn validate_review(review: Option<&str>) -> Result<(), CoreError> {
    match review {
        Some(text) if !text.trim().is_empty() => validate_content(text),
        _ => Ok(()),
    }
}

/// Whether a review value counts as an actual review (non-empty text).
pub fn has_review(review: Option<&str>) -> bool {
    review.is_some_and(|r| !r.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_ratings_accepted() {
        assert!(validate_rating(MIN_RATING).is_ok());
        assert!(validate_rating(MAX_RATING).is_ok());
        assert!(validate_rating(3).is_ok());
    }

    #[test]
    fn test_out_of_range_ratings_rejected() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-1).is_err());
    }

    #[test]
    fn test_review_is_optional() {
        assert!(validate_review(None).is_ok());
        assert!(validate_review(Some("")).is_ok());
        assert!(validate_review(Some("great pacing, weak ending")).is_ok());
    }

    #[test]
    fn test_blank_review_does_not_count() {
        assert!(!has_review(None));
        assert!(!has_review(Some("   ")));
        assert!(has_review(Some("solid")));
    }
}
