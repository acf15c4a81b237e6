use crate::errors::{AppError, AppResult};
use crate::models::domain::review::{MAX_RATING, MIN_RATING};
use crate::models::domain::{Exam, Review, QUALIFYING_SCORE};
use crate::services::score_aggregator::ScoreAggregator;

pub struct ReviewGate;

impl ReviewGate {
    pub fn can_review(exam: &Exam, user_id: &str) -> bool {
        ScoreAggregator::best_score(exam, user_id) >= QUALIFYING_SCORE
    }

    /// Appends a review and refreshes the rating aggregates.
    pub fn add_review(
        exam: &mut Exam,
        user_id: &str,
        rating: i32,
        comment: &str,
    ) -> AppResult<Review> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::InvalidArgument(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AppError::InvalidArgument(
                "Review comment must not be empty".to_string(),
            ));
        }

        if exam.reviews.iter().any(|r| r.user_id == user_id) {
            return Err(AppError::Conflict(
                "You have already reviewed this exam".to_string(),
            ));
        }

        let best = ScoreAggregator::best_score(exam, user_id);
        if best < QUALIFYING_SCORE {
            return Err(AppError::Forbidden(format!(
                "You need at least {}% to review this exam. Your best: {}%",
                QUALIFYING_SCORE, best
            )));
        }

        let review = Review::new(user_id, rating, comment);
        exam.reviews.push(review.clone());
        Self::recompute_rating(exam);
        Ok(review)
    }

    /// Removes a review on behalf of its author, the exam author, or an admin.
    pub fn remove_review(
        exam: &mut Exam,
        review_id: &str,
        requester_id: &str,
        requester_is_admin: bool,
    ) -> AppResult<Review> {
        let position = exam
            .reviews
            .iter()
            .position(|r| r.id == review_id)
            .ok_or_else(|| AppError::NotFound(format!("Review '{}' not found", review_id)))?;

        let is_review_author = exam.reviews[position].user_id == requester_id;
        if !is_review_author && !exam.is_author(requester_id) && !requester_is_admin {
            return Err(AppError::Forbidden(
                "Not allowed to delete this review".to_string(),
            ));
        }

        let review = exam.reviews.remove(position);
        Self::recompute_rating(exam);
        Ok(review)
    }

    pub fn recompute_rating(exam: &mut Exam) {
        exam.ratings_count = exam.reviews.len() as i64;
        exam.rating = if exam.reviews.is_empty() {
            0.0
        } else {
            let sum: i64 = exam.reviews.iter().map(|r| r.rating as i64).sum();
            sum as f64 / exam.reviews.len() as f64
        };
    }
}
