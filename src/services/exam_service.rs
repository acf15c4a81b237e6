use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Exam,
        dto::{
            request::{CreateExamRequest, PaginationParams, UpdateExamRequest},
            response::{
                CanReviewResponse, ExamDetailDto, ExamDto, PaginatedExams, PaginationMetadata,
                SubmitScoreResponse,
            },
        },
    },
    repositories::ExamRepository,
    services::{
        review_gate::ReviewGate,
        score_aggregator::{PartIndex, ScoreAggregator},
    },
};

/// Loads an exam document, applies one change, and writes it back.
///
/// Each call is a single read-modify-write with no locking, so two
/// concurrent writes to the same exam can lose one update.
pub struct ExamService {
    repository: Arc<dyn ExamRepository>,
}

impl ExamService {
    pub fn new(repository: Arc<dyn ExamRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_exam(&self, id: &str) -> AppResult<Exam> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Exam with id '{}' not found", id)))
    }

    pub async fn get_exam_detail(&self, id: &str) -> AppResult<ExamDetailDto> {
        let exam = self.get_exam(id).await?;
        Ok(ExamDetailDto::from(exam))
    }

    pub async fn list_exams(&self, pagination: &PaginationParams) -> AppResult<PaginatedExams> {
        let offset = pagination.offset();
        let limit = pagination.limit();
        let (exams, total) = self.repository.list_exams(offset, limit).await?;

        Ok(PaginatedExams {
            data: exams.into_iter().map(ExamDto::from).collect(),
            pagination: PaginationMetadata {
                offset,
                limit,
                total,
            },
        })
    }

    pub async fn create_exam(
        &self,
        request: CreateExamRequest,
        author_id: &str,
    ) -> AppResult<ExamDto> {
        request.validate_all()?;

        let exam = Exam::from_request(request, author_id)?;
        let exam = self.repository.create(exam).await?;

        log::info!(
            "Exam '{}' created by {} with {} parts",
            exam.id,
            author_id,
            exam.parts.len()
        );
        Ok(exam.into())
    }

    pub async fn update_exam(
        &self,
        id: &str,
        request: UpdateExamRequest,
        requester_id: &str,
        requester_is_admin: bool,
    ) -> AppResult<ExamDto> {
        request.validate_all()?;

        let mut exam = self.get_exam(id).await?;
        Self::require_author_or_admin(&exam, requester_id, requester_is_admin)?;

        exam.apply_update(request)?;
        let exam = self.repository.update(exam).await?;

        log::info!("Exam '{}' updated by {}", exam.id, requester_id);
        Ok(exam.into())
    }

    pub async fn delete_exam(
        &self,
        id: &str,
        requester_id: &str,
        requester_is_admin: bool,
    ) -> AppResult<()> {
        let exam = self.get_exam(id).await?;
        Self::require_author_or_admin(&exam, requester_id, requester_is_admin)?;

        self.repository.delete(id).await?;
        log::info!("Exam '{}' deleted by {}", id, requester_id);
        Ok(())
    }

    /// Records a client-computed score. The score is trusted as sent; it is
    /// not re-derived from answers.
    pub async fn submit_score(
        &self,
        exam_id: &str,
        user_id: &str,
        score: f64,
        part_index: Option<i64>,
    ) -> AppResult<SubmitScoreResponse> {
        let part = PartIndex::from_raw(part_index)?;
        let mut exam = self.get_exam(exam_id).await?;

        let outcome = ScoreAggregator::submit(&mut exam, user_id, score, part)?;
        exam.modified_at = Some(Utc::now());
        let exam = self.repository.update(exam).await?;

        log::info!(
            "Score {} saved for user {} on exam '{}' ({:?}), best {}",
            score,
            user_id,
            exam.id,
            part,
            outcome.high_score
        );

        Ok(SubmitScoreResponse {
            message: "Score saved".to_string(),
            id: exam.id,
            high_score: outcome.high_score,
            submitted_count: outcome.submitted_count,
        })
    }

    pub async fn can_review(&self, exam_id: &str, user_id: &str) -> AppResult<CanReviewResponse> {
        let exam = self.get_exam(exam_id).await?;
        Ok(CanReviewResponse {
            can_review: ReviewGate::can_review(&exam, user_id),
            best_score: ScoreAggregator::best_score(&exam, user_id),
        })
    }

    pub async fn add_review(
        &self,
        exam_id: &str,
        user_id: &str,
        rating: i32,
        comment: &str,
    ) -> AppResult<ExamDto> {
        let mut exam = self.get_exam(exam_id).await?;

        let review = ReviewGate::add_review(&mut exam, user_id, rating, comment)?;
        exam.modified_at = Some(Utc::now());
        let exam = self.repository.update(exam).await?;

        log::info!(
            "Review '{}' added to exam '{}' by {}, rating now {:.2} over {}",
            review.id,
            exam.id,
            user_id,
            exam.rating,
            exam.ratings_count
        );
        Ok(exam.into())
    }

    pub async fn delete_review(
        &self,
        exam_id: &str,
        review_id: &str,
        requester_id: &str,
        requester_is_admin: bool,
    ) -> AppResult<ExamDto> {
        let mut exam = self.get_exam(exam_id).await?;

        ReviewGate::remove_review(&mut exam, review_id, requester_id, requester_is_admin)?;
        exam.modified_at = Some(Utc::now());
        let exam = self.repository.update(exam).await?;

        log::info!(
            "Review '{}' removed from exam '{}' by {}",
            review_id,
            exam.id,
            requester_id
        );
        Ok(exam.into())
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }

    fn require_author_or_admin(exam: &Exam, requester_id: &str, is_admin: bool) -> AppResult<()> {
        if is_admin || exam.is_author(requester_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the exam author or an admin can modify this exam".to_string(),
            ))
        }
    }
}
