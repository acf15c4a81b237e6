use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Exam, LeaderboardEntry, Part, Review, ScoreRecord};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ExamDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub cover_image: String,
    pub author_id: String,
    pub tags: Vec<String>,
    pub rating: f64,
    pub ratings_count: i64,
    pub submitted_count: i64,
    pub total_time: i32,
    pub language: String,
    pub parts: Vec<Part>,
    pub reviews: Vec<Review>,
    pub user_scores: Vec<UserScoreDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct UserScoreDto {
    pub user_id: String,
    pub total: f64,
    pub parts: Vec<PartScoreDto>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PartScoreDto {
    pub part_index: i32,
    pub score: f64,
}

impl From<Exam> for ExamDto {
    fn from(exam: Exam) -> Self {
        let user_scores = exam
            .user_scores
            .into_iter()
            .map(|(user_id, stored)| {
                let record = ScoreRecord::from(stored);
                UserScoreDto {
                    user_id,
                    total: record.total,
                    parts: record
                        .parts
                        .into_iter()
                        .map(|(index, score)| PartScoreDto {
                            part_index: index as i32,
                            score,
                        })
                        .collect(),
                }
            })
            .collect();

        ExamDto {
            id: exam.id,
            title: exam.title,
            content: exam.content,
            cover_image: exam.cover_image,
            author_id: exam.author_id,
            tags: exam.tags,
            rating: exam.rating,
            ratings_count: exam.ratings_count,
            submitted_count: exam.submitted_count,
            total_time: exam.total_time,
            language: exam.language,
            parts: exam.parts,
            reviews: exam.reviews,
            user_scores,
            created_at: exam.created_at,
            modified_at: exam.modified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct ExamDetailDto {
    pub exam: ExamDto,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl From<Exam> for ExamDetailDto {
    fn from(exam: Exam) -> Self {
        let leaderboard = exam.leaderboard();
        ExamDetailDto {
            exam: exam.into(),
            leaderboard,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmitScoreResponse {
    pub message: String,
    pub id: String,
    pub high_score: f64,
    pub submitted_count: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct CanReviewResponse {
    pub can_review: bool,
    pub best_score: f64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginationMetadata {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginatedExams {
    pub data: Vec<ExamDto>,
    pub pagination: PaginationMetadata,
}

#[derive(Debug, Serialize, SimpleObject)]
pub struct DeleteExamResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::StoredScore;
    use crate::test_utils::fixtures::exam_with_parts;

    #[test]
    fn exam_dto_normalizes_legacy_scores() {
        let mut exam = exam_with_parts(2);
        exam.user_scores
            .insert("legacy-user".to_string(), StoredScore::Legacy(88.0));

        let dto = ExamDto::from(exam);
        assert_eq!(dto.user_scores.len(), 1);
        assert_eq!(dto.user_scores[0].user_id, "legacy-user");
        assert_eq!(dto.user_scores[0].total, 88.0);
        assert!(dto.user_scores[0].parts.is_empty());
    }

    #[test]
    fn exam_detail_carries_leaderboard() {
        let mut exam = exam_with_parts(1);
        exam.user_scores
            .insert("winner".to_string(), StoredScore::Legacy(90.0));
        exam.user_scores
            .insert("loser".to_string(), StoredScore::Legacy(10.0));

        let detail = ExamDetailDto::from(exam);
        assert_eq!(detail.leaderboard.len(), 1);
        assert_eq!(detail.leaderboard[0].user_id, "winner");
    }
}
