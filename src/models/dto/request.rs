use async_graphql::InputObject;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::models::domain::exam::QuestionType;

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitScoreRequest {
    /// Percentage computed by the client, 0-100 by convention.
    pub score: f64,

    /// Absent or `-1` submits for the whole exam.
    #[serde(default)]
    pub part_index: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AddReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    pub cover_image: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(range(min = 1))]
    pub total_time: Option<i32>,

    #[validate(length(min = 1, max = 50))]
    pub language: Option<String>,

    #[serde(default)]
    #[graphql(default)]
    pub parts: Vec<PartInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
pub struct UpdateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub content: Option<String>,

    pub cover_image: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(range(min = 1))]
    pub total_time: Option<i32>,

    #[validate(length(min = 1, max = 50))]
    pub language: Option<String>,

    /// Replaces every part when present.
    pub parts: Option<Vec<PartInput>>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct PartInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[graphql(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 100))]
    pub id: String,

    #[validate(length(min = 1))]
    pub text: String,

    #[serde(default)]
    #[graphql(default)]
    pub question_type: QuestionType,

    #[serde(default)]
    #[graphql(default)]
    pub options: Vec<QuestionOptionInput>,

    #[serde(default)]
    #[graphql(default)]
    pub correct_answers: Vec<String>,

    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, InputObject)]
pub struct QuestionOptionInput {
    pub id: String,
    pub text: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub const DEFAULT_LIMIT: i64 = 12;
    pub const MAX_LIMIT: i64 = 100;

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Validates each part and every question inside it.
pub fn validate_parts(parts: &[PartInput]) -> Result<(), ValidationErrors> {
    for part in parts {
        part.validate()?;
        for question in &part.questions {
            question.validate()?;
        }
    }
    Ok(())
}

impl CreateExamRequest {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        validate_parts(&self.parts)
    }
}

impl UpdateExamRequest {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        match &self.parts {
            Some(parts) => validate_parts(parts),
            None => Ok(()),
        }
    }
}
