use std::collections::{BTreeMap, HashSet};

use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::review::Review;
use crate::models::domain::score_record::{LeaderboardEntry, ScoreRecord, StoredScore};
use crate::models::dto::request::{
    CreateExamRequest, PartInput, QuestionInput, QuestionOptionInput, UpdateExamRequest,
};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub cover_image: String,
    pub author_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub ratings_count: i64,
    #[serde(default)]
    pub submitted_count: i64,
    #[serde(default = "default_total_time")]
    pub total_time: i32, // minutes
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub user_scores: BTreeMap<String, StoredScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Part {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub correct_answers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Single, // one correct option by convention
    Multiple,
}

fn default_total_time() -> i32 {
    60
}

fn default_language() -> String {
    "English".to_string()
}

impl Exam {
    pub fn from_request(request: CreateExamRequest, author_id: &str) -> AppResult<Self> {
        let parts: Vec<Part> = request.parts.into_iter().map(Part::from).collect();
        ensure_unique_question_ids(&parts)?;

        let now = Utc::now();
        Ok(Exam {
            id: Uuid::new_v4().to_string(),
            title: request.title.trim().to_string(),
            content: request.content,
            cover_image: request.cover_image.unwrap_or_default(),
            author_id: author_id.to_string(),
            tags: request.tags.unwrap_or_default(),
            rating: 0.0,
            ratings_count: 0,
            submitted_count: 0,
            total_time: request.total_time.unwrap_or_else(default_total_time),
            language: request.language.unwrap_or_else(default_language),
            parts,
            reviews: Vec::new(),
            user_scores: BTreeMap::new(),
            created_at: Some(now),
            modified_at: Some(now),
        })
    }

    /// Applies the editable fields of an update. Score and rating aggregates
    /// are derived state and are never taken from a request.
    pub fn apply_update(&mut self, request: UpdateExamRequest) -> AppResult<()> {
        if let Some(parts) = request.parts {
            let parts: Vec<Part> = parts.into_iter().map(Part::from).collect();
            ensure_unique_question_ids(&parts)?;
            self.parts = parts;
        }
        if let Some(title) = request.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = request.content {
            self.content = content;
        }
        if let Some(cover_image) = request.cover_image {
            self.cover_image = cover_image;
        }
        if let Some(tags) = request.tags {
            self.tags = tags;
        }
        if let Some(total_time) = request.total_time {
            self.total_time = total_time;
        }
        if let Some(language) = request.language {
            self.language = language;
        }
        self.modified_at = Some(Utc::now());
        Ok(())
    }

    pub fn score_record(&self, user_id: &str) -> Option<ScoreRecord> {
        self.user_scores.get(user_id).cloned().map(ScoreRecord::from)
    }

    pub fn store_score_record(&mut self, user_id: &str, record: &ScoreRecord) {
        self.user_scores
            .insert(user_id.to_string(), StoredScore::from(record));
    }

    pub fn is_author(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    /// Users whose best total qualifies, best first. Ties go by user id so
    /// the order is stable.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .user_scores
            .iter()
            .map(|(user_id, stored)| (user_id, ScoreRecord::from(stored.clone())))
            .filter(|(_, record)| record.qualifies())
            .map(|(user_id, record)| LeaderboardEntry {
                user_id: user_id.clone(),
                score: record.total,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        entries
    }
}

fn ensure_unique_question_ids(parts: &[Part]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for question in parts.iter().flat_map(|p| p.questions.iter()) {
        if !seen.insert(question.id.as_str()) {
            return Err(AppError::InvalidArgument(format!(
                "Duplicate question id '{}'",
                question.id
            )));
        }
        if question.question_type == QuestionType::Single && question.correct_answers.len() != 1
        {
            log::warn!(
                "Single-choice question '{}' has {} correct answers",
                question.id,
                question.correct_answers.len()
            );
        }
    }
    Ok(())
}

impl From<PartInput> for Part {
    fn from(input: PartInput) -> Self {
        Part {
            title: input.title,
            questions: input.questions.into_iter().map(Question::from).collect(),
        }
    }
}

impl From<QuestionInput> for Question {
    fn from(input: QuestionInput) -> Self {
        Question {
            id: input.id,
            text: input.text,
            question_type: input.question_type,
            options: input.options.into_iter().map(QuestionOption::from).collect(),
            correct_answers: input.correct_answers,
            explanation: input.explanation,
        }
    }
}

impl From<QuestionOptionInput> for QuestionOption {
    fn from(input: QuestionOptionInput) -> Self {
        QuestionOption {
            id: input.id,
            text: input.text,
            label: input.label,
        }
    }
}
