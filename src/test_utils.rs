#[cfg(test)]
pub mod fixtures {
    use crate::auth::Claims;
    use crate::models::domain::{Exam, Part, Question, QuestionType, UserRole};
    use crate::models::dto::request::{QuestionInput, QuestionOptionInput};

    pub const TEST_AUTHOR_ID: &str = "admin-1";

    /// An exam with `part_count` single-question parts and no scores or reviews.
    pub fn exam_with_parts(part_count: usize) -> Exam {
        let mut exam: Exam = serde_json::from_value(serde_json::json!({
            "id": "exam-1",
            "title": "Fixture exam",
            "content": "Fixture content",
            "author_id": TEST_AUTHOR_ID,
        }))
        .expect("fixture exam should deserialize");

        exam.parts = (0..part_count)
            .map(|i| Part {
                title: format!("Part {}", i + 1),
                questions: vec![Question {
                    id: format!("q{}", i),
                    text: format!("Question {}", i),
                    question_type: QuestionType::Single,
                    options: Vec::new(),
                    correct_answers: vec!["a".to_string()],
                    explanation: None,
                }],
            })
            .collect();
        exam
    }

    pub fn question_input(id: &str) -> QuestionInput {
        QuestionInput {
            id: id.to_string(),
            text: format!("Question {}", id),
            question_type: QuestionType::Single,
            options: vec![
                QuestionOptionInput {
                    id: "a".to_string(),
                    text: "Yes".to_string(),
                    label: Some("A".to_string()),
                },
                QuestionOptionInput {
                    id: "b".to_string(),
                    text: "No".to_string(),
                    label: Some("B".to_string()),
                },
            ],
            correct_answers: vec!["a".to_string()],
            explanation: None,
        }
    }

    pub fn claims_for(user_id: &str, role: UserRole) -> Claims {
        Claims {
            sub: user_id.to_string(),
            role,
            iat: 0,
            exp: 9999999999,
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_exam_shape() {
        let exam = exam_with_parts(3);
        assert_eq!(exam.parts.len(), 3);
        assert_eq!(exam.author_id, TEST_AUTHOR_ID);
        assert_eq!(exam.submitted_count, 0);
        assert!(exam.reviews.is_empty());
    }

    #[test]
    fn test_fixture_question_input() {
        let question = question_input("q7");
        assert_eq!(question.id, "q7");
        assert_eq!(question.correct_answers, vec!["a".to_string()]);
    }
}
