// src/models/quiz_result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One answered question, stored verbatim inside its quiz result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnswerDetail {
    pub question: String,
    pub selected_option: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<String>,
    pub is_correct: bool,
}

/// Represents the 'quiz_results' table in the database.
/// Rows are written once and never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: String,
    pub score: i32,
    pub total_questions: Option<i32>,
    /// NUMERIC(5,2) in the database, read back as FLOAT8.
    pub percentage: Option<f64>,
    /// Seconds.
    pub time_spent: Option<i32>,
    pub answers: Json<Vec<AnswerDetail>>,
    pub created_at: DateTime<Utc>,
}

/// Row to insert for a submission. `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewQuizResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: String,
    pub score: i32,
    pub total_questions: Option<i32>,
    pub percentage: Option<f64>,
    pub time_spent: Option<i32>,
    pub answers: Vec<AnswerDetail>,
}

/// DTO for submitting a quiz attempt.
///
/// Answers are accepted as given: nothing checks them against `score` or
/// `total_questions`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct QuizResultInput {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Level length must be between 1 and 50 characters."
    ))]
    pub level: String,
    #[validate(range(min = 0, message = "Score cannot be negative."))]
    pub score: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Total questions cannot be negative."))]
    pub total_questions: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "Percentage must be between 0 and 100."))]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub answers: Vec<AnswerDetail>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Time spent cannot be negative."))]
    pub time_spent: Option<i32>,
}

impl QuizResultInput {
    pub fn into_new_result(self, id: Uuid, user_id: Uuid) -> NewQuizResult {
        NewQuizResult {
            id,
            user_id,
            level: self.level,
            score: self.score,
            total_questions: self.total_questions,
            percentage: self.percentage.map(round_percentage),
            time_spent: self.time_spent,
            answers: self.answers,
        }
    }
}

/// Two-decimal precision, matching the NUMERIC(5,2) column.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Response shape for a stored quiz result.
///
/// Absent optional fields are reported as zero so the shape never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuizResultView {
    pub id: Uuid,
    pub level: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub time_spent: i32,
    pub created_at: DateTime<Utc>,
}

impl From<QuizResult> for QuizResultView {
    fn from(result: QuizResult) -> Self {
        Self {
            id: result.id,
            level: result.level,
            score: result.score,
            total_questions: result.total_questions.unwrap_or(0),
            percentage: result.percentage.unwrap_or(0.0),
            time_spent: result.time_spent.unwrap_or(0),
            created_at: result.created_at,
        }
    }
}
