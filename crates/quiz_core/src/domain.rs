//! crates/quiz_core/src/domain.rs
//!
//! Defines the core data structures for the quiz generator.
//! Serialized field names follow the JSON shape the browser front end reads
//! (`correctAnswer`, `createdAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on how many questions a single request may ask for.
pub const MAX_QUESTION_COUNT: u32 = 50;

/// Every question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("questionCount must be between 1 and 50, got {0}")]
    QuestionCount(u32),
    #[error("specificField must not be empty")]
    EmptyTopic,
}

/// The broad subject area chosen on the generation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Programming,
    Math,
    Science,
    Language,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Math => "math",
            Category::Science => "science",
            Category::Language => "language",
            Category::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A validated request to generate one test. Consumed once by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub test_name: Option<String>,
    pub question_count: u32,
    pub difficulty: Difficulty,
    pub category: Category,
    pub specific_field: String,
}

impl GenerationRequest {
    pub fn new(
        test_name: Option<String>,
        question_count: u32,
        difficulty: Difficulty,
        category: Category,
        specific_field: impl Into<String>,
    ) -> Result<Self, InvalidRequest> {
        if question_count == 0 || question_count > MAX_QUESTION_COUNT {
            return Err(InvalidRequest::QuestionCount(question_count));
        }
        let specific_field = specific_field.into().trim().to_string();
        if specific_field.is_empty() {
            return Err(InvalidRequest::EmptyTopic);
        }
        let test_name = test_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(Self {
            test_name,
            question_count,
            difficulty,
            category,
            specific_field,
        })
    }

    /// The explicit test name, or `"Test on {topic}"` when none was given.
    pub fn display_name(&self) -> String {
        match &self.test_name {
            Some(name) => name.clone(),
            None => format!("Test on {}", self.specific_field),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: [String; OPTION_COUNT],
    /// Zero-based index into `options`.
    pub correct_answer: u8,
}

/// A generated test, persisted once and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: u32,
    pub name: String,
    pub questions: Vec<Question>,
    pub topic: String,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl Test {
    pub fn summary(&self) -> TestSummary {
        TestSummary {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            question_count: self.questions.len(),
        }
    }
}

/// The listing view of a stored test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub id: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub question_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_zero_questions() {
        let err = GenerationRequest::new(None, 0, Difficulty::Easy, Category::Math, "algebra")
            .unwrap_err();
        assert_eq!(err, InvalidRequest::QuestionCount(0));
    }

    #[test]
    fn request_rejects_too_many_questions() {
        let err = GenerationRequest::new(
            None,
            MAX_QUESTION_COUNT + 1,
            Difficulty::Easy,
            Category::Math,
            "algebra",
        )
        .unwrap_err();
        assert_eq!(err, InvalidRequest::QuestionCount(MAX_QUESTION_COUNT + 1));
    }

    #[test]
    fn request_rejects_blank_topic() {
        let err = GenerationRequest::new(None, 5, Difficulty::Hard, Category::Other, "   ")
            .unwrap_err();
        assert_eq!(err, InvalidRequest::EmptyTopic);
    }

    #[test]
    fn blank_name_falls_back_to_topic_name() {
        let request = GenerationRequest::new(
            Some("  ".to_string()),
            5,
            Difficulty::Medium,
            Category::Programming,
            "python",
        )
        .unwrap();
        assert_eq!(request.test_name, None);
        assert_eq!(request.display_name(), "Test on python");
    }

    #[test]
    fn explicit_name_is_kept() {
        let request = GenerationRequest::new(
            Some("Friday quiz".to_string()),
            5,
            Difficulty::Medium,
            Category::Programming,
            "python",
        )
        .unwrap();
        assert_eq!(request.display_name(), "Friday quiz");
    }

    #[test]
    fn test_serializes_with_front_end_field_names() {
        let test = Test {
            id: 123456,
            name: "Test on go".to_string(),
            questions: vec![Question {
                question: "2+2?".to_string(),
                options: ["3".to_string(), "4".to_string(), "5".to_string()],
                correct_answer: 1,
            }],
            topic: "go".to_string(),
            difficulty: Difficulty::Easy,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&test).unwrap();
        assert_eq!(json["questions"][0]["correctAnswer"], 1);
        assert_eq!(json["difficulty"], "easy");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn summary_counts_questions() {
        let test = Test {
            id: 654321,
            name: "Empty".to_string(),
            questions: Vec::new(),
            topic: "chemistry".to_string(),
            difficulty: Difficulty::Hard,
            created_at: Utc::now(),
        };
        let summary = test.summary();
        assert_eq!(summary.id, 654321);
        assert_eq!(summary.question_count, 0);
    }
}
