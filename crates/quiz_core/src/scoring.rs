//! crates/quiz_core/src/scoring.rs
//!
//! Grades a submitted answer sheet against a stored test.

use crate::domain::Test;
use serde::{Deserialize, Serialize};

/// One slot per question, in question order. `None` means unanswered.
pub type AnswerSheet = Vec<Option<u8>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub index: usize,
    pub question: String,
    /// Text of the chosen option, if a valid one was chosen.
    pub given: Option<String>,
    pub correct: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub total: usize,
    pub correct: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
    pub results: Vec<QuestionResult>,
}

pub fn score(test: &Test, answers: &[Option<u8>]) -> Result<ScoreReport, ScoreError> {
    if answers.len() != test.questions.len() {
        return Err(ScoreError::AnswerCountMismatch {
            expected: test.questions.len(),
            actual: answers.len(),
        });
    }

    let results: Vec<QuestionResult> = test
        .questions
        .iter()
        .zip(answers)
        .enumerate()
        .map(|(index, (question, answer))| {
            let given = answer.and_then(|choice| question.options.get(choice as usize).cloned());
            QuestionResult {
                index,
                question: question.question.clone(),
                given,
                correct: question
                    .options
                    .get(question.correct_answer as usize)
                    .cloned()
                    .unwrap_or_default(),
                is_correct: *answer == Some(question.correct_answer),
            }
        })
        .collect();

    let total = results.len();
    let correct = results.iter().filter(|r| r.is_correct).count();
    let percentage = if total == 0 {
        0
    } else {
        ((correct as f64 / total as f64) * 100.0).round() as u32
    };

    Ok(ScoreReport {
        total,
        correct,
        percentage,
        results,
    })
}
