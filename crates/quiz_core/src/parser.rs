//! crates/quiz_core/src/parser.rs
//!
//! Turns the free-text reply of the language model into structured questions.
//!
//! The reply is expected to hold one question per blank-line separated block:
//!
//! ```text
//! Question: 2+2?
//! Options:
//! 1. 3
//! 2. 4
//! 3. 5
//! Correct answer: 2
//! ```
//!
//! Blocks that do not describe a complete question are dropped without error.

use crate::domain::{GenerationRequest, Question, Test, OPTION_COUNT};
use chrono::Utc;
use rand::Rng;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use tracing::debug;

pub const QUESTION_MARKER: &str = "Question:";
pub const OPTIONS_MARKER: &str = "Options:";
pub const ANSWER_MARKER: &str = "Correct answer:";

/// Test ids are six-digit numbers. Uniqueness is not checked against the store.
pub const TEST_ID_RANGE: RangeInclusive<u32> = 100_000..=999_999;

static OPTION_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("option numbering pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("the completion contained no text")]
    BlankCompletion,
}

/// Parses a completion into a full `Test` for the given request.
///
/// Individual malformed blocks never fail the parse; only a reply with no
/// content at all is reported, so the caller can retry instead of storing an
/// empty test.
pub fn parse_completion(raw: &str, request: &GenerationRequest) -> Result<Test, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::BlankCompletion);
    }

    let questions = parse_questions(raw);
    debug!(
        requested = request.question_count,
        parsed = questions.len(),
        "Parsed completion into questions"
    );

    Ok(Test {
        id: allocate_test_id(&mut rand::thread_rng()),
        name: request.display_name(),
        questions,
        topic: request.specific_field.clone(),
        difficulty: request.difficulty,
        created_at: Utc::now(),
    })
}

/// Draws a random id from `TEST_ID_RANGE`.
pub fn allocate_test_id<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(TEST_ID_RANGE)
}

/// Extracts every well-formed question from the reply, in order.
pub fn parse_questions(raw: &str) -> Vec<Question> {
    split_blocks(raw)
        .iter()
        .filter_map(|block| parse_block(block))
        .collect()
}

/// Groups trimmed, non-empty lines into blocks separated by blank lines.
fn split_blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_block(lines: &[&str]) -> Option<Question> {
    let mut question = String::new();
    let mut options: Vec<String> = Vec::new();
    let mut in_options = false;
    let mut correct_answer = 0;

    // Every line between `Options:` and the next marker is an option, so a
    // block listing more or fewer than three is dropped rather than cut.
    for line in lines {
        if let Some(rest) = line.strip_prefix(QUESTION_MARKER) {
            question = rest.trim().to_string();
            in_options = false;
        } else if line.starts_with(OPTIONS_MARKER) {
            options.clear();
            in_options = true;
        } else if let Some(rest) = line.strip_prefix(ANSWER_MARKER) {
            correct_answer = parse_answer_index(rest);
            in_options = false;
        } else if in_options {
            let text = strip_numbering(line);
            if !text.is_empty() {
                options.push(text.to_string());
            }
        }
    }

    if question.is_empty() {
        return None;
    }
    let options: [String; OPTION_COUNT] = options.try_into().ok()?;

    Some(Question {
        question,
        options,
        correct_answer,
    })
}

fn strip_numbering(line: &str) -> &str {
    match OPTION_NUMBERING.find(line) {
        Some(prefix) => &line[prefix.end()..],
        None => line,
    }
}

/// Reads a 1-based answer number and returns the 0-based index.
///
/// Only the leading digits are considered. Anything unparsable or outside
/// `1..=3` resets to index 0.
fn parse_answer_index(raw: &str) -> u8 {
    let raw = raw.trim();
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());

    match raw[..end].parse::<u64>() {
        Ok(n) if (1..=OPTION_COUNT as u64).contains(&n) => (n - 1) as u8,
        _ => 0,
    }
}
