//! crates/quiz_core/src/generator.rs
//!
//! Drives test generation: builds the prompt, calls the completion service,
//! parses the reply and retries a bounded number of times.

use crate::domain::{GenerationRequest, Test};
use crate::parser::{parse_completion, ParseError};
use crate::ports::{CompletionService, PortError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// How many call-and-parse attempts to make and how long to pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("completion service failed: {0}")]
    Upstream(#[from] PortError),
    #[error("could not parse completion: {0}")]
    Parse(#[from] ParseError),
    #[error("completion contained no valid questions")]
    EmptyResult,
    /// The only variant `Generator::generate` returns.
    #[error("generation failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<GenerationError>,
    },
}

/// Builds the single prompt sent to the language model for a request.
pub fn build_prompt(request: &GenerationRequest) -> String {
    format!(
        "Generate a multiple-choice test with the following parameters:\n\
         - Number of questions: {count}\n\
         - Difficulty: {difficulty}\n\
         - Category: {category}\n\
         - Topic: {topic}\n\
         \n\
         Use exactly this format for every question:\n\
         Question: [question text]\n\
         Options:\n\
         1. [option 1]\n\
         2. [option 2]\n\
         3. [option 3]\n\
         Correct answer: [number of the correct option]\n\
         \n\
         Every question must have exactly 3 options. Give the correct answer as a number from 1 to 3. \
         Separate questions with a blank line and do not add any other text.",
        count = request.question_count,
        difficulty = request.difficulty.as_str(),
        category = request.category.as_str(),
        topic = request.specific_field,
    )
}

/// Generates tests through an injected completion service.
#[derive(Clone)]
pub struct Generator {
    completion: Arc<dyn CompletionService>,
    policy: RetryPolicy,
}

impl Generator {
    pub fn new(completion: Arc<dyn CompletionService>, policy: RetryPolicy) -> Self {
        Self { completion, policy }
    }

    /// Returns the first attempt that yields at least one question.
    ///
    /// Upstream failures, parse failures and empty results are retried after
    /// `RetryPolicy::delay`. When every attempt fails the last failure is
    /// wrapped in `GenerationError::Exhausted`.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Test, GenerationError> {
        let prompt = build_prompt(request);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(&prompt, request).await {
                Ok(test) => {
                    info!(
                        attempt,
                        test_id = test.id,
                        questions = test.questions.len(),
                        "Test generated"
                    );
                    return Ok(test);
                }
                Err(e) if attempt < max_attempts => {
                    warn!(attempt, max_attempts, error = %e, "Generation attempt failed, retrying");
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(attempt, max_attempts, error = %e, "Generation attempts exhausted");
                    return Err(GenerationError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }
    }

    async fn attempt(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<Test, GenerationError> {
        let raw = self.completion.complete(prompt).await?;
        let test = parse_completion(&raw, request)?;
        if test.questions.is_empty() {
            return Err(GenerationError::EmptyResult);
        }
        Ok(test)
    }
}
