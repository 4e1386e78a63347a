pub mod domain;
pub mod generator;
pub mod parser;
pub mod ports;
pub mod scoring;

pub use domain::{
    Category, Difficulty, GenerationRequest, InvalidRequest, Question, Test, TestSummary,
};
pub use generator::{GenerationError, Generator, RetryPolicy};
pub use parser::{parse_completion, parse_questions, ParseError};
pub use ports::{CompletionService, PortError, PortResult, TestStore};
pub use scoring::{score, AnswerSheet, ScoreError, ScoreReport};
