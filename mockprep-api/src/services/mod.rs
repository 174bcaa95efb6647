//! AI-backed services: question generation and answer evaluation

pub mod answer_evaluator;
pub mod question_generator;

pub use answer_evaluator::evaluate_answer;
pub use question_generator::generate_questions;
