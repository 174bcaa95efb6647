//! Prompt construction for question generation and answer evaluation
//!
//! Both prompts ask for a JSON object so the request can run in JSON mode;
//! the response shape is still validated on return.

use mockprep_common::evaluation::EvaluationRequest;

use super::CompletionRequest;

const QUESTION_TEMPERATURE: f32 = 0.8;
const EVALUATION_TEMPERATURE: f32 = 0.3;

const QUESTION_SYSTEM_PROMPT: &str = r#"You are an experienced hiring manager preparing a mock interview.
Respond with a single JSON object of the form:
{"questions": [{"text": string, "difficulty": "easy" | "medium" | "hard", "topic": string, "expectedTime": integer seconds}]}

Rules:
1. Generate exactly the requested number of questions.
2. Match the difficulty mix to the candidate's experience level.
3. Questions must be specific to the role and interview type, not generic trivia.
4. Do not include answers or commentary."#;

const EVALUATION_SYSTEM_PROMPT: &str = r#"You are a strict but supportive interview coach scoring one answer.
Respond with a single JSON object of the form:
{"technicalScore": number 0-10, "communicationScore": number 0-10, "depthScore": number 0-10,
 "strengths": [string], "weaknesses": [string], "idealAnswer": string,
 "followUpTip": string, "encouragement": string}

Score technical accuracy, clarity of communication, and depth of understanding independently.
Calibrate expectations to the candidate's experience level."#;

/// Prompt for `count` questions for the given session parameters
pub fn question_generation(
    role: &str,
    experience_level: &str,
    interview_type: &str,
    count: usize,
) -> CompletionRequest {
    let user = format!(
        "Role: {}\nExperience level: {}\nInterview type: {}\nNumber of questions: {}",
        role, experience_level, interview_type, count
    );
    CompletionRequest {
        system: QUESTION_SYSTEM_PROMPT.to_string(),
        user,
        temperature: QUESTION_TEMPERATURE,
        json_mode: true,
    }
}

/// Prompt to evaluate one answer
///
/// Speech metrics are not sent; they are applied locally after scoring.
pub fn answer_evaluation(request: &EvaluationRequest) -> CompletionRequest {
    let answer = if request.user_answer.trim().is_empty() {
        "(no answer given)"
    } else {
        request.user_answer.as_str()
    };
    let user = format!(
        "Role: {}\nExperience level: {}\n\nQuestion:\n{}\n\nCandidate answer:\n{}",
        request.role, request.experience_level, request.question_text, answer
    );
    CompletionRequest {
        system: EVALUATION_SYSTEM_PROMPT.to_string(),
        user,
        temperature: EVALUATION_TEMPERATURE,
        json_mode: true,
    }
}
