//! Domain models shared by the scoring pipeline and the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::evaluation::Evaluation;
use crate::Error;

/// Interview lifecycle status
///
/// Status only moves forward: pending → in_progress → completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Pending,
    InProgress,
    Completed,
}

impl InterviewStatus {
    fn rank(self) -> u8 {
        match self {
            InterviewStatus::Pending => 0,
            InterviewStatus::InProgress => 1,
            InterviewStatus::Completed => 2,
        }
    }

    /// True when `next` is strictly later in the lifecycle
    pub fn can_transition_to(self, next: InterviewStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Pending => "pending",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InterviewStatus::Pending),
            "in_progress" => Ok(InterviewStatus::InProgress),
            "completed" => Ok(InterviewStatus::Completed),
            other => Err(Error::InvalidInput(format!("Unknown interview status: {}", other))),
        }
    }
}

/// Whether the attempt counts as a mock interview or free practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    #[default]
    Interview,
    Practice,
}

impl InterviewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewMode::Interview => "interview",
            InterviewMode::Practice => "practice",
        }
    }
}

impl FromStr for InterviewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interview" => Ok(InterviewMode::Interview),
            "practice" => Ok(InterviewMode::Practice),
            other => Err(Error::InvalidInput(format!("Unknown interview mode: {}", other))),
        }
    }
}

/// Duration bucket chosen at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewDuration {
    Short,
    #[default]
    Medium,
    Long,
}

impl InterviewDuration {
    /// Number of questions generated for this bucket
    pub fn question_count(self) -> usize {
        match self {
            InterviewDuration::Short => 3,
            InterviewDuration::Medium => 5,
            InterviewDuration::Long => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewDuration::Short => "short",
            InterviewDuration::Medium => "medium",
            InterviewDuration::Long => "long",
        }
    }
}

impl FromStr for InterviewDuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(InterviewDuration::Short),
            "medium" => Ok(InterviewDuration::Medium),
            "long" => Ok(InterviewDuration::Long),
            other => Err(Error::InvalidInput(format!("Unknown duration bucket: {}", other))),
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

impl FromStr for Difficulty {
    type Err = Error;

    /// Case-insensitive, AI output is not consistent about casing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::InvalidInput(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// One question in an interview's serialized question list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub difficulty: Difficulty,
    pub topic: String,
    /// Expected answer time in seconds
    pub expected_time: u32,
    /// Expected keywords, only present on document-derived questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// One practice/interview attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: Uuid,
    pub user_id: String,
    pub role: String,
    pub experience_level: String,
    pub interview_type: String,
    pub duration: InterviewDuration,
    pub mode: InterviewMode,
    pub questions: Vec<Question>,
    pub status: InterviewStatus,
    pub total_score: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Parameters for a new interview (everything but identity, status and timestamps)
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub user_id: String,
    pub role: String,
    pub experience_level: String,
    pub interview_type: String,
    pub duration: InterviewDuration,
    pub mode: InterviewMode,
    pub questions: Vec<Question>,
}

impl Interview {
    /// Create a pending interview stamped with the current time
    pub fn new(params: NewInterview) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            role: params.role,
            experience_level: params.experience_level,
            interview_type: params.interview_type,
            duration: params.duration,
            mode: params.mode,
            questions: params.questions,
            status: InterviewStatus::Pending,
            total_score: None,
            created_at: crate::time::now(),
            completed_at: None,
        }
    }

    pub fn question(&self, index: u32) -> Option<&Question> {
        self.questions.get(index as usize)
    }

    pub fn is_completed(&self) -> bool {
        self.status == InterviewStatus::Completed
    }
}

/// One stored response to one question of one interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub question_index: u32,
    pub question_text: String,
    pub user_answer: String,
    pub technical_score: f64,
    pub communication_score: f64,
    pub depth_score: f64,
    pub overall_score: u32,
    pub evaluation: Evaluation,
    pub ideal_answer: String,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    /// Build an answer row from a finished evaluation
    pub fn from_evaluation(
        interview_id: Uuid,
        question_index: u32,
        question_text: String,
        user_answer: String,
        evaluation: Evaluation,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            interview_id,
            question_index,
            question_text,
            user_answer,
            technical_score: evaluation.technical_score,
            communication_score: evaluation.communication_score,
            depth_score: evaluation.depth_score,
            overall_score: evaluation.overall_score,
            ideal_answer: evaluation.ideal_answer.clone(),
            evaluation,
            created_at: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_only() {
        use InterviewStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Completed));

        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            InterviewStatus::Pending,
            InterviewStatus::InProgress,
            InterviewStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<InterviewStatus>().unwrap(), status);
        }
        assert!("done".parse::<InterviewStatus>().is_err());
    }

    #[test]
    fn test_duration_question_counts() {
        assert_eq!(InterviewDuration::Short.question_count(), 3);
        assert_eq!(InterviewDuration::Medium.question_count(), 5);
        assert_eq!(InterviewDuration::Long.question_count(), 8);
    }

    #[test]
    fn test_difficulty_parse_ignores_case() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_question_keywords_omitted_when_absent() {
        let question = Question {
            text: "Explain ownership".to_string(),
            difficulty: Difficulty::Medium,
            topic: "rust".to_string(),
            expected_time: 120,
            keywords: None,
        };
        let json = serde_json::to_value(&question).unwrap();
        assert!(json.get("keywords").is_none());
        assert_eq!(json["expectedTime"], 120);
    }

    #[test]
    fn test_new_interview_starts_pending_without_score() {
        let interview = Interview::new(NewInterview {
            user_id: "u1".to_string(),
            role: "Backend Engineer".to_string(),
            experience_level: "senior".to_string(),
            interview_type: "technical".to_string(),
            duration: InterviewDuration::Short,
            mode: InterviewMode::Interview,
            questions: vec![],
        });
        assert_eq!(interview.status, InterviewStatus::Pending);
        assert!(interview.total_score.is_none());
        assert!(interview.completed_at.is_none());
        assert!(interview.question(0).is_none());
    }
}
