//! Cross-user ranking by average interview score

use serde::Serialize;
use std::collections::HashMap;

use super::{rounded_mean, ScoredInterview};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub user_id: String,
    pub interviews_completed: usize,
    pub average_score: u32,
    pub best_score: u32,
}

/// Clamp a requested limit into `1..=MAX_LIMIT`, defaulting when absent
pub fn effective_limit(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Rank users by average score, then best score, then completed count
///
/// Interviews without a total score are ignored. Ties on every score field
/// fall back to `user_id` so the ordering is stable.
pub fn leaderboard(interviews: &[ScoredInterview], limit: usize) -> Vec<LeaderboardEntry> {
    let mut per_user: HashMap<&str, Vec<u32>> = HashMap::new();
    for interview in interviews {
        if let Some(score) = interview.total_score {
            per_user.entry(interview.user_id.as_str()).or_default().push(score);
        }
    }

    let mut entries: Vec<LeaderboardEntry> = per_user
        .into_iter()
        .map(|(user_id, scores)| LeaderboardEntry {
            rank: 0,
            user_id: user_id.to_string(),
            interviews_completed: scores.len(),
            average_score: rounded_mean(&scores),
            best_score: scores.iter().copied().max().unwrap_or(0),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.average_score
            .cmp(&a.average_score)
            .then_with(|| b.best_score.cmp(&a.best_score))
            .then_with(|| b.interviews_completed.cmp(&a.interviews_completed))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries.truncate(limit);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn scored(user: &str, score: Option<u32>) -> ScoredInterview {
        ScoredInterview {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            role: "Backend".to_string(),
            interview_type: "technical".to_string(),
            total_score: score,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_ranked_by_average() {
        let interviews = vec![
            scored("alice", Some(60)),
            scored("alice", Some(80)),
            scored("bob", Some(90)),
            scored("carol", Some(50)),
        ];
        let board = leaderboard(&interviews, DEFAULT_LIMIT);
        let order: Vec<(&str, usize)> = board.iter().map(|e| (e.user_id.as_str(), e.rank)).collect();
        assert_eq!(order, vec![("bob", 1), ("alice", 2), ("carol", 3)]);
        assert_eq!(board[1].average_score, 70);
        assert_eq!(board[1].best_score, 80);
        assert_eq!(board[1].interviews_completed, 2);
    }

    #[test]
    fn test_ties_break_on_best_then_count_then_user() {
        let interviews = vec![
            scored("dave", Some(70)),
            scored("erin", Some(60)),
            scored("erin", Some(80)),
            scored("zed", Some(70)),
            scored("zed", Some(70)),
            scored("amy", Some(70)),
            scored("amy", Some(70)),
        ];
        let board = leaderboard(&interviews, DEFAULT_LIMIT);
        let order: Vec<&str> = board.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(order, vec!["erin", "amy", "zed", "dave"]);
    }

    #[test]
    fn test_unscored_interviews_ignored() {
        let interviews = vec![scored("alice", None), scored("bob", Some(40))];
        let board = leaderboard(&interviews, DEFAULT_LIMIT);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user_id, "bob");
    }

    #[test]
    fn test_limit() {
        let interviews: Vec<_> = (0..5).map(|i| scored(&format!("u{}", i), Some(i * 10))).collect();
        assert_eq!(leaderboard(&interviews, 2).len(), 2);
        assert_eq!(effective_limit(None), DEFAULT_LIMIT);
        assert_eq!(effective_limit(Some(0)), 1);
        assert_eq!(effective_limit(Some(1000)), MAX_LIMIT);
    }

    #[test]
    fn test_empty_leaderboard() {
        assert!(leaderboard(&[], DEFAULT_LIMIT).is_empty());
    }
}
