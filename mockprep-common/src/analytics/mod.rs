//! Session aggregation for the analytics views
//!
//! Pure functions over completed interviews already loaded from storage.
//! An empty input is a valid empty state: zero stats and empty breakdowns.

pub mod leaderboard;
pub mod trend;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use trend::Trend;

/// Time window applied before aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    Month,
    #[default]
    All,
}

impl TimeRange {
    /// Earliest creation time inside the window, `None` for `All`
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::Week => Some(now - Duration::days(7)),
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::All => None,
        }
    }

    pub fn contains(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.cutoff(now).map_or(true, |cutoff| created_at >= cutoff)
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "all" => Ok(TimeRange::All),
            other => Err(Error::InvalidInput(format!("Unknown time range: {}", other))),
        }
    }
}

/// The slice of a completed interview the aggregator needs
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredInterview {
    pub id: Uuid,
    pub user_id: String,
    pub role: String,
    pub interview_type: String,
    pub total_score: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Sub-scores of one answer row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillSample {
    pub technical: f64,
    pub communication: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_interviews: usize,
    pub total_answers: usize,
    pub average_score: u32,
    pub best_score: u32,
    pub worst_score: u32,
    pub improvement_rate: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
    pub interview_id: Uuid,
    pub date: DateTime<Utc>,
    pub score: u32,
    pub role: String,
    pub interview_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleScore {
    pub role: String,
    pub average_score: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeScore {
    pub interview_type: String,
    pub average_score: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillBreakdown {
    pub technical: f64,
    pub communication: f64,
    pub depth: f64,
}

/// Analytics payload returned to clients
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub overview: Overview,
    pub score_history: Vec<ScorePoint>,
    pub score_by_role: Vec<RoleScore>,
    pub score_by_type: Vec<TypeScore>,
    pub skill_breakdown: SkillBreakdown,
    pub recent_trend: Trend,
}

/// Keep interviews created inside the window
pub fn filter_by_range(
    interviews: Vec<ScoredInterview>,
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<ScoredInterview> {
    interviews
        .into_iter()
        .filter(|i| range.contains(i.created_at, now))
        .collect()
}

/// Aggregate a user's completed interviews and their answers' sub-scores
pub fn aggregate(interviews: &[ScoredInterview], skills: &[SkillSample]) -> AnalyticsReport {
    let mut chronological: Vec<&ScoredInterview> = interviews.iter().collect();
    chronological.sort_by_key(|i| i.created_at);

    let scores: Vec<u32> = chronological.iter().filter_map(|i| i.total_score).collect();

    let overview = Overview {
        total_interviews: interviews.len(),
        total_answers: skills.len(),
        average_score: rounded_mean(&scores),
        best_score: scores.iter().copied().max().unwrap_or(0),
        worst_score: scores.iter().copied().min().unwrap_or(0),
        improvement_rate: trend::improvement_rate(&scores),
    };

    let score_history = chronological
        .iter()
        .filter_map(|i| {
            i.total_score.map(|score| ScorePoint {
                interview_id: i.id,
                date: i.created_at,
                score,
                role: i.role.clone(),
                interview_type: i.interview_type.clone(),
            })
        })
        .collect();

    let score_by_role = group_scores(interviews, |i| &i.role)
        .into_iter()
        .map(|(role, average_score, count)| RoleScore {
            role,
            average_score,
            count,
        })
        .collect();

    let score_by_type = group_scores(interviews, |i| &i.interview_type)
        .into_iter()
        .map(|(interview_type, average_score, count)| TypeScore {
            interview_type,
            average_score,
            count,
        })
        .collect();

    AnalyticsReport {
        overview,
        score_history,
        score_by_role,
        score_by_type,
        skill_breakdown: skill_breakdown(skills),
        recent_trend: trend::classify(&scores),
    }
}

/// Flat mean over every answer row, one decimal
pub fn skill_breakdown(skills: &[SkillSample]) -> SkillBreakdown {
    if skills.is_empty() {
        return SkillBreakdown::default();
    }
    let n = skills.len() as f64;
    let sum = skills.iter().fold((0.0, 0.0, 0.0), |acc, s| {
        (acc.0 + s.technical, acc.1 + s.communication, acc.2 + s.depth)
    });
    SkillBreakdown {
        technical: round1(sum.0 / n),
        communication: round1(sum.1 / n),
        depth: round1(sum.2 / n),
    }
}

// Groups by exact key equality; "Backend" and "backend" stay separate.
fn group_scores<'a, F>(interviews: &'a [ScoredInterview], key: F) -> Vec<(String, u32, usize)>
where
    F: Fn(&'a ScoredInterview) -> &'a String,
{
    let mut groups: BTreeMap<&String, (Vec<u32>, usize)> = BTreeMap::new();
    for interview in interviews {
        let entry = groups.entry(key(interview)).or_default();
        entry.1 += 1;
        if let Some(score) = interview.total_score {
            entry.0.push(score);
        }
    }
    groups
        .into_iter()
        .map(|(name, (scores, count))| (name.clone(), rounded_mean(&scores), count))
        .collect()
}

/// Mean of integer scores rounded to the nearest integer, 0 when empty
pub fn rounded_mean(scores: &[u32]) -> u32 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u64 = scores.iter().map(|&s| s as u64).sum();
    (sum as f64 / scores.len() as f64).round() as u32
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()
    }

    fn interview(day: u32, role: &str, kind: &str, score: Option<u32>) -> ScoredInterview {
        ScoredInterview {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            role: role.to_string(),
            interview_type: kind.to_string(),
            total_score: score,
            created_at: at(day),
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let report = aggregate(&[], &[]);
        assert_eq!(report.overview.total_interviews, 0);
        assert_eq!(report.overview.average_score, 0);
        assert_eq!(report.overview.best_score, 0);
        assert_eq!(report.overview.worst_score, 0);
        assert_eq!(report.overview.improvement_rate, 0);
        assert!(report.score_history.is_empty());
        assert!(report.score_by_role.is_empty());
        assert!(report.score_by_type.is_empty());
        assert_eq!(report.skill_breakdown, SkillBreakdown::default());
        assert_eq!(report.recent_trend, Trend::Stable);
    }

    #[test]
    fn test_three_interviews_end_to_end() {
        let interviews = vec![
            interview(1, "Backend", "technical", Some(50)),
            interview(2, "Backend", "behavioral", Some(70)),
            interview(3, "Frontend", "technical", Some(90)),
        ];
        let report = aggregate(&interviews, &[]);

        assert_eq!(report.overview.total_interviews, 3);
        assert_eq!(report.overview.average_score, 70);
        assert_eq!(report.overview.best_score, 90);
        assert_eq!(report.overview.worst_score, 50);
        assert_eq!(report.recent_trend, Trend::Improving);

        let history: Vec<u32> = report.score_history.iter().map(|p| p.score).collect();
        assert_eq!(history, vec![50, 70, 90]);
    }

    #[test]
    fn test_average_invariant_under_reordering() {
        let mut interviews = vec![
            interview(1, "Backend", "technical", Some(50)),
            interview(2, "Backend", "technical", Some(65)),
            interview(3, "Backend", "technical", Some(91)),
            interview(4, "Backend", "technical", Some(72)),
        ];
        let forward = aggregate(&interviews, &[]);
        interviews.reverse();
        let reversed = aggregate(&interviews, &[]);
        interviews.swap(0, 2);
        let shuffled = aggregate(&interviews, &[]);

        assert_eq!(forward.overview.average_score, 70);
        assert_eq!(reversed.overview.average_score, 70);
        assert_eq!(shuffled.overview.average_score, 70);
    }

    #[test]
    fn test_trend_depends_on_creation_order() {
        let rising = vec![
            interview(1, "Backend", "technical", Some(50)),
            interview(2, "Backend", "technical", Some(70)),
            interview(3, "Backend", "technical", Some(90)),
        ];
        // Same scores assigned to the opposite creation days
        let falling = vec![
            interview(1, "Backend", "technical", Some(90)),
            interview(2, "Backend", "technical", Some(70)),
            interview(3, "Backend", "technical", Some(50)),
        ];

        let rising_report = aggregate(&rising, &[]);
        let falling_report = aggregate(&falling, &[]);

        assert_eq!(rising_report.overview.average_score, falling_report.overview.average_score);
        assert_eq!(rising_report.recent_trend, Trend::Improving);
        assert_eq!(falling_report.recent_trend, Trend::Declining);
        assert_eq!(falling_report.overview.improvement_rate, -40);
    }

    #[test]
    fn test_null_scores_count_but_do_not_average() {
        let interviews = vec![
            interview(1, "Backend", "technical", Some(80)),
            interview(2, "Backend", "technical", None),
        ];
        let report = aggregate(&interviews, &[]);
        assert_eq!(report.overview.total_interviews, 2);
        assert_eq!(report.overview.average_score, 80);
        assert_eq!(report.score_history.len(), 1);
        assert_eq!(report.score_by_role[0].count, 2);
        assert_eq!(report.score_by_role[0].average_score, 80);
    }

    #[test]
    fn test_groups_use_exact_string_match() {
        let interviews = vec![
            interview(1, "Backend", "technical", Some(60)),
            interview(2, "backend", "technical", Some(80)),
            interview(3, "Backend", "system design", Some(71)),
        ];
        let report = aggregate(&interviews, &[]);

        let roles: Vec<(&str, u32, usize)> = report
            .score_by_role
            .iter()
            .map(|r| (r.role.as_str(), r.average_score, r.count))
            .collect();
        assert_eq!(roles, vec![("Backend", 66, 2), ("backend", 80, 1)]);

        let types: Vec<(&str, usize)> = report
            .score_by_type
            .iter()
            .map(|t| (t.interview_type.as_str(), t.count))
            .collect();
        assert_eq!(types, vec![("system design", 1), ("technical", 2)]);
    }

    #[test]
    fn test_skill_breakdown_is_flat_mean_over_answers() {
        // Interview A has one answer, interview B has three; a per-interview
        // average-of-averages would give a different technical mean.
        let skills = vec![
            SkillSample { technical: 10.0, communication: 8.0, depth: 6.0 },
            SkillSample { technical: 2.0, communication: 4.0, depth: 6.0 },
            SkillSample { technical: 2.0, communication: 4.0, depth: 6.0 },
            SkillSample { technical: 2.0, communication: 4.0, depth: 5.0 },
        ];
        let breakdown = skill_breakdown(&skills);
        assert_eq!(breakdown.technical, 4.0);
        assert_eq!(breakdown.communication, 5.0);
        assert_eq!(breakdown.depth, 5.8);
    }

    #[test]
    fn test_time_range_filter() {
        let now = at(30);
        let interviews = vec![
            interview(1, "Backend", "technical", Some(40)),
            interview(20, "Backend", "technical", Some(60)),
            interview(28, "Backend", "technical", Some(80)),
        ];

        assert_eq!(filter_by_range(interviews.clone(), TimeRange::Week, now).len(), 1);
        assert_eq!(filter_by_range(interviews.clone(), TimeRange::Month, now).len(), 3);
        assert_eq!(filter_by_range(interviews, TimeRange::All, now).len(), 3);
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("week".parse::<TimeRange>().unwrap(), TimeRange::Week);
        assert_eq!("all".parse::<TimeRange>().unwrap(), TimeRange::All);
        assert!("year".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_report_wire_format() {
        let report = aggregate(&[interview(1, "Backend", "technical", Some(75))], &[]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overview"]["averageScore"], 75);
        assert_eq!(json["scoreByRole"][0]["role"], "Backend");
        assert_eq!(json["scoreByType"][0]["interviewType"], "technical");
        assert_eq!(json["recentTrend"], "stable");
        assert!(json["skillBreakdown"]["technical"].is_number());
    }
}
