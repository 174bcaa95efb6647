//! Recent-vs-earlier trend classification
//!
//! Scores are compared in creation order: the mean of the most recent window
//! against the mean of the earliest window. No smoothing, no confidence test.

use serde::{Deserialize, Serialize};

/// Largest window compared at each end of the sequence
pub const TREND_WINDOW: usize = 3;

/// Points the recent mean must move by before the trend is not `Stable`
pub const TREND_MARGIN: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

/// Window used for `len` scores: `min(3, len / 2)`, so the windows never overlap
pub fn window_size(len: usize) -> usize {
    (len / 2).min(TREND_WINDOW)
}

/// Recent-window mean minus earliest-window mean, 0.0 with fewer than 2 scores
pub fn window_delta(chronological: &[u32]) -> f64 {
    let n = window_size(chronological.len());
    if n == 0 {
        return 0.0;
    }
    let earlier = &chronological[..n];
    let recent = &chronological[chronological.len() - n..];
    mean(recent) - mean(earlier)
}

/// Signed percentage-point change between the windows, rounded
pub fn improvement_rate(chronological: &[u32]) -> i64 {
    window_delta(chronological).round() as i64
}

pub fn classify(chronological: &[u32]) -> Trend {
    let delta = window_delta(chronological);
    if delta > TREND_MARGIN {
        Trend::Improving
    } else if delta < -TREND_MARGIN {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn mean(scores: &[u32]) -> f64 {
    scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
}
