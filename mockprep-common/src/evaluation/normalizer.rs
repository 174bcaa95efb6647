//! Score normalizer
//!
//! Sub-scores proposed by the AI are clamped into [0, 10] and the overall
//! score is recomputed from them with fixed weights. Any overall score the
//! AI proposed is discarded.

use super::{Evaluation, RawEvaluation};

pub const TECHNICAL_WEIGHT: f64 = 0.4;
pub const COMMUNICATION_WEIGHT: f64 = 0.3;
pub const DEPTH_WEIGHT: f64 = 0.3;

pub const MIN_SUB_SCORE: f64 = 0.0;
pub const MAX_SUB_SCORE: f64 = 10.0;

/// Clamp one sub-score into [0, 10]; NaN becomes 0
pub fn clamp_sub_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SUB_SCORE
    } else {
        score.clamp(MIN_SUB_SCORE, MAX_SUB_SCORE)
    }
}

/// Weighted overall percentage from already-clamped sub-scores
///
/// `round((t*0.4 + c*0.3 + d*0.3) * 10)`, always within 0..=100.
pub fn overall_score(technical: f64, communication: f64, depth: f64) -> u32 {
    let weighted = technical * TECHNICAL_WEIGHT
        + communication * COMMUNICATION_WEIGHT
        + depth * DEPTH_WEIGHT;
    (weighted * 10.0).round().clamp(0.0, 100.0) as u32
}

/// Build an evaluation from validated AI output
pub fn normalize(raw: RawEvaluation) -> Evaluation {
    let technical = clamp_sub_score(raw.technical_score);
    let communication = clamp_sub_score(raw.communication_score);
    let depth = clamp_sub_score(raw.depth_score);

    if let Some(proposed) = raw.overall_score {
        tracing::debug!(proposed, "Discarding AI-proposed overall score");
    }

    Evaluation {
        technical_score: technical,
        communication_score: communication,
        depth_score: depth,
        overall_score: overall_score(technical, communication, depth),
        strengths: raw.strengths,
        weaknesses: raw.weaknesses,
        ideal_answer: raw.ideal_answer,
        follow_up_tip: raw.follow_up_tip.filter(|tip| !tip.trim().is_empty()),
        encouragement: raw.encouragement.unwrap_or_default(),
        keyword_score: None,
        keywords_covered: None,
        keywords_missed: None,
        keyword_validation_passed: None,
        filler_word_count: None,
        filler_words: None,
        words_per_minute: None,
        speaking_time: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(t: f64, c: f64, d: f64, overall: Option<f64>) -> RawEvaluation {
        RawEvaluation {
            technical_score: t,
            communication_score: c,
            depth_score: d,
            overall_score: overall,
            strengths: vec![],
            weaknesses: vec![],
            ideal_answer: String::new(),
            follow_up_tip: None,
            encouragement: None,
        }
    }

    #[test]
    fn test_out_of_range_example() {
        let evaluation = normalize(raw(12.0, -3.0, 7.0, None));
        assert_eq!(evaluation.technical_score, 10.0);
        assert_eq!(evaluation.communication_score, 0.0);
        assert_eq!(evaluation.depth_score, 7.0);
        assert_eq!(evaluation.overall_score, 61);
    }

    #[test]
    fn test_ai_overall_score_is_ignored() {
        let evaluation = normalize(raw(5.0, 5.0, 5.0, Some(97.0)));
        assert_eq!(evaluation.overall_score, 50);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(overall_score(0.0, 0.0, 0.0), 0);
        assert_eq!(overall_score(10.0, 10.0, 10.0), 100);
    }

    #[test]
    fn test_fractional_sub_scores_round() {
        // 7.5*0.4 + 6*0.3 + 8*0.3 = 3.0 + 1.8 + 2.4 = 7.2
        assert_eq!(overall_score(7.5, 6.0, 8.0), 72);
        // 8*0.4 + 7*0.3 + 6*0.3 = 3.2 + 2.1 + 1.8 = 7.1
        assert_eq!(overall_score(8.0, 7.0, 6.0), 71);
    }

    #[test]
    fn test_clamp_handles_non_finite() {
        assert_eq!(clamp_sub_score(f64::NAN), 0.0);
        assert_eq!(clamp_sub_score(f64::INFINITY), 10.0);
        assert_eq!(clamp_sub_score(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_clamped_scores_always_in_range() {
        let samples = [-1e9, -10.0, -0.001, 0.0, 3.3, 9.999, 10.0, 10.5, 1e9];
        for &t in &samples {
            for &c in &samples {
                for &d in &samples {
                    let evaluation = normalize(raw(t, c, d, None));
                    for score in [
                        evaluation.technical_score,
                        evaluation.communication_score,
                        evaluation.depth_score,
                    ] {
                        assert!((0.0..=10.0).contains(&score));
                    }
                    assert!(evaluation.overall_score <= 100);
                }
            }
        }
    }

    #[test]
    fn test_blank_follow_up_tip_dropped() {
        let mut input = raw(5.0, 5.0, 5.0, None);
        input.follow_up_tip = Some("   ".to_string());
        assert!(normalize(input).follow_up_tip.is_none());
    }
}
