//! Speech-metrics annotator for voice answers
//!
//! Pace bands: below 120 wpm is slow, above 180 is fast, 140-160 is ideal.
//! 120-139 and 161-180 deliberately produce no note.

use super::{Evaluation, SpeechMetrics};

pub const FILLER_WARNING_ABOVE: u32 = 5;
pub const FILLER_MINIMAL_MAX: u32 = 2;

pub const PACE_SLOW_BELOW: f64 = 120.0;
pub const PACE_FAST_ABOVE: f64 = 180.0;
pub const PACE_IDEAL_MIN: f64 = 140.0;
pub const PACE_IDEAL_MAX: f64 = 160.0;

/// Copy the metrics onto the evaluation and add threshold-based notes
pub fn annotate(evaluation: &mut Evaluation, metrics: &SpeechMetrics) {
    evaluation.filler_word_count = Some(metrics.filler_word_count);
    evaluation.filler_words = Some(metrics.filler_words.clone());
    evaluation.words_per_minute = Some(metrics.words_per_minute);
    evaluation.speaking_time = Some(metrics.speaking_time);

    let fillers = metrics.filler_word_count;
    if fillers > FILLER_WARNING_ABOVE {
        evaluation.weaknesses.push(format!(
            "Used {} filler words; pause briefly instead of filling silence",
            fillers
        ));
    } else if fillers == 0 {
        evaluation
            .strengths
            .push("Spoke fluently with no filler words".to_string());
    } else if fillers <= FILLER_MINIMAL_MAX {
        evaluation
            .strengths
            .push("Spoke clearly with minimal filler words".to_string());
    }

    let wpm = metrics.words_per_minute;
    if wpm < PACE_SLOW_BELOW {
        evaluation.weaknesses.push(format!(
            "Speaking pace too slow ({:.0} wpm); aim for 140-160 wpm",
            wpm
        ));
    } else if wpm > PACE_FAST_ABOVE {
        evaluation.weaknesses.push(format!(
            "Speaking pace too fast ({:.0} wpm); aim for 140-160 wpm",
            wpm
        ));
    } else if (PACE_IDEAL_MIN..=PACE_IDEAL_MAX).contains(&wpm) {
        evaluation
            .strengths
            .push(format!("Speaking at a perfect pace ({:.0} wpm)", wpm));
    }
}
