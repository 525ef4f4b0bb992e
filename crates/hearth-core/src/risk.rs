//! Single-utterance risk level on a 0–10 integer scale.

use crate::lexicon::{Lexicon, MAX_RISK, RISK_KEYWORD_WEIGHT, count_matches, fold};

/// Keyword hits, sentiment polarity and intensity adverbs, clamped to [0, 10].
///
/// - +3 for every distinct risk keyword present (no per-category cap)
/// - +2 below -0.5 sentiment, +1 below -0.3
/// - +1 for every distinct intensity word present
pub fn calculate_risk(text: &str, sentiment_score: f64, lexicon: &Lexicon) -> u8 {
    let text_lower = fold(text);

    let keyword_hits = count_matches(&text_lower, &lexicon.risk_keywords);
    let mut risk = keyword_hits.saturating_mul(RISK_KEYWORD_WEIGHT as usize);

    if sentiment_score < -0.5 {
        risk += 2;
    } else if sentiment_score < -0.3 {
        risk += 1;
    }

    risk += count_matches(&text_lower, &lexicon.intensity_words);

    risk.min(MAX_RISK as usize) as u8
}
