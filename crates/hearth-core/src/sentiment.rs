//! Compound sentiment polarity for a single utterance.
//!
//! English words are scored by VADER. VADER's lexicon has no Russian, so a
//! supplementary valence table is applied with the same rules (booster
//! increment, negation scalar, `x / sqrt(x² + α)` normalization) and the two
//! compounds are summed and clamped to [-1, 1].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::lexicon::{Lexicon, fold};
use crate::risk::calculate_risk;

/// Compound score at or above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score at or below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// VADER's empirical booster increment.
const BOOSTER_INCR: f64 = 0.293;
/// VADER's negation scalar.
const NEGATION_SCALAR: f64 = -0.74;
/// VADER's normalization constant.
const NORMALIZE_ALPHA: f64 = 15.0;
/// How many preceding tokens a negator reaches.
const NEGATION_WINDOW: usize = 3;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

/// Per-utterance scoring result. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentAnalysis {
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub risk_level: u8,
    /// VADER `neg`/`neu`/`pos`/`compound` plus the supplementary `lexicon` compound.
    pub components: BTreeMap<String, f64>,
}

/// Stateless scorer. Holds the VADER analyzer so its lexicon is parsed once.
pub struct SentimentScorer {
    vader: SentimentIntensityAnalyzer<'static>,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            vader: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Score `text`: compound polarity, label and risk level.
    pub fn analyze(&self, text: &str, lexicon: &Lexicon) -> SentimentAnalysis {
        let mut components = BTreeMap::new();
        for key in ["neg", "neu", "pos", "compound"] {
            components.insert(key.to_string(), 0.0);
        }

        let english = english_fragment(text);
        if !english.is_empty() {
            let scores = self.vader.polarity_scores(&english);
            for (key, value) in scores {
                components.insert(key.to_string(), value);
            }
        }

        let lexicon_compound = normalize(lexicon_valence(text, lexicon));
        components.insert("lexicon".to_string(), lexicon_compound);

        let score = (components["compound"] + lexicon_compound).clamp(-1.0, 1.0);

        SentimentAnalysis {
            sentiment_score: score,
            sentiment_label: SentimentLabel::from_score(score),
            risk_level: calculate_risk(text, score, lexicon),
            components,
        }
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens that contain at least one ASCII letter; everything VADER can score.
fn english_fragment(text: &str) -> String {
    text.split_whitespace()
        .filter(|t| t.chars().any(|c| c.is_ascii_alphabetic()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summed raw valence of the supplementary table, before normalization.
pub(crate) fn lexicon_valence(text: &str, lexicon: &Lexicon) -> f64 {
    let mut folded = fold(text);
    let mut total = 0.0;

    // Phrases consume their text so their words are not scored again.
    for phrase in &lexicon.valence_phrases {
        let hits = folded.matches(phrase.term.as_str()).count();
        if hits > 0 {
            total += phrase.valence * hits as f64;
            folded = folded.replace(phrase.term.as_str(), " ");
        }
    }

    let cleaned = NON_WORD.replace_all(&folded, " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    for (i, token) in tokens.iter().enumerate() {
        let Some(entry) = lexicon
            .valence_stems
            .iter()
            .filter(|e| token.starts_with(e.term.as_str()))
            .max_by_key(|e| e.term.len())
        else {
            continue;
        };

        let mut valence = entry.valence;
        if i > 0 && lexicon.boosters.iter().any(|b| b == tokens[i - 1]) {
            valence += BOOSTER_INCR * valence.signum();
        }
        let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
        if window
            .iter()
            .any(|w| lexicon.negators.iter().any(|n| n == w))
        {
            valence *= NEGATION_SCALAR;
        }
        total += valence;
    }

    total
}

/// VADER normalization of a raw valence sum into (-1, 1).
fn normalize(score: f64) -> f64 {
    if score == 0.0 {
        return 0.0;
    }
    score / (score * score + NORMALIZE_ALPHA).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(text: &str) -> SentimentAnalysis {
        SentimentScorer::new().analyze(text, &Lexicon::default())
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(SentimentLabel::from_score(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.049), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn test_english_positive_and_negative() {
        assert_eq!(
            analyze("I am so happy and grateful today!").sentiment_label,
            SentimentLabel::Positive
        );
        assert_eq!(
            analyze("I feel terrible, sad and hopeless").sentiment_label,
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_russian_crisis_phrase_is_negative() {
        let a = analyze("все кончено, не хочу жить");
        assert_eq!(a.sentiment_label, SentimentLabel::Negative);
        assert!(a.sentiment_score < -0.5, "got {}", a.sentiment_score);
        assert_eq!(a.components["compound"], 0.0);
    }

    #[test]
    fn test_russian_positive() {
        let a = analyze("Сегодня всё отлично, я очень счастлива");
        assert_eq!(a.sentiment_label, SentimentLabel::Positive);
    }

    #[test]
    fn test_negation_flips_stem() {
        let lex = Lexicon::default();
        assert!(lexicon_valence("мне плохо", &lex) < 0.0);
        assert!(lexicon_valence("мне не плохо", &lex) > 0.0);
    }

    #[test]
    fn test_booster_amplifies() {
        let lex = Lexicon::default();
        let plain = lexicon_valence("мне грустно", &lex);
        let boosted = lexicon_valence("мне очень грустно", &lex);
        assert!(boosted < plain);
    }

    #[test]
    fn test_phrase_not_double_counted() {
        let lex = Lexicon::default();
        // "нет сил" is a phrase; "нет" must not then negate anything.
        let v = lexicon_valence("нет сил", &lex);
        assert!((v + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_text_neutral() {
        let a = analyze("");
        assert_eq!(a.sentiment_score, 0.0);
        assert_eq!(a.sentiment_label, SentimentLabel::Neutral);
        assert_eq!(a.risk_level, 0);
    }

    #[test]
    fn test_idempotent() {
        let scorer = SentimentScorer::new();
        let lex = Lexicon::default();
        let text = "Мне тревожно, I am very worried about work";
        assert_eq!(scorer.analyze(text, &lex), scorer.analyze(text, &lex));
    }

    #[test]
    fn test_score_bounded() {
        let a = analyze(
            "хорошо отлично прекрасно замечательно счастье радость wonderful amazing great love",
        );
        assert!(a.sentiment_score <= 1.0 && a.sentiment_score > 0.5);
    }

    #[test]
    fn test_yo_folding() {
        let lex = Lexicon::default();
        assert_eq!(
            lexicon_valence("всё кончено", &lex),
            lexicon_valence("все кончено", &lex)
        );
    }

    #[test]
    fn test_label_parse() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ] {
            assert_eq!(SentimentLabel::parse(label.as_str()), Some(label));
        }
        assert_eq!(SentimentLabel::parse("mixed"), None);
    }
}
