//! Multi-message risk patterns: category hits plus persistent negative mood.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::history::{MoodEntry, Utterance};
use crate::lexicon::{Lexicon, MAX_RISK, fold};

/// Raw score added when recent moods stay negative.
const NEGATIVE_MOOD_WEIGHT: f64 = 5.0;
/// How many of the latest mood entries are inspected.
const MOOD_WINDOW: usize = 3;
/// Negative entries within the window needed to flag the pattern.
const NEGATIVE_MOOD_MIN: usize = 2;
/// Raw score is divided by this before clamping.
const NORMALIZE_DIVISOR: f64 = 10.0;

/// A named contributor to a risk pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Suicide,
    SelfHarm,
    Hopelessness,
    Isolation,
    ExtremeAnxiety,
    Depression,
    PersistentNegativeMood,
}

impl RiskFactor {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskFactor::Suicide => "suicide",
            RiskFactor::SelfHarm => "self_harm",
            RiskFactor::Hopelessness => "hopelessness",
            RiskFactor::Isolation => "isolation",
            RiskFactor::ExtremeAnxiety => "extreme_anxiety",
            RiskFactor::Depression => "depression",
            RiskFactor::PersistentNegativeMood => "persistent_negative_mood",
        }
    }
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    fn from_level(level: f64) -> Self {
        if level >= 8.0 {
            Severity::High
        } else if level >= 5.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPatternAnalysis {
    /// Normalized level in [0, 10].
    pub risk_level: f64,
    pub risk_factors: BTreeSet<RiskFactor>,
    pub requires_attention: bool,
    pub severity: Severity,
}

impl RiskPatternAnalysis {
    pub fn none() -> Self {
        Self {
            risk_level: 0.0,
            risk_factors: BTreeSet::new(),
            requires_attention: false,
            severity: Severity::Low,
        }
    }

    fn from_raw(raw_score: f64, risk_factors: BTreeSet<RiskFactor>) -> Self {
        let risk_level = (raw_score / NORMALIZE_DIVISOR).min(MAX_RISK as f64);
        Self {
            risk_level,
            risk_factors,
            requires_attention: risk_level >= 7.0,
            severity: Severity::from_level(risk_level),
        }
    }
}

impl Default for RiskPatternAnalysis {
    fn default() -> Self {
        Self::none()
    }
}

/// Aggregate risk over `messages` and the latest `mood_history` entries.
///
/// Each message adds a category's weight at most once (first keyword hit
/// wins). `mood_history` is most recent first.
pub fn detect_risk_patterns(
    messages: &[Utterance],
    mood_history: &[MoodEntry],
    lexicon: &Lexicon,
) -> RiskPatternAnalysis {
    let mut raw_score = 0.0;
    let mut factors = BTreeSet::new();

    for msg in messages {
        let content = fold(&msg.text);
        for indicator in &lexicon.risk_indicators {
            if indicator
                .keywords
                .iter()
                .any(|kw| content.contains(kw.as_str()))
            {
                raw_score += indicator.weight;
                factors.insert(indicator.factor);
            }
        }
    }

    if mood_history.len() >= MOOD_WINDOW {
        let negative = mood_history[..MOOD_WINDOW]
            .iter()
            .filter(|m| lexicon.mood_weight(&m.mood) < 0.0)
            .count();
        if negative >= NEGATIVE_MOOD_MIN {
            raw_score += NEGATIVE_MOOD_WEIGHT;
            factors.insert(RiskFactor::PersistentNegativeMood);
        }
    }

    RiskPatternAnalysis::from_raw(raw_score, factors)
}
