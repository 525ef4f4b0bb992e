//! Wellness score and predicted support needs.

use serde::{Deserialize, Serialize};

use crate::history::{MoodEntry, Utterance, mean, user_sentiment_scores};
use crate::lexicon::{Lexicon, fold};
use crate::trend::{DEFAULT_WINDOW, Trend, analyze_sentiment_trend};

/// Score reported when there is nothing to go on.
pub const NEUTRAL_WELLNESS: f64 = 50.0;

/// Fixed progress credit until practice progress is tracked.
const PROGRESS_COMPONENT: f64 = 10.0;

const ANXIETY_MARKERS: [&str; 3] = ["тревож", "беспоко", "страх"];
const SLEEP_MARKERS: [&str; 2] = ["сон", "sleep"];

/// Engagement points (0–20) from session and message counts.
pub fn engagement_score(total_sessions: usize, total_messages: usize) -> f64 {
    (total_sessions as f64 * 2.0 + total_messages as f64 * 0.5).min(20.0)
}

/// Overall wellness on 0–100.
///
/// Mood (0–40) + sentiment (0–30) + engagement (0–20) + progress (10),
/// minus up to 20 points for the highest observed risk.
pub fn calculate_wellness_score(
    mood_history: &[MoodEntry],
    sentiment_scores: &[f64],
    risk_levels: &[u8],
    engagement: f64,
    lexicon: &Lexicon,
) -> f64 {
    if mood_history.is_empty() && sentiment_scores.is_empty() {
        return NEUTRAL_WELLNESS;
    }

    let mut total = 0.0;

    if !mood_history.is_empty() {
        let sum: f64 = mood_history
            .iter()
            .map(|m| lexicon.mood_weight(&m.mood) * 10.0 * (m.intensity as f64 / 10.0))
            .sum();
        let scaled = sum / mood_history.len() as f64 * 4.0;
        total += (scaled + 20.0).clamp(0.0, 40.0);
    }

    if let Some(avg) = mean(sentiment_scores) {
        total += ((avg + 1.0) / 2.0 * 30.0).clamp(0.0, 30.0);
    }

    total += engagement.clamp(0.0, 20.0);

    let risk_penalty = risk_levels
        .iter()
        .max()
        .map(|&r| r as f64 / 10.0 * 20.0)
        .unwrap_or(0.0);

    (total + PROGRESS_COMPONENT - risk_penalty).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserNeed {
    ImmediateSupport,
    CrisisResources,
    Intervention,
    SleepGuidance,
    AnxietyTechniques,
    EngagementBoost,
}

impl UserNeed {
    pub fn as_str(self) -> &'static str {
        match self {
            UserNeed::ImmediateSupport => "immediate_support",
            UserNeed::CrisisResources => "crisis_resources",
            UserNeed::Intervention => "intervention",
            UserNeed::SleepGuidance => "sleep_guidance",
            UserNeed::AnxietyTechniques => "anxiety_techniques",
            UserNeed::EngagementBoost => "engagement_boost",
        }
    }
}

/// What the user is likely to need next, in a fixed order.
pub fn predict_user_needs(messages: &[Utterance], wellness: f64) -> Vec<UserNeed> {
    let mut needs = Vec::new();

    if wellness < 40.0 {
        needs.push(UserNeed::ImmediateSupport);
        needs.push(UserNeed::CrisisResources);
    }

    let scores = user_sentiment_scores(messages);
    if !scores.is_empty()
        && analyze_sentiment_trend(&scores, DEFAULT_WINDOW).trend == Trend::Declining
    {
        needs.push(UserNeed::Intervention);
    }

    let lowered: Vec<String> = messages.iter().map(|m| fold(&m.text)).collect();

    if lowered
        .iter()
        .any(|t| SLEEP_MARKERS.iter().any(|k| t.contains(k)))
    {
        needs.push(UserNeed::SleepGuidance);
    }

    let anxiety_mentions = lowered
        .iter()
        .filter(|t| ANXIETY_MARKERS.iter().any(|k| t.contains(k)))
        .count();
    if anxiety_mentions >= 3 {
        needs.push(UserNeed::AnxietyTechniques);
    }

    if messages.len() < 5 && wellness < 50.0 {
        needs.push(UserNeed::EngagementBoost);
    }

    needs
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_neutral_baseline() {
        let lex = Lexicon::default();
        assert_eq!(calculate_wellness_score(&[], &[], &[9], 20.0, &lex), 50.0);
    }

    #[test]
    fn test_components_sum() {
        let lex = Lexicon::default();
        // happy at intensity 10: 0.7*10*1.0 = 7 → 7*4 + 20 = 48 → capped 40
        let moods = vec![MoodEntry::new("happy", 10)];
        // avg sentiment 0 → 15
        let score = calculate_wellness_score(&moods, &[0.0], &[], 10.0, &lex);
        assert_relative_eq!(score, 40.0 + 15.0 + 10.0 + 10.0);
    }

    #[test]
    fn test_risk_penalty() {
        let lex = Lexicon::default();
        let base = calculate_wellness_score(&[], &[0.0], &[], 0.0, &lex);
        let penalized = calculate_wellness_score(&[], &[0.0], &[2, 5], 0.0, &lex);
        assert_relative_eq!(base - penalized, 10.0);
    }

    #[test]
    fn test_score_bounds() {
        let lex = Lexicon::default();
        let moods = vec![MoodEntry::new("very_sad", 10); 3];
        let score = calculate_wellness_score(&moods, &[-1.0], &[10], 0.0, &lex);
        assert!((0.0..=100.0).contains(&score));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_engagement_capped() {
        assert_relative_eq!(engagement_score(2, 4), 6.0);
        assert_eq!(engagement_score(50, 50), 20.0);
    }

    #[test]
    fn test_predicted_needs() {
        let messages = vec![
            Utterance::user("мне тревожно").with_sentiment(0.5),
            Utterance::user("беспокоюсь о работе").with_sentiment(0.5),
            Utterance::user("страх не отпускает").with_sentiment(-0.6),
            Utterance::user("и сон пропал").with_sentiment(-0.7),
        ];
        let needs = predict_user_needs(&messages, 35.0);
        assert_eq!(
            needs,
            vec![
                UserNeed::ImmediateSupport,
                UserNeed::CrisisResources,
                UserNeed::Intervention,
                UserNeed::SleepGuidance,
                UserNeed::AnxietyTechniques,
                UserNeed::EngagementBoost,
            ]
        );
    }

    #[test]
    fn test_no_needs_when_well() {
        let messages: Vec<Utterance> = (0..6)
            .map(|_| Utterance::user("всё хорошо").with_sentiment(0.5))
            .collect();
        assert!(predict_user_needs(&messages, 80.0).is_empty());
    }
}
