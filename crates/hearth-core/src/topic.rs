//! Topic classification by weighted keyword overlap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::history::Utterance;
use crate::lexicon::{Lexicon, count_matches, fold};

/// Fixed discussion-topic taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Work,
    Relationships,
    Anxiety,
    Depression,
    Health,
    Sleep,
    SelfEsteem,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Work,
        Topic::Relationships,
        Topic::Anxiety,
        Topic::Depression,
        Topic::Health,
        Topic::Sleep,
        Topic::SelfEsteem,
    ];

    /// Topics scored for conversation-level relevance.
    pub const RELEVANCE: [Topic; 6] = [
        Topic::Work,
        Topic::Relationships,
        Topic::Health,
        Topic::Anxiety,
        Topic::Depression,
        Topic::Sleep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Work => "work",
            Topic::Relationships => "relationships",
            Topic::Anxiety => "anxiety",
            Topic::Depression => "depression",
            Topic::Health => "health",
            Topic::Sleep => "sleep",
            Topic::SelfEsteem => "self_esteem",
        }
    }

    /// User-facing (Russian) name used in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Topic::Work => "работа",
            Topic::Relationships => "отношения",
            Topic::Anxiety => "тревога",
            Topic::Depression => "депрессия",
            Topic::Health => "здоровье",
            Topic::Sleep => "сон",
            Topic::SelfEsteem => "самооценка",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic → relevance in [0, 1]. The top topic is exactly 1.0 when non-empty.
pub type TopicRelevance = BTreeMap<Topic, f64>;

/// Reserved for recency decay; every message currently counts fully.
const RECENCY_WEIGHT: f64 = 1.0;

/// Score messages against `topics`.
///
/// Each message contributes `matches × (1 + |sentiment|) × importance ×
/// recency` to every topic it mentions. Totals are then divided by the
/// largest total. Topics that never match, or have no relevance keywords,
/// are absent from the result.
pub fn calculate_topic_relevance(
    messages: &[Utterance],
    topics: &[Topic],
    lexicon: &Lexicon,
) -> TopicRelevance {
    let mut scores = TopicRelevance::new();

    for msg in messages {
        let content = fold(&msg.text);
        let sentiment = msg.sentiment_score.unwrap_or(0.0);

        for &topic in topics {
            let Some(entry) = lexicon.relevance_entry(topic) else {
                continue;
            };
            let matches = count_matches(&content, &entry.keywords);
            if matches > 0 {
                let relevance =
                    matches as f64 * (1.0 + sentiment.abs()) * entry.importance * RECENCY_WEIGHT;
                *scores.entry(topic).or_insert(0.0) += relevance;
            }
        }
    }

    let max_score = scores.values().copied().fold(0.0_f64, f64::max);
    if max_score > 0.0 {
        for value in scores.values_mut() {
            *value /= max_score;
        }
    }

    scores
}

/// Highest-relevance topic. Ties resolve to the earlier topic.
pub fn top_topic(relevance: &TopicRelevance) -> Option<(Topic, f64)> {
    relevance
        .iter()
        .fold(None, |best: Option<(Topic, f64)>, (&topic, &score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((topic, score)),
        })
}

/// The topic with the most keyword hits in a single text.
/// Ties resolve to the topic listed first in the lexicon.
pub fn dominant_topic(text: &str, lexicon: &Lexicon) -> Option<Topic> {
    let content = fold(text);
    let mut best: Option<(Topic, usize)> = None;

    for entry in &lexicon.topics {
        let hits = count_matches(&content, &entry.keywords);
        if hits == 0 {
            continue;
        }
        match best {
            Some((_, best_hits)) if best_hits >= hits => {}
            _ => best = Some((entry.topic, hits)),
        }
    }

    best.map(|(topic, _)| topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Utterance;

    fn msg(text: &str, score: f64) -> Utterance {
        Utterance::user(text).with_sentiment(score)
    }

    #[test]
    fn test_no_matches_is_empty() {
        let lex = Lexicon::default();
        let rel = calculate_topic_relevance(&[msg("hello there", 0.5)], &Topic::ALL, &lex);
        assert!(rel.is_empty());
    }

    #[test]
    fn test_empty_messages() {
        let lex = Lexicon::default();
        assert!(calculate_topic_relevance(&[], &Topic::ALL, &lex).is_empty());
    }

    #[test]
    fn test_top_topic_normalized_to_one() {
        let lex = Lexicon::default();
        let messages = vec![
            msg("На работе начальник опять давит, проект горит", -0.6),
            msg("Плохо сплю, бессонница", -0.4),
        ];
        let rel = calculate_topic_relevance(&messages, &Topic::ALL, &lex);
        let (top, score) = top_topic(&rel).unwrap();
        assert_eq!(top, Topic::Work);
        assert_eq!(score, 1.0);
        assert!(rel.values().all(|v| (0.0..=1.0).contains(v)));
        assert!(rel.contains_key(&Topic::Sleep));
    }

    #[test]
    fn test_restricted_topic_set() {
        let lex = Lexicon::default();
        let messages = vec![msg("На работе начальник, и плохо сплю", 0.0)];
        let rel = calculate_topic_relevance(&messages, &[Topic::Sleep], &lex);
        assert_eq!(rel.len(), 1);
        assert_eq!(rel[&Topic::Sleep], 1.0);
    }

    #[test]
    fn test_sentiment_magnitude_amplifies() {
        let lex = Lexicon::default();
        // Same keyword count; the more emotional message should dominate.
        let messages = vec![msg("коллеги", 0.0), msg("друг", -0.9)];
        let rel = calculate_topic_relevance(&messages, &Topic::ALL, &lex);
        assert_eq!(rel[&Topic::Relationships], 1.0);
        assert!(rel[&Topic::Work] < 1.0);
    }

    #[test]
    fn test_relevance_uses_narrow_keywords() {
        let lex = Lexicon::default();
        for text in ["мне плохо", "я устал", "ничего не получается", "дедлайн завтра"] {
            let rel = calculate_topic_relevance(&[msg(text, -0.4)], &Topic::ALL, &lex);
            assert!(rel.is_empty(), "{text}: {rel:?}");
        }
        // The detection table still sees them.
        assert_eq!(dominant_topic("мне плохо", &lex), Some(Topic::Depression));
        assert_eq!(dominant_topic("дедлайн завтра", &lex), Some(Topic::Work));
    }

    #[test]
    fn test_relevance_importance_weights() {
        let lex = Lexicon::default();
        // one hit each at equal sentiment: 0.20 vs 0.11
        let rel = calculate_topic_relevance(&[msg("семья и сон", 0.0)], &Topic::RELEVANCE, &lex);
        assert_eq!(rel[&Topic::Relationships], 1.0);
        assert!((rel[&Topic::Sleep] - 0.11 / 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_dominant_topic() {
        let lex = Lexicon::default();
        assert_eq!(
            dominant_topic("Мне страшно, я боюсь и всё время беспокоюсь", &lex),
            Some(Topic::Anxiety)
        );
        assert_eq!(dominant_topic("just words", &lex), None);
    }

    #[test]
    fn test_dominant_topic_tie_prefers_table_order() {
        let lex = Lexicon::default();
        // one work hit, one sleep hit
        assert_eq!(dominant_topic("офис и сон", &lex), Some(Topic::Work));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Topic::SelfEsteem.label(), "самооценка");
        assert_eq!(Topic::SelfEsteem.to_string(), "self_esteem");
    }
}
