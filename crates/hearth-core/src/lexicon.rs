//! Keyword and weight tables shared by every scorer.
//!
//! A `Lexicon` is built once (from the built-in tables or a TOML override)
//! and handed to the scoring functions by reference. Nothing here mutates
//! after construction.
//!
//! All matching against these tables is case-insensitive substring
//! matching on the lowercased text. There is no word-boundary check and no
//! stemming, so `паник` also matches inside `паника` and `very` inside
//! `every`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pattern::RiskFactor;
use crate::topic::Topic;

/// Per-hit increment applied by the risk scorer for each risk keyword.
pub const RISK_KEYWORD_WEIGHT: u8 = 3;

/// Upper bound of every risk scale in the engine.
pub const MAX_RISK: u8 = 10;

/// A risk-indicator category with its weight and trigger phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicator {
    pub factor: RiskFactor,
    pub weight: f64,
    pub keywords: Vec<String>,
}

/// Keywords that reveal one topic in a single text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicKeywords {
    pub topic: Topic,
    pub keywords: Vec<String>,
}

/// Keywords and importance weight used when scoring topic relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceKeywords {
    pub topic: Topic,
    pub importance: f64,
    pub keywords: Vec<String>,
}

/// A valence entry on the VADER scale (roughly -4..4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValenceEntry {
    pub term: String,
    pub valence: f64,
}

/// A focus area named in assessment intakes, with the words that reveal it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusArea {
    pub name: String,
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Single-utterance risk keywords, English and Russian.
    pub risk_keywords: Vec<String>,
    /// Intensity adverbs, each counted once per utterance.
    pub intensity_words: Vec<String>,
    /// Categories used by the multi-message pattern detector, in table order.
    pub risk_indicators: Vec<RiskIndicator>,
    /// Topic detection table in tie-break order.
    pub topics: Vec<TopicKeywords>,
    /// Narrower per-topic lists for conversation-level relevance.
    pub relevance: Vec<RelevanceKeywords>,
    /// Mood name to weight. Unknown moods weigh 0.
    pub mood_weights: BTreeMap<String, f64>,
    /// Multi-word Russian valence phrases, matched before stems.
    pub valence_phrases: Vec<ValenceEntry>,
    /// Russian valence stems, prefix-matched against tokens.
    pub valence_stems: Vec<ValenceEntry>,
    pub negators: Vec<String>,
    pub boosters: Vec<String>,
    /// Phrases marking a turn as an assessment intake.
    pub assessment_markers: Vec<String>,
    /// Distress words that bump an assessment's risk by one.
    pub distress_markers: Vec<String>,
    /// Focus areas listed back to the user after an assessment.
    pub intake_focus: Vec<FocusArea>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn valences(items: &[(&str, f64)]) -> Vec<ValenceEntry> {
    items
        .iter()
        .map(|(term, valence)| ValenceEntry {
            term: term.to_string(),
            valence: *valence,
        })
        .collect()
}

fn indicator(factor: RiskFactor, weight: f64, keywords: &[&str]) -> RiskIndicator {
    RiskIndicator {
        factor,
        weight,
        keywords: strings(keywords),
    }
}

fn focus(name: &str, markers: &[&str]) -> FocusArea {
    FocusArea {
        name: name.to_string(),
        markers: strings(markers),
    }
}

fn topic(topic: Topic, keywords: &[&str]) -> TopicKeywords {
    TopicKeywords {
        topic,
        keywords: strings(keywords),
    }
}

fn relevance(topic: Topic, importance: f64, keywords: &[&str]) -> RelevanceKeywords {
    RelevanceKeywords {
        topic,
        importance,
        keywords: strings(keywords),
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            risk_keywords: strings(&[
                "suicide",
                "kill myself",
                "end my life",
                "want to die",
                "hurt myself",
                "self harm",
                "no reason to live",
                "better off dead",
                "give up",
                "hopeless",
                "суицид",
                "покончить",
                "убить себя",
                "не хочу жить",
                "лучше умереть",
                "нет смысла",
                "безнадежно",
                "навредить себе",
                "кончено",
                "все кончено",
                "все безнадежно",
                "сдаюсь",
                "не выдержу",
                "больше не могу",
            ]),
            intensity_words: strings(&[
                "very",
                "extremely",
                "completely",
                "totally",
                "absolutely",
                "очень",
                "крайне",
                "совсем",
                "полностью",
                "абсолютно",
                "совершенно",
            ]),
            risk_indicators: vec![
                indicator(
                    RiskFactor::Suicide,
                    10.0,
                    &["суицид", "покончить", "убить себя", "не хочу жить"],
                ),
                indicator(
                    RiskFactor::SelfHarm,
                    9.0,
                    &["навредить себе", "порежу", "самоповреждение"],
                ),
                indicator(
                    RiskFactor::Hopelessness,
                    7.0,
                    &["безнадежно", "нет смысла", "все кончено"],
                ),
                indicator(
                    RiskFactor::Isolation,
                    6.0,
                    &["одинок", "никто не понимает", "все отвернулись"],
                ),
                indicator(
                    RiskFactor::ExtremeAnxiety,
                    8.0,
                    &["паника", "не могу дышать", "сердце выпрыгивает"],
                ),
                indicator(
                    RiskFactor::Depression,
                    7.0,
                    &["депрессия", "нет сил", "ничего не хочу"],
                ),
            ],
            topics: vec![
                topic(
                    Topic::Work,
                    &[
                        "работа", "работе", "начальник", "коллеги", "проект", "задача",
                        "дедлайн", "офис",
                    ],
                ),
                topic(
                    Topic::Relationships,
                    &[
                        "друг",
                        "друзья",
                        "семья",
                        "родители",
                        "партнер",
                        "отношения",
                        "любовь",
                        "расставание",
                    ],
                ),
                topic(
                    Topic::Anxiety,
                    &[
                        "тревож", "беспоко", "страх", "паник", "волную", "нервнича", "боюсь",
                    ],
                ),
                topic(
                    Topic::Depression,
                    &[
                        "груст",
                        "подавлен",
                        "плохо",
                        "нет сил",
                        "ничего не хочу",
                        "устал",
                        "апати",
                    ],
                ),
                topic(
                    Topic::Health,
                    &["здоров", "болезн", "боль", "симптом", "врач", "лечени"],
                ),
                topic(
                    Topic::Sleep,
                    &["сон", "сплю", "бессонниц", "не могу уснуть", "усталость"],
                ),
                topic(
                    Topic::SelfEsteem,
                    &[
                        "неуверен",
                        "не нравлюсь",
                        "недостоин",
                        "ничего не получается",
                        "неудач",
                    ],
                ),
            ],
            relevance: vec![
                relevance(
                    Topic::Work,
                    0.15,
                    &["работа", "начальник", "коллеги", "проект", "задача"],
                ),
                relevance(
                    Topic::Relationships,
                    0.20,
                    &["друг", "семья", "партнер", "отношения"],
                ),
                relevance(
                    Topic::Health,
                    0.18,
                    &["здоров", "болезн", "боль", "симптом"],
                ),
                relevance(
                    Topic::Anxiety,
                    0.17,
                    &["тревож", "беспоко", "страх", "паник"],
                ),
                relevance(
                    Topic::Depression,
                    0.19,
                    &["груст", "подавлен", "нет сил", "апати"],
                ),
                relevance(Topic::Sleep, 0.11, &["сон", "сплю", "бессонниц"]),
            ],
            mood_weights: [
                ("very_happy", 0.9),
                ("happy", 0.7),
                ("calm", 0.6),
                ("neutral", 0.5),
                ("sad", -0.4),
                ("anxious", -0.5),
                ("angry", -0.6),
                ("very_sad", -0.8),
            ]
            .into_iter()
            .map(|(mood, weight)| (mood.to_string(), weight))
            .collect(),
            valence_phrases: valences(&[
                ("не хочу жить", -3.4),
                ("лучше умереть", -3.4),
                ("убить себя", -3.5),
                ("все кончено", -3.0),
                ("нет смысла", -2.6),
                ("больше не могу", -2.6),
                ("не выдержу", -2.4),
                ("не могу дышать", -2.5),
                ("ничего не хочу", -2.2),
                ("ничего не получается", -2.1),
                ("никто не понимает", -2.0),
                ("нет сил", -2.0),
                ("все хорошо", 2.2),
                ("все отлично", 2.6),
            ]),
            valence_stems: valences(&[
                ("плох", -2.0),
                ("груст", -2.1),
                ("печал", -2.0),
                ("тоск", -2.2),
                ("тревож", -1.9),
                ("беспоко", -1.6),
                ("страх", -2.0),
                ("страшн", -2.1),
                ("боюсь", -1.8),
                ("паник", -2.3),
                ("одинок", -2.0),
                ("устал", -1.5),
                ("ужасн", -2.5),
                ("депресс", -2.4),
                ("безнадежн", -2.9),
                ("ненавиж", -2.8),
                ("больн", -1.6),
                ("тяжел", -1.8),
                ("трудн", -1.3),
                ("сложн", -1.0),
                ("раздраж", -1.8),
                ("подавлен", -2.3),
                ("апати", -1.8),
                ("плач", -1.9),
                ("умер", -2.5),
                ("кризис", -2.0),
                ("разочаров", -2.0),
                ("виноват", -1.7),
                ("стыд", -1.9),
                ("неудач", -1.9),
                ("неуверен", -1.6),
                ("злюсь", -2.0),
                ("хорош", 1.9),
                ("отличн", 2.7),
                ("прекрасн", 2.9),
                ("замечательн", 2.8),
                ("радост", 2.5),
                ("радуюсь", 2.3),
                ("счаст", 2.7),
                ("спокойн", 1.6),
                ("спасибо", 1.5),
                ("благодар", 1.9),
                ("люблю", 2.3),
                ("весел", 2.1),
                ("лучше", 1.4),
                ("улучш", 1.6),
                ("довол", 1.8),
                ("вдохнов", 2.2),
                ("надежд", 1.5),
                ("уверен", 1.4),
                ("интересн", 1.3),
                ("легче", 1.5),
                ("супер", 2.2),
            ]),
            negators: strings(&["не", "нет", "ни", "никогда"]),
            boosters: strings(&[
                "очень",
                "совсем",
                "абсолютно",
                "полностью",
                "совершенно",
                "крайне",
                "слишком",
                "невероятно",
                "настолько",
            ]),
            assessment_markers: strings(&[
                "тестирование",
                "прохожу тест",
                "мои ответы",
                "вот мои ответы",
            ]),
            distress_markers: strings(&[
                "плохо",
                "трудно",
                "сложно",
                "беспокоит",
                "тревож",
                "грустн",
                "плохое",
            ]),
            intake_focus: vec![
                focus("работа", &["работа", "work"]),
                focus("тревога", &["тревож", "anxiety"]),
                focus("настроение", &["плохо", "груст"]),
                focus("сон", &["сон", "sleep"]),
            ],
        }
    }
}

impl Lexicon {
    /// Weight of a mood name; unknown moods weigh 0.
    pub fn mood_weight(&self, mood: &str) -> f64 {
        self.mood_weights.get(mood).copied().unwrap_or(0.0)
    }

    /// Relevance keywords and importance for a topic, if it is scored.
    pub fn relevance_entry(&self, topic: Topic) -> Option<&RelevanceKeywords> {
        self.relevance.iter().find(|t| t.topic == topic)
    }

    /// Whether the text reads as an assessment intake.
    pub fn is_assessment(&self, text: &str) -> bool {
        contains_any(&fold(text), &self.assessment_markers)
    }

    /// Names of the focus areas an intake text touches, in table order.
    pub fn focus_areas(&self, text: &str) -> Vec<&str> {
        let lower = fold(text);
        self.intake_focus
            .iter()
            .filter(|f| contains_any(&lower, &f.markers))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Whether the text carries any distress marker.
    pub fn has_distress(&self, text: &str) -> bool {
        contains_any(&fold(text), &self.distress_markers)
    }
}

/// Lowercase and fold `ё` into `е`, the form every table is written in.
pub(crate) fn fold(text: &str) -> String {
    text.to_lowercase().replace('ё', "е")
}

/// True if any needle occurs in the (already lowercased) haystack.
pub(crate) fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// Number of needles that occur at least once in the lowercased haystack.
pub(crate) fn count_matches(haystack: &str, needles: &[String]) -> usize {
    needles
        .iter()
        .filter(|n| haystack.contains(n.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_populated() {
        let lex = Lexicon::default();
        assert_eq!(lex.risk_indicators.len(), 6);
        assert_eq!(lex.topics.len(), Topic::ALL.len());
        assert_eq!(lex.relevance.len(), Topic::RELEVANCE.len());
        assert!(lex.risk_keywords.iter().any(|k| k == "не хочу жить"));
    }

    #[test]
    fn test_every_relevance_topic_has_entry() {
        let lex = Lexicon::default();
        for topic in Topic::RELEVANCE {
            assert!(lex.relevance_entry(topic).is_some(), "missing {topic:?}");
        }
        assert!(lex.relevance_entry(Topic::SelfEsteem).is_none());
    }

    #[test]
    fn test_mood_weight_unknown_is_zero() {
        let lex = Lexicon::default();
        assert_eq!(lex.mood_weight("sad"), -0.4);
        assert_eq!(lex.mood_weight("bewildered"), 0.0);
    }

    #[test]
    fn test_assessment_markers() {
        let lex = Lexicon::default();
        assert!(lex.is_assessment("Вот мои ответы на тест"));
        assert!(lex.is_assessment("Я прохожу тест по тревоге"));
        assert!(!lex.is_assessment("Просто хочу поговорить"));
    }

    #[test]
    fn test_focus_areas() {
        let lex = Lexicon::default();
        assert_eq!(
            lex.focus_areas("Работа выматывает, всё плохо, и сон пропал"),
            vec!["работа", "настроение", "сон"]
        );
        assert!(lex.focus_areas("всё в порядке").is_empty());
    }

    #[test]
    fn test_focus_marker_is_exact_substring() {
        let lex = Lexicon::default();
        // "работе" does not contain "работа"
        assert!(lex.focus_areas("на работе тяжело").is_empty());
        assert_eq!(lex.focus_areas("моя работа"), vec!["работа"]);
    }

    #[test]
    fn test_distress_markers() {
        let lex = Lexicon::default();
        assert!(lex.has_distress("Мне очень ПЛОХО"));
        assert!(!lex.has_distress("Всё спокойно"));
    }

    #[test]
    fn test_substring_semantics_are_locale_naive() {
        let needles = vec!["паник".to_string()];
        assert!(contains_any("у меня паника", &needles));
        let needles = vec!["very".to_string()];
        assert_eq!(count_matches("every day", &needles), 1);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let lex: Lexicon = serde_json::from_str(r#"{"intensity_words": ["so"]}"#).unwrap();
        assert_eq!(lex.intensity_words, vec!["so".to_string()]);
        assert_eq!(lex.topics, Lexicon::default().topics);
    }
}
