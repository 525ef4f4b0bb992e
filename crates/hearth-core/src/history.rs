//! Conversation history types and the aggregate context derived from them.

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::sentiment::SentimentLabel;
use crate::topic::{Topic, dominant_topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Sender::User),
            "assistant" => Some(Sender::Assistant),
            _ => None,
        }
    }
}

/// One scored turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub sender: Sender,
    pub text: String,
    pub sentiment_score: Option<f64>,
    pub sentiment_label: Option<SentimentLabel>,
    pub risk_level: u8,
}

impl Utterance {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sentiment_score: None,
            sentiment_label: None,
            risk_level: 0,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            ..Self::user(text)
        }
    }

    /// Attach a sentiment score; the label follows the fixed thresholds.
    pub fn with_sentiment(mut self, score: f64) -> Self {
        self.sentiment_score = Some(score);
        self.sentiment_label = Some(SentimentLabel::from_score(score));
        self
    }

    pub fn with_risk(mut self, risk_level: u8) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// A self-reported mood. Histories are ordered most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: String,
    pub intensity: u8,
    pub timestamp: String,
}

impl MoodEntry {
    pub fn new(mood: impl Into<String>, intensity: u8) -> Self {
        Self {
            mood: mood.into(),
            intensity,
            timestamp: String::new(),
        }
    }
}

/// The user turns of a history, in order.
pub fn user_turns(history: &[Utterance]) -> Vec<Utterance> {
    history.iter().filter(|u| u.is_user()).cloned().collect()
}

/// Sentiment scores of the user turns that carry one.
pub fn user_sentiment_scores(history: &[Utterance]) -> Vec<f64> {
    history
        .iter()
        .filter(|u| u.is_user())
        .filter_map(|u| u.sentiment_score)
        .collect()
}

/// Aggregate view over the user side of a conversation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistoryContext {
    pub avg_sentiment: f64,
    /// Late-half average minus early-half average; 0 with fewer than 4 scores.
    pub sentiment_delta: f64,
    /// Up to three topics by frequency.
    pub dominant_topics: Vec<Topic>,
    /// Number of user turns.
    pub conversation_length: usize,
    pub risk_history: Vec<u8>,
    pub last_risk_level: u8,
}

impl HistoryContext {
    pub fn from_history(history: &[Utterance], lexicon: &Lexicon) -> Self {
        let user: Vec<&Utterance> = history.iter().filter(|u| u.is_user()).collect();
        if user.is_empty() {
            return Self::default();
        }

        let scores: Vec<f64> = user.iter().filter_map(|u| u.sentiment_score).collect();
        let risk_history: Vec<u8> = user.iter().map(|u| u.risk_level).collect();

        let avg_sentiment = mean(&scores).unwrap_or(0.0);

        let sentiment_delta = if scores.len() >= 4 {
            let mid = scores.len() / 2;
            let early = mean(&scores[..mid]).unwrap_or(0.0);
            let late = mean(&scores[mid..]).unwrap_or(0.0);
            late - early
        } else {
            0.0
        };

        // First-seen order is kept for equal counts.
        let mut counts: Vec<(Topic, usize)> = Vec::new();
        for u in &user {
            if let Some(topic) = dominant_topic(&u.text, lexicon) {
                match counts.iter_mut().find(|(t, _)| *t == topic) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((topic, 1)),
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let dominant_topics = counts.into_iter().take(3).map(|(t, _)| t).collect();

        Self {
            avg_sentiment,
            sentiment_delta,
            dominant_topics,
            conversation_length: user.len(),
            last_risk_level: risk_history.last().copied().unwrap_or(0),
            risk_history,
        }
    }

    /// Mean risk over user turns, 0 when there are none.
    pub fn avg_risk(&self) -> f64 {
        if self.risk_history.is_empty() {
            return 0.0;
        }
        self.risk_history.iter().map(|&r| r as f64).sum::<f64>() / self.risk_history.len() as f64
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let ctx = HistoryContext::from_history(&[], &Lexicon::default());
        assert_eq!(ctx, HistoryContext::default());
        assert_eq!(ctx.avg_risk(), 0.0);
    }

    #[test]
    fn test_assistant_turns_ignored() {
        let history = vec![
            Utterance::user("привет").with_sentiment(0.4).with_risk(2),
            Utterance::assistant("Депрессия - серьезное состояние").with_sentiment(-0.9),
        ];
        let ctx = HistoryContext::from_history(&history, &Lexicon::default());
        assert_eq!(ctx.conversation_length, 1);
        assert_eq!(ctx.avg_sentiment, 0.4);
        assert!(ctx.dominant_topics.is_empty());
        assert_eq!(ctx.last_risk_level, 2);
    }

    #[test]
    fn test_delta_needs_four_scores() {
        let lex = Lexicon::default();
        let three: Vec<Utterance> = [0.5, -0.5, -0.5]
            .iter()
            .map(|&s| Utterance::user("x").with_sentiment(s))
            .collect();
        assert_eq!(HistoryContext::from_history(&three, &lex).sentiment_delta, 0.0);

        let four: Vec<Utterance> = [0.5, 0.5, -0.5, -0.5]
            .iter()
            .map(|&s| Utterance::user("x").with_sentiment(s))
            .collect();
        let ctx = HistoryContext::from_history(&four, &lex);
        assert!((ctx.sentiment_delta + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unscored_turns_skip_average() {
        let history = vec![
            Utterance::user("a").with_sentiment(0.6),
            Utterance::user("b"),
        ];
        let ctx = HistoryContext::from_history(&history, &Lexicon::default());
        assert_eq!(ctx.avg_sentiment, 0.6);
        assert_eq!(ctx.conversation_length, 2);
    }

    #[test]
    fn test_dominant_topics_by_frequency() {
        let history = vec![
            Utterance::user("не могу уснуть, сплю по два часа"),
            Utterance::user("начальник на работе"),
            Utterance::user("опять бессонница"),
            Utterance::user("боюсь и беспокоюсь"),
            Utterance::user("друзья не звонят"),
        ];
        let ctx = HistoryContext::from_history(&history, &Lexicon::default());
        assert_eq!(ctx.dominant_topics.len(), 3);
        assert_eq!(ctx.dominant_topics[0], Topic::Sleep);
    }

    #[test]
    fn test_sender_roundtrip_names() {
        assert_eq!(Sender::parse(Sender::Assistant.as_str()), Some(Sender::Assistant));
        assert_eq!(Sender::parse("therapist"), None);
    }
}
