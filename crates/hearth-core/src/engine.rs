//! Per-turn pipeline: score, aggregate history, resolve priority, reply.

use rand::Rng;
use serde::Serialize;

use crate::history::{
    HistoryContext, MoodEntry, Utterance, user_sentiment_scores, user_turns,
};
use crate::lexicon::{Lexicon, MAX_RISK};
use crate::pattern::{RiskPatternAnalysis, detect_risk_patterns};
use crate::priority::{Priority, generate_response_priority};
use crate::respond::{ReplySource, TemplateResponseSelector, TurnRequest};
use crate::sentiment::{SentimentAnalysis, SentimentLabel, SentimentScorer};
use crate::summary::generate_session_summary;
use crate::templates::{ContentCategory, ResponseTemplates};
use crate::topic::{Topic, TopicRelevance, calculate_topic_relevance};
use crate::trend::{DEFAULT_WINDOW, TrendAnalysis, analyze_sentiment_trend};

/// Owns the immutable tables and the scorer. Share it by reference.
pub struct Engine {
    lexicon: Lexicon,
    scorer: SentimentScorer,
    templates: ResponseTemplates,
}

/// A user turn after scoring, before a reply is chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTurn {
    pub text: String,
    pub analysis: SentimentAnalysis,
    pub is_assessment: bool,
}

impl ScoredTurn {
    pub fn utterance(&self) -> Utterance {
        Utterance::user(self.text.clone())
            .with_sentiment(self.analysis.sentiment_score)
            .with_risk(self.analysis.risk_level)
    }
}

/// Conversation-level signals recomputed every turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnContext {
    pub history: HistoryContext,
    /// `None` until at least one user turn carries a score.
    pub trend: Option<TrendAnalysis>,
    pub risk: RiskPatternAnalysis,
    pub priority: Priority,
    pub topic_relevance: TopicRelevance,
}

/// Everything the caller persists or shows for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub risk_level: u8,
    pub reply_text: String,
    /// Priority from the conversation-level resolver.
    pub priority: Priority,
    /// At least high when this turn alone reaches crisis-level risk.
    pub effective_priority: Priority,
    pub recommended_topic_category: Option<ContentCategory>,
    pub source: ReplySource,
}

impl Engine {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            scorer: SentimentScorer::new(),
            templates: ResponseTemplates::default(),
        }
    }

    pub fn with_templates(mut self, templates: ResponseTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn templates(&self) -> &ResponseTemplates {
        &self.templates
    }

    pub fn analyze(&self, text: &str) -> SentimentAnalysis {
        self.scorer.analyze(text, &self.lexicon)
    }

    /// Score a user turn. Assessment answers that mention distress get one
    /// extra risk point.
    pub fn score_turn(&self, text: &str) -> ScoredTurn {
        let mut analysis = self.analyze(text);
        let is_assessment = self.lexicon.is_assessment(text);
        if is_assessment && self.lexicon.has_distress(text) {
            analysis.risk_level = (analysis.risk_level + 1).min(MAX_RISK);
        }
        ScoredTurn {
            text: text.to_string(),
            analysis,
            is_assessment,
        }
    }

    /// Aggregate a history (current turn included) and the latest moods.
    ///
    /// Pattern detection and topic relevance only look at user turns so that
    /// reply text never feeds back into risk.
    pub fn turn_context(&self, history: &[Utterance], moods: &[MoodEntry]) -> TurnContext {
        let ctx = HistoryContext::from_history(history, &self.lexicon);

        let scores = user_sentiment_scores(history);
        let trend =
            (!scores.is_empty()).then(|| analyze_sentiment_trend(&scores, DEFAULT_WINDOW));

        let users = user_turns(history);
        let risk = detect_risk_patterns(&users, moods, &self.lexicon);

        let stable = TrendAnalysis::default();
        let priority = generate_response_priority(
            ctx.avg_sentiment,
            trend.as_ref().unwrap_or(&stable),
            &risk,
            ctx.conversation_length,
        );

        let topic_relevance = calculate_topic_relevance(&users, &Topic::RELEVANCE, &self.lexicon);

        TurnContext {
            history: ctx,
            trend,
            risk,
            priority,
            topic_relevance,
        }
    }

    pub fn selector<R: Rng>(&self, rng: R) -> TemplateResponseSelector<'_, R> {
        TemplateResponseSelector::new(self, rng)
    }

    /// Choose a reply for an already scored turn.
    ///
    /// `prior` is the history before this turn. `remote` is a completion the
    /// caller already fetched; it wins when non-empty.
    pub fn complete_turn<R: Rng>(
        &self,
        turn: &ScoredTurn,
        prior: &[Utterance],
        moods: &[MoodEntry],
        remote: Option<&str>,
        rng: R,
    ) -> TurnOutcome {
        let mut history = prior.to_vec();
        history.push(turn.utterance());

        let request = TurnRequest {
            text: &turn.text,
            label: turn.analysis.sentiment_label,
            risk_level: turn.analysis.risk_level,
            history: &history,
            moods,
            is_assessment: turn.is_assessment,
        };
        let reply = self.selector(rng).respond(&request, remote);

        TurnOutcome {
            sentiment_score: turn.analysis.sentiment_score,
            sentiment_label: turn.analysis.sentiment_label,
            risk_level: turn.analysis.risk_level,
            reply_text: reply.text,
            priority: reply.priority,
            effective_priority: reply.effective_priority,
            recommended_topic_category: reply.recommended_category,
            source: reply.source,
        }
    }

    /// Score and answer a turn locally.
    pub fn process_turn<R: Rng>(
        &self,
        text: &str,
        prior: &[Utterance],
        moods: &[MoodEntry],
        rng: R,
    ) -> TurnOutcome {
        let turn = self.score_turn(text);
        self.complete_turn(&turn, prior, moods, None, rng)
    }

    pub fn summarize(&self, history: &[Utterance]) -> String {
        generate_session_summary(history, &self.lexicon)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}
