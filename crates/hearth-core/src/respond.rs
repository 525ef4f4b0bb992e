//! Reply selection.
//!
//! [`TemplateResponseSelector::respond`] is the single entry point that
//! always yields a usable reply: a remote completion when one was fetched,
//! otherwise one of the local generators, with a minimal fallback when the
//! chosen text comes out empty or too short.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, TurnContext};
use crate::history::{HistoryContext, MoodEntry, Utterance};
use crate::priority::Priority;
use crate::sentiment::SentimentLabel;
use crate::templates::ContentCategory;
use crate::topic::{dominant_topic, top_topic};
use crate::trend::{Trend, TrendAnalysis};

/// Replies shorter than this (in chars, after trimming) are replaced.
pub const MIN_REPLY_CHARS: usize = 10;

/// Per-utterance risk at which the crisis reply is forced.
pub const CRISIS_RISK: u8 = 7;

/// Topic relevance above which guidance is appended.
const GUIDANCE_RELEVANCE: f64 = 0.5;
/// Slope that counts as a shift when classifying the rule-based notes.
const NOTE_SLOPE: f64 = 0.1;

const LAST_RESORT: &str = "Я здесь, чтобы выслушать и помочь.";

/// Which generator produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Remote,
    Contextual,
    RuleBased,
    Assessment,
    Fallback,
}

impl ReplySource {
    pub fn as_str(self) -> &'static str {
        match self {
            ReplySource::Remote => "remote",
            ReplySource::Contextual => "contextual",
            ReplySource::RuleBased => "rule_based",
            ReplySource::Assessment => "assessment",
            ReplySource::Fallback => "fallback",
        }
    }
}

/// Inputs for one reply. `history` already contains the current turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub text: &'a str,
    pub label: SentimentLabel,
    pub risk_level: u8,
    pub history: &'a [Utterance],
    pub moods: &'a [MoodEntry],
    pub is_assessment: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    /// The priority resolver's result, unchanged.
    pub priority: Priority,
    /// `priority` raised to at least high for a crisis-level turn.
    pub effective_priority: Priority,
    pub source: ReplySource,
    pub recommended_category: Option<ContentCategory>,
}

/// Builds replies from the engine's templates with an injected RNG.
pub struct TemplateResponseSelector<'e, R> {
    engine: &'e Engine,
    rng: R,
}

impl<'e, R: Rng> TemplateResponseSelector<'e, R> {
    pub fn new(engine: &'e Engine, rng: R) -> Self {
        Self { engine, rng }
    }

    /// Priority/trend state machine with optional topic guidance.
    pub fn contextual_reply(&self, ctx: &TurnContext) -> String {
        let t = self.engine.templates();
        let trend = ctx.trend.as_ref().map(|a| a.trend).unwrap_or(Trend::Stable);

        let pool = match ctx.priority {
            Priority::Crisis => Some(&t.crisis),
            Priority::High => Some(&t.high_priority),
            _ => match trend {
                Trend::Improving => Some(&t.improving),
                Trend::Declining => Some(&t.declining),
                Trend::Stable => None,
            },
        };
        let mut reply = pool
            .and_then(|p| p.first())
            .unwrap_or(&t.open_prompt)
            .clone();

        if let Some((topic, relevance)) = top_topic(&ctx.topic_relevance)
            && relevance > GUIDANCE_RELEVANCE
            && let Some(guidance) = t.topic_guidance(topic)
        {
            reply.push(' ');
            reply.push_str(guidance);
        }
        reply
    }

    /// Sentiment-branching generator.
    ///
    /// With no trend analysis the half-split delta of `history` decides
    /// whether the improving/declining note is added.
    pub fn rule_based_reply(
        &mut self,
        text: &str,
        label: SentimentLabel,
        risk_level: u8,
        history: &HistoryContext,
        trend: Option<&TrendAnalysis>,
    ) -> String {
        let engine = self.engine;
        let t = engine.templates();

        if risk_level >= CRISIS_RISK {
            let base = t.rule_crisis.first().unwrap_or(&t.fallback_crisis);
            return format!("{base} {}", t.crisis_invitation);
        }

        match label {
            SentimentLabel::Positive => {
                let mut reply = self.pick(&t.positive, &t.fallback_positive);
                let improving = match trend {
                    Some(a) => a.trend == Trend::Improving || a.slope > NOTE_SLOPE,
                    None => history.sentiment_delta > NOTE_SLOPE,
                };
                if improving {
                    reply.push(' ');
                    reply.push_str(&t.improving_note);
                }
                reply
            }
            SentimentLabel::Negative => {
                let mut reply = self.pick(&t.negative, &t.fallback_negative);
                let declining = match trend {
                    Some(a) => a.trend == Trend::Declining || a.slope < -NOTE_SLOPE,
                    None => history.sentiment_delta < -NOTE_SLOPE,
                };
                if declining {
                    reply.push(' ');
                    reply.push_str(&t.declining_note);
                }
                if let Some(topic) = dominant_topic(text, engine.lexicon())
                    && let Some(elaboration) = t.topic_elaboration(topic)
                {
                    reply.push(' ');
                    reply.push_str(elaboration);
                }
                reply
            }
            SentimentLabel::Neutral => {
                if history.conversation_length <= 2 {
                    return self.pick(&t.neutral, &t.fallback_neutral);
                }
                if dominant_topic(text, engine.lexicon()).is_some() {
                    let follow_up = self.pick(&t.follow_up, &t.fallback_neutral);
                    return format!("{follow_up} {}", t.follow_up_suffix);
                }
                self.pick(&t.neutral, &t.fallback_neutral)
            }
        }
    }

    /// Structured reply to questionnaire answers.
    pub fn assessment_reply(&self, text: &str, label: SentimentLabel) -> String {
        let lexicon = self.engine.lexicon();
        let t = self.engine.templates();
        let mut parts: Vec<String> = vec![t.intake_opening.clone()];

        if text.contains("ВАЖНО:") && text.contains("Другое:") {
            parts.push(t.intake_other_answers.clone());
        }

        match label {
            SentimentLabel::Negative => parts.push(t.intake_negative.clone()),
            SentimentLabel::Positive => parts.push(t.intake_positive.clone()),
            SentimentLabel::Neutral => {}
        }

        let focus = lexicon.focus_areas(text);
        if !focus.is_empty() {
            parts.push(format!("{} {}.", t.intake_focus_prefix, focus.join(", ")));
        }

        parts.push(t.intake_advice(dominant_topic(text, lexicon)).to_string());
        parts.push(t.intake_closing.clone());
        parts.join(" ")
    }

    /// Minimal reply keyed by risk and sentiment.
    pub fn fallback_reply(&self, label: SentimentLabel, risk_level: u8) -> String {
        let t = self.engine.templates();
        let text = if risk_level >= CRISIS_RISK {
            &t.fallback_crisis
        } else {
            match label {
                SentimentLabel::Positive => &t.fallback_positive,
                SentimentLabel::Negative => &t.fallback_negative,
                SentimentLabel::Neutral => &t.fallback_neutral,
            }
        };
        if is_too_short(text) {
            LAST_RESORT.to_string()
        } else {
            text.clone()
        }
    }

    /// Pick the reply for a turn.
    ///
    /// Order: non-empty `remote`; crisis reply when the turn's own risk is
    /// at least 7; assessment intake; the contextual state machine once the
    /// history holds more than 3 entries; the rule-based generator.
    pub fn respond(&mut self, req: &TurnRequest<'_>, remote: Option<&str>) -> Reply {
        let engine = self.engine;
        let ctx = engine.turn_context(req.history, req.moods);

        let priority = ctx.priority;
        let effective_priority = if req.risk_level >= CRISIS_RISK {
            priority.max(Priority::High)
        } else {
            priority
        };

        let recommended_category =
            if req.label == SentimentLabel::Negative || req.is_assessment {
                dominant_topic(req.text, engine.lexicon()).and_then(ContentCategory::for_topic)
            } else {
                None
            };

        let remote = remote.map(str::trim).filter(|r| !r.is_empty());
        let (text, source) = if let Some(remote) = remote {
            (remote.to_string(), ReplySource::Remote)
        } else if req.risk_level >= CRISIS_RISK {
            let text = self.rule_based_reply(
                req.text,
                req.label,
                req.risk_level,
                &ctx.history,
                ctx.trend.as_ref(),
            );
            (text, ReplySource::RuleBased)
        } else if req.is_assessment {
            (self.assessment_reply(req.text, req.label), ReplySource::Assessment)
        } else if req.history.len() > 3 {
            (self.contextual_reply(&ctx), ReplySource::Contextual)
        } else {
            let text = self.rule_based_reply(
                req.text,
                req.label,
                req.risk_level,
                &ctx.history,
                ctx.trend.as_ref(),
            );
            (text, ReplySource::RuleBased)
        };

        let (text, source) = if is_too_short(&text) {
            (self.fallback_reply(req.label, req.risk_level), ReplySource::Fallback)
        } else {
            (text, source)
        };

        Reply {
            text,
            priority,
            effective_priority,
            source,
            recommended_category,
        }
    }

    fn pick(&mut self, pool: &[String], fallback: &str) -> String {
        pool.choose(&mut self.rng)
            .map(String::as_str)
            .unwrap_or(fallback)
            .to_string()
    }
}

fn is_too_short(text: &str) -> bool {
    text.trim().chars().count() < MIN_REPLY_CHARS
}
