//! Hearth conversational engine.
//!
//! Scores free-text turns for sentiment and crisis risk, follows the
//! sentiment trend across a conversation, resolves how urgently to answer
//! and picks a supportive reply from fixed templates. Scoring is keyword
//! and heuristic based: a VADER compound score for English tokens plus a
//! supplementary Russian valence table.
//!
//! Zero I/O. Tables live in [`Lexicon`] and [`ResponseTemplates`] and are
//! passed by reference; randomness is injected by the caller.

pub mod completion;
pub mod engine;
pub mod history;
pub mod lexicon;
pub mod pattern;
pub mod priority;
pub mod respond;
pub mod risk;
pub mod sentiment;
pub mod summary;
pub mod templates;
pub mod topic;
pub mod trend;
pub mod wellness;

pub use completion::{ChatMessage, ChatRole, CompletionRequest, build_completion_messages};
pub use engine::{Engine, ScoredTurn, TurnContext, TurnOutcome};
pub use history::{HistoryContext, MoodEntry, Sender, Utterance};
pub use lexicon::{Lexicon, MAX_RISK};
pub use pattern::{RiskFactor, RiskPatternAnalysis, Severity, detect_risk_patterns};
pub use priority::{Priority, generate_response_priority};
pub use respond::{Reply, ReplySource, TemplateResponseSelector, TurnRequest};
pub use risk::calculate_risk;
pub use sentiment::{SentimentAnalysis, SentimentLabel, SentimentScorer};
pub use summary::generate_session_summary;
pub use templates::{ContentCategory, ResponseTemplates};
pub use topic::{Topic, TopicRelevance, calculate_topic_relevance, dominant_topic};
pub use trend::{DEFAULT_WINDOW, Trend, TrendAnalysis, analyze_sentiment_trend};
pub use wellness::{UserNeed, calculate_wellness_score, engagement_score, predict_user_needs};
