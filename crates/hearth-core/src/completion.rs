//! Request body for a remote chat-completion service.
//!
//! Only the message layout lives here; the transport belongs to the caller.

use serde::{Deserialize, Serialize};

use crate::history::{Sender, Utterance};
use crate::respond::CRISIS_RISK;
use crate::sentiment::SentimentLabel;

/// Prior turns forwarded as context.
pub const CONTEXT_TURNS: usize = 5;
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 200;

pub const SYSTEM_PROMPT: &str = "Ты профессиональный психолог-консультант, работающий с русскоязычными клиентами.
Твоя задача - оказывать поддержку, задавать уточняющие вопросы, давать конструктивные советы.
Будь эмпатичным, но профессиональным. Используй технику активного слушания.
Отвечай кратко и по делу (максимум 2-3 предложения).
Если видишь признаки кризисной ситуации (высокий уровень риска), проявляй больше заботы и предлагай обратиться за профессиональной помощью.";

const HIGH_RISK_HINT: &str = "[ВЫСОКИЙ РИСК - будь особенно внимателен]";
const NEGATIVE_HINT: &str = "[Клиент в негативном настроении]";
const POSITIVE_HINT: &str = "[Клиент в позитивном настроении]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// System instruction, the last five prior turns, then the current text
/// with bracketed risk and mood hints appended.
pub fn build_completion_messages(
    text: &str,
    prior: &[Utterance],
    label: SentimentLabel,
    risk_level: u8,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::new(ChatRole::System, SYSTEM_PROMPT)];

    let start = prior.len().saturating_sub(CONTEXT_TURNS);
    for turn in &prior[start..] {
        let role = match turn.sender {
            Sender::User => ChatRole::User,
            Sender::Assistant => ChatRole::Assistant,
        };
        messages.push(ChatMessage::new(role, turn.text.clone()));
    }

    let mut content = text.to_string();
    if risk_level >= CRISIS_RISK {
        content.push(' ');
        content.push_str(HIGH_RISK_HINT);
    }
    match label {
        SentimentLabel::Negative => {
            content.push(' ');
            content.push_str(NEGATIVE_HINT);
        }
        SentimentLabel::Positive => {
            content.push(' ');
            content.push_str(POSITIVE_HINT);
        }
        SentimentLabel::Neutral => {}
    }
    messages.push(ChatMessage::new(ChatRole::User, content));

    messages
}
