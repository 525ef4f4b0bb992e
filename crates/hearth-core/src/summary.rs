//! End-of-session summary text.

use crate::history::{HistoryContext, Utterance};
use crate::lexicon::Lexicon;

pub const EMPTY_SESSION_SUMMARY: &str = "Сессия завершена. Данные сохранены.";

const PROGRESS_NOTICE: &str = "Все данные сохранены и отражены в разделе 'Мой прогресс'.";

/// Summarize a whole conversation.
///
/// Fragments in order: message count, overall tone (±0.1 bands), average
/// user risk (≥7, ≥4, otherwise), up to three topics, storage notice.
pub fn generate_session_summary(history: &[Utterance], lexicon: &Lexicon) -> String {
    if history.is_empty() {
        return EMPTY_SESSION_SUMMARY.to_string();
    }

    let ctx = HistoryContext::from_history(history, lexicon);
    let mut parts = vec![format!(
        "Сессия завершена. Всего сообщений: {}.",
        history.len()
    )];

    parts.push(
        if ctx.avg_sentiment > 0.1 {
            "Общий эмоциональный тон: положительный."
        } else if ctx.avg_sentiment < -0.1 {
            "Общий эмоциональный тон: требует внимания."
        } else {
            "Общий эмоциональный тон: нейтральный."
        }
        .to_string(),
    );

    let avg_risk = ctx.avg_risk();
    parts.push(
        if avg_risk >= 7.0 {
            "Обнаружены признаки повышенного риска. Рекомендуется обратиться к специалисту."
        } else if avg_risk >= 4.0 {
            "Замечены некоторые тревожные сигналы. Продолжайте работу над собой."
        } else {
            "Уровень риска в норме."
        }
        .to_string(),
    );

    if !ctx.dominant_topics.is_empty() {
        let names: Vec<&str> = ctx.dominant_topics.iter().take(3).map(|t| t.label()).collect();
        parts.push(format!("Основные темы обсуждения: {}.", names.join(", ")));
    }

    parts.push(PROGRESS_NOTICE.to_string());
    parts.join(" ")
}
