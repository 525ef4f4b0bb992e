use serde::{Deserialize, Serialize};

use crate::pattern::RiskPatternAnalysis;
use crate::trend::{Trend, TrendAnalysis};

/// Response urgency. Ordered `Low < Medium < High < Crisis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Crisis,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Crisis => "crisis",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversations shorter than this (in user turns) get at least medium priority.
const EARLY_CONVERSATION: usize = 3;

/// First matching rule wins:
/// attention → crisis; risk ≥ 7 → high; declining with sentiment < -0.3 → high;
/// fewer than 3 turns → medium; otherwise low.
pub fn generate_response_priority(
    current_sentiment: f64,
    trend: &TrendAnalysis,
    risk: &RiskPatternAnalysis,
    conversation_length: usize,
) -> Priority {
    if risk.requires_attention {
        return Priority::Crisis;
    }
    if risk.risk_level >= 7.0 {
        return Priority::High;
    }
    if trend.trend == Trend::Declining && current_sentiment < -0.3 {
        return Priority::High;
    }
    if conversation_length < EARLY_CONVERSATION {
        return Priority::Medium;
    }
    Priority::Low
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Severity;

    fn risk(level: f64, attention: bool) -> RiskPatternAnalysis {
        RiskPatternAnalysis {
            risk_level: level,
            requires_attention: attention,
            severity: Severity::Low,
            ..RiskPatternAnalysis::none()
        }
    }

    fn trend(t: Trend) -> TrendAnalysis {
        TrendAnalysis {
            trend: t,
            ..TrendAnalysis::default()
        }
    }

    #[test]
    fn test_attention_always_crisis() {
        let p = generate_response_priority(0.9, &trend(Trend::Improving), &risk(0.0, true), 50);
        assert_eq!(p, Priority::Crisis);
    }

    #[test]
    fn test_high_risk_level() {
        let p = generate_response_priority(0.5, &trend(Trend::Stable), &risk(7.0, false), 10);
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn test_declining_and_negative() {
        let r = risk(0.0, false);
        assert_eq!(
            generate_response_priority(-0.4, &trend(Trend::Declining), &r, 10),
            Priority::High
        );
        assert_eq!(
            generate_response_priority(-0.3, &trend(Trend::Declining), &r, 10),
            Priority::Low
        );
    }

    #[test]
    fn test_early_conversation_medium() {
        let r = risk(0.0, false);
        assert_eq!(
            generate_response_priority(0.0, &trend(Trend::Stable), &r, 2),
            Priority::Medium
        );
        assert_eq!(
            generate_response_priority(0.0, &trend(Trend::Stable), &r, 3),
            Priority::Low
        );
    }

    #[test]
    fn test_total_order() {
        assert!(Priority::Crisis > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}
