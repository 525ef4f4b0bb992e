//! Sentiment trend over a conversation window.

use serde::{Deserialize, Serialize};

use crate::history::mean;

/// Default recent-window size.
pub const DEFAULT_WINDOW: usize = 5;

/// Slope magnitude beyond which the trend is no longer stable.
const TREND_THRESHOLD: f64 = 0.1;

/// Fraction of the slope extrapolated into the prediction.
const PREDICTION_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub slope: f64,
    /// Population standard deviation of the whole sequence.
    pub volatility: f64,
    /// One half-step extrapolation, clamped to [-1, 1].
    pub prediction: f64,
    pub recent_avg: f64,
    pub older_avg: f64,
}

impl TrendAnalysis {
    /// Flat trend anchored at `value`.
    pub fn stable(value: f64) -> Self {
        Self {
            trend: Trend::Stable,
            slope: 0.0,
            volatility: 0.0,
            prediction: value,
            recent_avg: value,
            older_avg: value,
        }
    }
}

impl Default for TrendAnalysis {
    fn default() -> Self {
        Self::stable(0.0)
    }
}

/// Compare the recent window against the one before it.
///
/// With at least `window_size` scores, "recent" is the last `window_size`
/// and "older" the up-to-`window_size` scores before that. Shorter inputs
/// split at the midpoint. Fewer than two scores is always stable.
pub fn analyze_sentiment_trend(scores: &[f64], window_size: usize) -> TrendAnalysis {
    if scores.len() < 2 {
        return TrendAnalysis::stable(scores.first().copied().unwrap_or(0.0));
    }

    let window_size = window_size.max(1);
    let (older, recent) = if scores.len() >= window_size {
        let split = scores.len() - window_size;
        let older_start = split.saturating_sub(window_size);
        (&scores[older_start..split], &scores[split..])
    } else {
        let mid = scores.len() / 2;
        (&scores[..mid], &scores[mid..])
    };

    let recent_avg = mean(recent).unwrap_or(0.0);
    let older_avg = mean(older).unwrap_or(recent_avg);
    let slope = recent_avg - older_avg;

    let trend = if slope > TREND_THRESHOLD {
        Trend::Improving
    } else if slope < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    };

    TrendAnalysis {
        trend,
        slope,
        volatility: population_std(scores),
        prediction: (recent_avg + slope * PREDICTION_STEP).clamp(-1.0, 1.0),
        recent_avg,
        older_avg,
    }
}

fn population_std(values: &[f64]) -> f64 {
    let Some(avg) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
