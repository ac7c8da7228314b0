//! Blended market score.

use serde::{Deserialize, Serialize};

use crate::analytics::correlation::BetaStats;

pub const SENTIMENT_WEIGHT: f64 = 0.3;
pub const TECHNICAL_WEIGHT: f64 = 0.3;
pub const VOLUME_WEIGHT: f64 = 0.2;
pub const CORRELATION_WEIGHT: f64 = 0.2;

const LOW_BETA: f64 = 0.8;
const HIGH_BETA: f64 = 1.2;

/// Weighted blend of the four pipeline sub-scores.
///
/// The blend is a plain linear sum; nothing clamps it into [0, 1], and the
/// advisory labels assume that range only informally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketScore {
    pub value: f64,
    pub sentiment_score: f64,
    pub technical_score: f64,
    pub volume_score: f64,
    pub correlation_score: f64,
}

impl MarketScore {
    /// Advisory label for the informal downstream thresholds.
    pub fn label(&self) -> &'static str {
        if self.value > 0.7 {
            "strong buy"
        } else if self.value > 0.55 {
            "buy"
        } else if self.value >= 0.45 {
            "hold"
        } else if self.value >= 0.3 {
            "sell"
        } else {
            "strong sell"
        }
    }
}

/// Combine the sub-scores with fixed weights.
///
/// The correlation sub-score starts neutral at 0.5 and shifts by 0.2 for a
/// low (< 0.8) or high (> 1.2) beta; absent correlation data it stays
/// neutral.
pub fn combine(
    sentiment_score: f64,
    technical_score: f64,
    volume_score: f64,
    correlation_data: Option<&BetaStats>,
) -> MarketScore {
    let mut correlation_score = 0.5;
    if let Some(stats) = correlation_data {
        if stats.beta < LOW_BETA {
            correlation_score += 0.2;
        } else if stats.beta > HIGH_BETA {
            correlation_score -= 0.2;
        }
    }

    let value = sentiment_score * SENTIMENT_WEIGHT
        + technical_score * TECHNICAL_WEIGHT
        + volume_score * VOLUME_WEIGHT
        + correlation_score * CORRELATION_WEIGHT;

    MarketScore {
        value,
        sentiment_score,
        technical_score,
        volume_score,
        correlation_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_correlation_without_beta() {
        let score = combine(0.0, 0.5, 0.5, None);
        assert_eq!(score.correlation_score, 0.5);
        assert!((score.value - (0.5 * 0.3 + 0.5 * 0.2 + 0.5 * 0.2)).abs() < 1e-12);
    }

    #[test]
    fn low_beta_raises_the_correlation_score() {
        let stats = BetaStats {
            beta: 0.5,
            r_squared: 0.9,
        };
        let score = combine(0.0, 0.0, 0.0, Some(&stats));
        assert!((score.correlation_score - 0.7).abs() < 1e-12);
    }

    #[test]
    fn high_beta_lowers_the_correlation_score() {
        let stats = BetaStats {
            beta: 1.5,
            r_squared: 0.9,
        };
        let score = combine(0.0, 0.0, 0.0, Some(&stats));
        assert!((score.correlation_score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn mid_beta_keeps_the_neutral_base() {
        let stats = BetaStats {
            beta: 1.0,
            r_squared: 0.9,
        };
        let score = combine(0.0, 0.0, 0.0, Some(&stats));
        assert_eq!(score.correlation_score, 0.5);
    }

    #[test]
    fn weights_sum_as_specified() {
        let score = combine(1.0, 1.0, 1.0, None);
        // 0.3 + 0.3 + 0.2 + 0.5*0.2
        assert!((score.value - 0.9).abs() < 1e-12);
        assert_eq!(score.label(), "strong buy");
    }

    #[test]
    fn labels_track_the_informal_thresholds() {
        let mut score = combine(0.0, 0.0, 0.0, None);
        score.value = 0.71;
        assert_eq!(score.label(), "strong buy");
        score.value = 0.6;
        assert_eq!(score.label(), "buy");
        score.value = 0.5;
        assert_eq!(score.label(), "hold");
        score.value = 0.35;
        assert_eq!(score.label(), "sell");
        score.value = 0.1;
        assert_eq!(score.label(), "strong sell");
    }
}
