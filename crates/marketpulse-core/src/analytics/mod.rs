//! Stateless transformations over fetched data: technical indicators,
//! news prioritization, volume patterns, cross-symbol correlation, and the
//! blended market score.

pub mod correlation;
pub mod indicators;
pub mod score;
pub mod sentiment;
pub mod volume;

pub use correlation::{market_correlations, BetaStats, MarketCorrelations};
pub use indicators::{compute as compute_indicators, IndicatorRow, IndicatorTable};
pub use score::{combine as combine_scores, MarketScore};
pub use sentiment::{priority_score, score_articles};
pub use volume::{analyze as analyze_volume, VolumeProfile};
