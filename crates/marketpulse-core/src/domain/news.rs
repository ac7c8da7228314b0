use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

/// One news article mentioning a symbol, normalized at the provider boundary.
///
/// Optional provider fields (description, timestamp, sentiment) are defaulted
/// during normalization so downstream code never branches on missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub source: String,
    /// `None` when the provider timestamp was missing or malformed.
    pub published_at: Option<UtcDateTime>,
    pub url: String,
    /// Provider-supplied sentiment, roughly in [-1, 1]; defaults to 0.
    pub sentiment: f64,
    /// Relevance weight assigned by the sentiment scorer, in [0, 4].
    pub priority_score: f64,
}

/// Aggregated news view for one symbol: weighted sentiment plus the articles
/// that produced it, ordered by priority descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub weighted_sentiment: f64,
    pub articles: Vec<NewsArticle>,
}

impl SentimentSummary {
    pub fn empty() -> Self {
        Self {
            weighted_sentiment: 0.0,
            articles: Vec::new(),
        }
    }
}
