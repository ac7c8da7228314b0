//! News prioritization and weighted sentiment aggregation.

use crate::{NewsArticle, SentimentSummary, UtcDateTime};

/// Sources that earn the trusted-publisher bonus.
pub const TRUSTED_SOURCES: [&str; 4] = ["Reuters", "Bloomberg", "CNBC", "Financial Times"];

/// Title keywords that signal relevance to the symbol's market story.
pub const RELEVANT_KEYWORDS: [&str; 10] = [
    "earnings",
    "profit",
    "revenue",
    "growth",
    "dividend",
    "merger",
    "acquisition",
    "stock",
    "shares",
    "market",
];

const RECENCY_HORIZON_DAYS: f64 = 30.0;
const KEYWORD_SATURATION: f64 = 3.0;

/// Priority score for a single article, the sum of four bounded components:
/// recency in [0,1], sentiment magnitude in [0,1], trusted-source bonus in
/// {0,1}, and keyword match in [0,1]. Total in [0,4].
pub fn priority_score(article: &NewsArticle, now: UtcDateTime) -> f64 {
    let mut score = 0.0;

    // Recency: a missing or malformed timestamp contributes nothing.
    if let Some(published_at) = article.published_at {
        let days_old = published_at.days_until(now) as f64;
        score += (RECENCY_HORIZON_DAYS - days_old).max(0.0) / RECENCY_HORIZON_DAYS;
    }

    score += article.sentiment.abs().min(1.0);

    if TRUSTED_SOURCES.contains(&article.source.as_str()) {
        score += 1.0;
    }

    let title = article.title.to_lowercase();
    let matches = RELEVANT_KEYWORDS
        .iter()
        .filter(|keyword| title.contains(**keyword))
        .count() as f64;
    score += (matches / KEYWORD_SATURATION).min(1.0);

    score
}

/// Assign priorities, order articles by priority descending (stable, so ties
/// keep fetch order), and aggregate the priority-weighted sentiment.
///
/// An empty list, or one whose priorities sum to zero, aggregates to 0.
pub fn score_articles(mut articles: Vec<NewsArticle>, now: UtcDateTime) -> SentimentSummary {
    for article in &mut articles {
        article.priority_score = priority_score(article, now);
    }

    articles.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_priority: f64 = articles.iter().map(|a| a.priority_score).sum();
    let weighted_sentiment = if total_priority > 0.0 {
        articles
            .iter()
            .map(|a| a.sentiment * a.priority_score)
            .sum::<f64>()
            / total_priority
    } else {
        0.0
    };

    SentimentSummary {
        weighted_sentiment,
        articles,
    }
}
