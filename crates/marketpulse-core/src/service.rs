//! Pipeline services: cached fetch plus analytics, degrading to neutral
//! results instead of propagating provider failures.
//!
//! Each service owns its cache explicitly; nothing here is a process-wide
//! singleton. A failed fetch produces an empty/neutral result and a
//! user-facing warning derived from the [`SourceErrorKind`]; nothing is
//! fatal, and nothing retries.

use std::sync::Arc;
use std::time::Duration;

use crate::analytics::sentiment;
use crate::cache::{CacheMode, TtlCache};
use crate::provider::{
    HistoryRequest, NewsRequest, NewsSource, PriceSource, SourceError, SourceErrorKind,
};
use crate::{PriceSeries, SentimentSummary, UtcDateTime};

/// Outcome of a price history fetch. `series` is `None` when the fetch
/// failed or produced no data; `warning` carries the user-facing message.
#[derive(Debug, Clone)]
pub struct HistoryReport {
    pub series: Option<PriceSeries>,
    pub cache_hit: bool,
    pub warning: Option<String>,
}

/// Outcome of a news sentiment fetch. The summary is empty/neutral on
/// failure.
#[derive(Debug, Clone)]
pub struct SentimentReport {
    pub summary: SentimentSummary,
    pub cache_hit: bool,
    pub warning: Option<String>,
}

/// Price pipeline: TTL-cached OHLCV history.
pub struct PriceService {
    source: Arc<dyn PriceSource>,
    cache: TtlCache<PriceSeries>,
}

impl PriceService {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            cache: TtlCache::with_default_ttl(),
        }
    }

    pub fn with_cache_ttl(source: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    pub async fn history(&mut self, req: HistoryRequest, mode: CacheMode) -> HistoryReport {
        let key = req.cache_key();
        if mode == CacheMode::Use {
            if let Some(series) = self.cache.get(&key) {
                return HistoryReport {
                    series: Some(series),
                    cache_hit: true,
                    warning: None,
                };
            }
        }

        match self.source.history(req).await {
            Ok(series) => {
                if mode != CacheMode::Bypass {
                    self.cache.put(key, series.clone());
                }
                HistoryReport {
                    series: Some(series),
                    cache_hit: false,
                    warning: None,
                }
            }
            Err(error) => {
                tracing::warn!(key, error = %error, "price fetch failed");
                HistoryReport {
                    series: None,
                    cache_hit: false,
                    warning: Some(price_warning(&error)),
                }
            }
        }
    }
}

/// Sentiment pipeline: TTL-cached, priority-scored news.
pub struct NewsService {
    source: Arc<dyn NewsSource>,
    cache: TtlCache<SentimentSummary>,
}

impl NewsService {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self {
            source,
            cache: TtlCache::with_default_ttl(),
        }
    }

    pub fn with_cache_ttl(source: Arc<dyn NewsSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    /// Fetch, score, and aggregate news for a symbol.
    ///
    /// The scored summary is what gets cached, so a cache hit skips both the
    /// network and the scoring pass.
    pub async fn news_sentiment(&mut self, req: NewsRequest, mode: CacheMode) -> SentimentReport {
        let key = req.symbol.to_string();
        if mode == CacheMode::Use {
            if let Some(summary) = self.cache.get(&key) {
                return SentimentReport {
                    summary,
                    cache_hit: true,
                    warning: None,
                };
            }
        }

        match self.source.news(req).await {
            Ok(articles) => {
                let summary = sentiment::score_articles(articles, UtcDateTime::now());
                if mode != CacheMode::Bypass {
                    self.cache.put(key, summary.clone());
                }
                SentimentReport {
                    summary,
                    cache_hit: false,
                    warning: None,
                }
            }
            Err(error) => {
                tracing::warn!(key, error = %error, "news fetch failed");
                SentimentReport {
                    summary: SentimentSummary::empty(),
                    cache_hit: false,
                    warning: Some(news_warning(&error)),
                }
            }
        }
    }
}

fn price_warning(error: &SourceError) -> String {
    match error.kind() {
        SourceErrorKind::NoData => format!("no price data available: {}", error.message()),
        _ => format!("error fetching price data: {}", error.message()),
    }
}

fn news_warning(error: &SourceError) -> String {
    match error.kind() {
        SourceErrorKind::MissingCredentials => {
            format!("news API token required: {}", error.message())
        }
        SourceErrorKind::AuthFailed => {
            format!("invalid news API token: {}", error.message())
        }
        _ => format!("error fetching news data: {}", error.message()),
    }
}
