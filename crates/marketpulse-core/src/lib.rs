//! # Marketpulse Core
//!
//! Domain types, provider adapters, and analytics for the marketpulse stock
//! analysis toolkit.
//!
//! ## Overview
//!
//! Two independent pipelines share only a symbol as their key:
//!
//! - **Price pipeline**: a [`PriceSource`](provider::PriceSource) fetches
//!   OHLCV history, then [`analytics::indicators`] derives RSI, MACD,
//!   Bollinger Bands, volume ratio, momentum, and rolling ranges.
//! - **Sentiment pipeline**: a [`NewsSource`](provider::NewsSource) fetches
//!   recent articles, then [`analytics::sentiment`] assigns each a priority
//!   and aggregates a weighted sentiment.
//!
//! A downstream combinator ([`analytics::score`]) blends sentiment,
//! technical, volume, and correlation sub-scores into one market score.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo chart, MarketAux news) |
//! | [`analytics`] | Indicators, sentiment scoring, volume, correlation, market score |
//! | [`cache`] | TTL cache for fetched results |
//! | [`domain`] | Domain models (PriceSeries, NewsArticle, Symbol, Period) |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`provider`] | Provider traits and structured source errors |
//! | [`service`] | Cached pipeline services with neutral degradation |
//!
//! ## Error Handling
//!
//! Provider fetches return [`SourceError`](provider::SourceError) values
//! whose kind callers branch on; the pipeline services translate those into
//! neutral results plus a user-facing warning, so no upstream failure is
//! fatal to the process:
//!
//! ```rust
//! use marketpulse_core::provider::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::MissingCredentials => "configure an API token",
//!         SourceErrorKind::AuthFailed => "the token was rejected",
//!         SourceErrorKind::NoData => "nothing to analyze",
//!         _ => "try again later",
//!     }
//! }
//! ```

pub mod adapters;
pub mod analytics;
pub mod cache;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod service;

// Re-export commonly used types at crate root for convenience

pub use adapters::{MarketauxAdapter, YahooAdapter, NEWS_API_TOKEN_ENV};

pub use analytics::{
    analyze_volume, combine_scores, compute_indicators, market_correlations, BetaStats,
    IndicatorRow, IndicatorTable, MarketCorrelations, MarketScore, VolumeProfile,
};

pub use cache::{CacheMode, TtlCache, DEFAULT_CACHE_TTL};

pub use domain::{NewsArticle, Period, PricePoint, PriceSeries, SentimentSummary, Symbol, UtcDateTime};

pub use error::{CoreError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use provider::{
    HistoryRequest, NewsRequest, NewsSource, PriceSource, SourceError, SourceErrorKind,
};

pub use service::{HistoryReport, NewsService, PriceService, SentimentReport};
