//! Provider traits and request/outcome types.
//!
//! Two independent upstreams feed the pipelines:
//!
//! | Trait | Request | Response | Description |
//! |-------|---------|----------|-------------|
//! | [`PriceSource`] | [`HistoryRequest`] | [`PriceSeries`] | OHLCV history |
//! | [`NewsSource`] | [`NewsRequest`] | `Vec<NewsArticle>` | Symbol news |
//!
//! Adapters never panic on upstream trouble; every failure is a
//! [`SourceError`] whose [`kind`](SourceError::kind) callers branch on.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{NewsArticle, Period, PriceSeries, Symbol};

/// Outcome classification for provider fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// No API token configured; user-facing precondition, not a crash.
    MissingCredentials,
    /// Upstream rejected the configured token (HTTP 401).
    AuthFailed,
    /// Network or transient upstream failure.
    Unavailable,
    /// Upstream answered but carried no usable rows.
    NoData,
    InvalidRequest,
    /// Parse or contract failure inside the adapter.
    Internal,
}

/// Structured provider error carried up to the pipeline services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MissingCredentials,
            message: message.into(),
        }
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::AuthFailed,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::MissingCredentials => "source.missing_credentials",
            SourceErrorKind::AuthFailed => "source.auth_failed",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for OHLCV history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: Period,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, period: Period) -> Self {
        Self { symbol, period }
    }

    /// Cache key for this request: `SYMBOL:period`.
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.symbol, self.period)
    }
}

/// Request payload for symbol news.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub symbol: Symbol,
    pub limit: usize,
    /// How far back to ask the provider for articles.
    pub days_back: i64,
}

impl NewsRequest {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            limit: 50,
            days_back: 30,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Result<Self, SourceError> {
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "news request limit must be greater than zero",
            ));
        }
        self.limit = limit;
        Ok(self)
    }
}

/// Market-data provider contract.
pub trait PriceSource: Send + Sync {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}

/// News-sentiment provider contract.
///
/// Returned articles are normalized but unscored (`priority_score` is 0);
/// the sentiment scorer assigns priorities downstream.
pub trait NewsSource: Send + Sync {
    fn news<'a>(
        &'a self,
        req: NewsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<NewsArticle>, SourceError>> + Send + 'a>>;
}
