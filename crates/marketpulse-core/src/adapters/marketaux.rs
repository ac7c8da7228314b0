use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::macros::format_description;

use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::provider::{NewsRequest, NewsSource, SourceError};
use crate::{NewsArticle, Symbol, UtcDateTime};

const NEWS_BASE_URL: &str = "https://api.marketaux.com/v1/news/all";

/// Environment variable holding the news provider API token.
pub const NEWS_API_TOKEN_ENV: &str = "MARKETPULSE_MARKETAUX_API_TOKEN";

/// MarketAux-shaped news adapter with real and mock modes.
#[derive(Clone)]
pub struct MarketauxAdapter {
    http_client: Arc<dyn HttpClient>,
    api_token: String,
    /// ISO country filter for the news query (e.g. `sa` for Tadawul symbols).
    country: Option<String>,
    use_real_api: bool,
}

impl Default for MarketauxAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            api_token: std::env::var(NEWS_API_TOKEN_ENV).unwrap_or_default(),
            country: None,
            use_real_api: false,
        }
    }
}

impl MarketauxAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_token: impl Into<String>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            api_token: api_token.into(),
            country: None,
            use_real_api,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    async fn fetch_real_news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, SourceError> {
        if self.api_token.trim().is_empty() {
            return Err(SourceError::missing_credentials(format!(
                "no news API token configured; set {NEWS_API_TOKEN_ENV}"
            )));
        }

        let date_from = published_after(UtcDateTime::now(), req.days_back);
        let mut url = format!(
            "{NEWS_BASE_URL}?symbols={}&filter_entities=true&language=en&limit={}&sort=published_at&published_after={}",
            urlencoding::encode(req.symbol.as_str()),
            req.limit,
            date_from,
        );
        if let Some(country) = &self.country {
            url.push_str(&format!("&countries={}", urlencoding::encode(country)));
        }
        url.push_str(&format!(
            "&api_token={}",
            urlencoding::encode(&self.api_token)
        ));

        let response = self
            .http_client
            .execute(HttpRequest::get(&url))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("news transport error: {}", e.message()))
            })?;

        if response.status == 401 {
            return Err(SourceError::auth_failed(
                "news provider rejected the API token",
            ));
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "news provider returned status {}",
                response.status
            )));
        }

        let parsed: NewsResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::internal(format!("failed to parse news response: {e}")))?;

        Ok(parsed
            .data
            .into_iter()
            .map(|raw| normalize_article(raw, &req.symbol))
            .collect())
    }

    async fn fetch_mock_news(&self, req: &NewsRequest) -> Result<Vec<NewsArticle>, SourceError> {
        self.http_client
            .execute(HttpRequest::get(NEWS_BASE_URL))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("news transport error: {}", e.message()))
            })?;

        let seed = req.symbol.as_str().bytes().fold(7_u64, |acc, byte| {
            acc.wrapping_mul(31).wrapping_add(byte as u64)
        });
        let now = UtcDateTime::now();
        let count = req.limit.min(6);

        Ok((0..count)
            .map(|index| {
                let drift = ((seed + index as u64 * 17) % 19) as f64 / 10.0 - 0.9;
                NewsArticle {
                    title: format!("{} shares move on quarterly earnings", req.symbol),
                    description: Some(String::from("Deterministic offline article.")),
                    source: if index % 3 == 0 {
                        String::from("Reuters")
                    } else {
                        String::from("Market Wire")
                    },
                    published_at: Some(now.minus_days(index as i64 * 3)),
                    url: format!("https://news.example/{}/{index}", req.symbol),
                    sentiment: drift,
                    priority_score: 0.0,
                }
            })
            .collect())
    }
}

impl NewsSource for MarketauxAdapter {
    fn news<'a>(
        &'a self,
        req: NewsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<NewsArticle>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::debug!(symbol = %req.symbol, limit = req.limit, "fetching news");
            if self.use_real_api {
                self.fetch_real_news(&req).await
            } else {
                self.fetch_mock_news(&req).await
            }
        })
    }
}

fn published_after(now: UtcDateTime, days_back: i64) -> String {
    let format = format_description!("[year]-[month]-[day]");
    now.minus_days(days_back)
        .into_inner()
        .format(&format)
        .unwrap_or_default()
}

/// Collapse a raw provider record into a [`NewsArticle`].
///
/// Optional fields default instead of failing: a malformed timestamp becomes
/// `None`, and the sentiment falls back through the entity matching the
/// requested symbol, then the mean over all entities, then 0.
fn normalize_article(raw: RawArticle, symbol: &Symbol) -> NewsArticle {
    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|ts| UtcDateTime::parse_lenient(ts).ok());

    let sentiment = raw
        .entities
        .iter()
        .find(|entity| {
            entity
                .symbol
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(symbol.as_str()))
        })
        .and_then(|entity| entity.sentiment_score)
        .or_else(|| {
            let scores: Vec<f64> = raw
                .entities
                .iter()
                .filter_map(|entity| entity.sentiment_score)
                .collect();
            if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            }
        })
        .unwrap_or(0.0);

    NewsArticle {
        title: raw.title.unwrap_or_default(),
        description: raw.description,
        source: raw.source.unwrap_or_default(),
        published_at,
        url: raw.url.unwrap_or_default(),
        sentiment,
        priority_score: 0.0,
    }
}

// MarketAux API response structures.
#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Vec<RawArticle>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    source: Option<String>,
    published_at: Option<String>,
    url: Option<String>,
    entities: Vec<RawEntity>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawEntity {
    symbol: Option<String>,
    sentiment_score: Option<f64>,
}
