use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::provider::{HistoryRequest, PriceSource, SourceError};
use crate::{PricePoint, PriceSeries, Symbol, UtcDateTime};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo-chart-shaped market data adapter with real and mock modes.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    /// Exchange suffix appended to bare symbols (e.g. `.SA` for Tadawul).
    market_suffix: Option<String>,
    use_real_api: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            market_suffix: None,
            use_real_api: false,
        }
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            market_suffix: None,
            use_real_api,
        }
    }

    pub fn with_market_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.market_suffix = Some(suffix.into());
        self
    }

    /// Upstream ticker for a request, with the exchange suffix applied to
    /// symbols that do not already carry one.
    fn upstream_ticker(&self, symbol: &Symbol) -> String {
        match &self.market_suffix {
            Some(suffix) if !symbol.as_str().contains('.') => {
                format!("{}{suffix}", symbol.as_str())
            }
            _ => symbol.as_str().to_owned(),
        }
    }

    async fn fetch_real_history(&self, req: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        let url = format!(
            "{CHART_BASE_URL}/{}?range={}&interval=1d",
            urlencoding::encode(&self.upstream_ticker(&req.symbol)),
            req.period
        );

        let response = self
            .http_client
            .execute(HttpRequest::get(&url))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("market data transport error: {}", e.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "market data provider returned status {}",
                response.status
            )));
        }

        let parsed: ChartResponse = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::internal(format!("failed to parse chart response: {e}"))
        })?;

        let Some(result) = parsed.chart.result.into_iter().flatten().next() else {
            return Err(SourceError::no_data(format!(
                "no price history for {}",
                req.symbol
            )));
        };

        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Err(SourceError::no_data(format!(
                "no quote block for {}",
                req.symbol
            )));
        };

        let mut points = Vec::with_capacity(result.timestamp.len());
        for (i, ts) in result.timestamp.iter().enumerate() {
            // Sessions with any missing field are dropped, not defaulted.
            let (Some(open), Some(high), Some(low), Some(close)) = (
                field(&quote.open, i),
                field(&quote.high, i),
                field(&quote.low, i),
                field(&quote.close, i),
            ) else {
                continue;
            };
            let volume = field(&quote.volume, i).unwrap_or(0.0).max(0.0) as u64;

            let ts = UtcDateTime::from_unix_timestamp(*ts)
                .map_err(|e| SourceError::internal(format!("invalid session timestamp: {e}")))?;
            let point = PricePoint::new(ts, open, high, low, close, volume)
                .map_err(|e| SourceError::internal(format!("invalid session row: {e}")))?;
            points.push(point);
        }

        if points.is_empty() {
            return Err(SourceError::no_data(format!(
                "price history for {} contained no usable sessions",
                req.symbol
            )));
        }

        PriceSeries::new(req.symbol.clone(), req.period, points)
            .map_err(|e| SourceError::internal(format!("provider returned unordered rows: {e}")))
    }

    async fn fetch_mock_history(&self, req: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        // Keep the transport in the loop so tests can count requests.
        self.http_client
            .execute(HttpRequest::get(format!(
                "{CHART_BASE_URL}/{}",
                self.upstream_ticker(&req.symbol)
            )))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("market data transport error: {}", e.message()))
            })?;

        let seed = symbol_seed(&req.symbol);
        let sessions = req.period.session_count();
        let today = UtcDateTime::now();

        let mut points = Vec::with_capacity(sessions);
        for index in 0..sessions {
            let ts = today.minus_days((sessions - index) as i64);
            let base = 40.0 + ((seed + index as u64 * 7) % 300) as f64 / 10.0;
            let close = base + 0.4;
            let point = PricePoint::new(
                ts,
                base,
                base + 1.2,
                (base - 0.9).max(0.0),
                close,
                25_000 + (seed + index as u64 * 13) % 9_000,
            )
            .map_err(|e| SourceError::internal(e.to_string()))?;
            points.push(point);
        }

        PriceSeries::new(req.symbol.clone(), req.period, points)
            .map_err(|e| SourceError::internal(e.to_string()))
    }
}

impl PriceSource for YahooAdapter {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::debug!(symbol = %req.symbol, period = %req.period, "fetching price history");
            if self.use_real_api {
                self.fetch_real_history(&req).await
            } else {
                self.fetch_mock_history(&req).await
            }
        })
    }
}

fn field(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(11_u64, |acc, byte| {
        acc.wrapping_mul(31).wrapping_add(byte as u64)
    })
}

// Yahoo chart API response structures.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Vec<Option<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct QuoteBlock {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::Period;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct CannedHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedHttpClient {
        fn returning(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704067200, 1704153600, 1704240000],
                "indicators": {
                    "quote": [{
                        "open":   [10.0, 10.5, null],
                        "high":   [11.0, 11.5, 12.0],
                        "low":    [9.5, 10.0, 10.5],
                        "close":  [10.5, 11.0, 11.5],
                        "volume": [5000, 6000, 7000]
                    }]
                }
            }]
        }
    }"#;

    fn request() -> HistoryRequest {
        HistoryRequest::new(Symbol::parse("2222").expect("symbol"), Period::OneMonth)
    }

    #[tokio::test]
    async fn parses_chart_rows_and_drops_incomplete_sessions() {
        let client = Arc::new(CannedHttpClient::returning(Ok(HttpResponse::ok_json(
            CHART_BODY,
        ))));
        let adapter = YahooAdapter::with_http_client(client.clone());

        let series = adapter.history(request()).await.expect("should parse");
        // Third session has a null open and is dropped.
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].close, 10.5);
        assert_eq!(series.points()[1].volume, 6000);
        assert_eq!(client.recorded_urls().len(), 1);
    }

    #[tokio::test]
    async fn applies_market_suffix_to_bare_symbols() {
        let client = Arc::new(CannedHttpClient::returning(Ok(HttpResponse::ok_json(
            CHART_BODY,
        ))));
        let adapter = YahooAdapter::with_http_client(client.clone()).with_market_suffix(".SA");

        adapter.history(request()).await.expect("should parse");
        let urls = client.recorded_urls();
        assert!(urls[0].contains("2222.SA"), "suffix missing: {}", urls[0]);
    }

    #[tokio::test]
    async fn suffix_is_not_doubled_for_qualified_symbols() {
        let adapter = YahooAdapter::default().with_market_suffix(".SA");
        let ticker = adapter.upstream_ticker(&Symbol::parse("1120.SA").expect("symbol"));
        assert_eq!(ticker, "1120.SA");
    }

    #[tokio::test]
    async fn upstream_error_maps_to_unavailable() {
        let client = Arc::new(CannedHttpClient::returning(Ok(HttpResponse {
            status: 502,
            body: String::new(),
        })));
        let adapter = YahooAdapter::with_http_client(client);

        let err = adapter.history(request()).await.expect_err("must fail");
        assert_eq!(err.kind(), crate::provider::SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn empty_result_maps_to_no_data() {
        let client = Arc::new(CannedHttpClient::returning(Ok(HttpResponse::ok_json(
            r#"{"chart": {"result": []}}"#,
        ))));
        let adapter = YahooAdapter::with_http_client(client);

        let err = adapter.history(request()).await.expect_err("must fail");
        assert_eq!(err.kind(), crate::provider::SourceErrorKind::NoData);
    }

    #[tokio::test]
    async fn mock_mode_generates_a_full_period() {
        let adapter = YahooAdapter::default();
        let series = adapter.history(request()).await.expect("mock data");
        assert_eq!(series.len(), Period::OneMonth.session_count());
    }
}
