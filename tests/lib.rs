// Shared fixtures for the behavior tests.

pub use marketpulse_core::{
    adapters::{MarketauxAdapter, YahooAdapter},
    cache::CacheMode,
    http_client::{HttpClient, HttpError, HttpRequest, HttpResponse},
    provider::{HistoryRequest, NewsRequest, NewsSource, PriceSource, SourceErrorKind},
    NewsArticle, NewsService, Period, PricePoint, PriceSeries, PriceService, Symbol, UtcDateTime,
};
pub use std::sync::Arc;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock-mode transport that records every request it receives and serves a
/// fixed response body.
#[derive(Debug)]
pub struct RecordingHttpClient {
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    response: Result<HttpResponse, HttpError>,
    real_mode: bool,
}

impl RecordingHttpClient {
    /// Mock-mode client; adapters using it serve deterministic data.
    pub fn mock() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            response: Ok(HttpResponse::ok_json("{}")),
            real_mode: false,
        }
    }

    /// Real-mode client serving a canned response body.
    pub fn canned(response: Result<HttpResponse, HttpError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            response,
            real_mode: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().expect("lock poisoned").clone()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().expect("lock poisoned").push(request.url.clone());
        let response = self.response.clone();
        Box::pin(async move { response })
    }

    fn is_mock(&self) -> bool {
        !self.real_mode
    }
}

/// Build a daily series from close prices; each session opens slightly below
/// its close (so every row is an up day) and volumes are supplied alongside.
pub fn series_from(symbol: &str, closes: &[f64], volumes: &[u64]) -> PriceSeries {
    assert_eq!(closes.len(), volumes.len(), "fixture rows must align");
    // 2024-01-01T00:00:00Z, advancing one day per row.
    let start = 1_704_067_200_i64;
    let points = closes
        .iter()
        .zip(volumes.iter())
        .enumerate()
        .map(|(day, (&close, &volume))| {
            let ts = UtcDateTime::from_unix_timestamp(start + day as i64 * 86_400)
                .expect("fixture date in range");
            let open = (close - 0.5).max(0.0);
            PricePoint::new(ts, open, close + 1.0, (close - 1.0).max(0.0), close, volume)
                .expect("fixture row valid")
        })
        .collect();
    PriceSeries::new(
        Symbol::parse(symbol).expect("fixture symbol"),
        Period::ThreeMonths,
        points,
    )
    .expect("fixture series valid")
}
