//! Behavior tests for the provider adapters: request shaping, error
//! classification, and normalization at the boundary.

use marketpulse_tests::{
    Arc, HistoryRequest, HttpError, HttpResponse, MarketauxAdapter, NewsRequest, NewsSource,
    Period, PriceSource, RecordingHttpClient, SourceErrorKind, Symbol, YahooAdapter,
};

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

// =============================================================================
// Market data: request shaping
// =============================================================================

#[tokio::test]
async fn when_a_market_suffix_is_configured_bare_symbols_get_it_appended() {
    // Given: An adapter configured for the Saudi exchange
    let client = Arc::new(RecordingHttpClient::mock());
    let adapter = YahooAdapter::with_http_client(client.clone()).with_market_suffix(".SA");

    // When: History is requested for a bare numeric ticker
    adapter
        .history(HistoryRequest::new(symbol("2222"), Period::OneMonth))
        .await
        .expect("mock history succeeds");

    // Then: The upstream request carries the suffixed ticker
    let urls = client.requested_urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("2222.SA"), "suffix missing from {}", urls[0]);
}

#[tokio::test]
async fn when_a_symbol_already_carries_an_exchange_the_suffix_is_not_doubled() {
    let client = Arc::new(RecordingHttpClient::mock());
    let adapter = YahooAdapter::with_http_client(client.clone()).with_market_suffix(".SA");

    adapter
        .history(HistoryRequest::new(symbol("2222.SA"), Period::OneMonth))
        .await
        .expect("mock history succeeds");

    let urls = client.requested_urls();
    assert!(!urls[0].contains(".SA.SA"), "suffix doubled in {}", urls[0]);
}

#[tokio::test]
async fn when_mock_history_is_served_it_covers_the_requested_period() {
    let adapter = YahooAdapter::with_http_client(Arc::new(RecordingHttpClient::mock()));

    let series = adapter
        .history(HistoryRequest::new(symbol("1180"), Period::SixMonths))
        .await
        .expect("mock history succeeds");

    assert_eq!(series.len(), Period::SixMonths.session_count());
    for point in series.points() {
        assert!(point.high >= point.low);
        assert!(point.open >= point.low && point.open <= point.high);
        assert!(point.close >= point.low && point.close <= point.high);
    }
}

// =============================================================================
// Market data: error classification
// =============================================================================

#[tokio::test]
async fn when_the_price_upstream_returns_a_server_error_the_source_is_unavailable() {
    let client = Arc::new(RecordingHttpClient::canned(Ok(HttpResponse {
        status: 502,
        body: String::from("bad gateway"),
    })));
    let adapter = YahooAdapter::with_http_client(client);

    let error = adapter
        .history(HistoryRequest::new(symbol("2222"), Period::OneMonth))
        .await
        .expect_err("server error must fail");

    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
}

#[tokio::test]
async fn when_the_chart_payload_has_no_result_the_error_is_no_data() {
    let client = Arc::new(RecordingHttpClient::canned(Ok(HttpResponse::ok_json(
        r#"{"chart":{"result":[]}}"#,
    ))));
    let adapter = YahooAdapter::with_http_client(client);

    let error = adapter
        .history(HistoryRequest::new(symbol("9999"), Period::OneMonth))
        .await
        .expect_err("empty result must fail");

    assert_eq!(error.kind(), SourceErrorKind::NoData);
}

// =============================================================================
// News: credentials and classification
// =============================================================================

#[tokio::test]
async fn when_no_api_token_is_configured_no_request_leaves_the_process() {
    // Given: A real-mode news adapter with an empty token
    let client = Arc::new(RecordingHttpClient::canned(Ok(HttpResponse::ok_json("{}"))));
    let adapter = MarketauxAdapter::with_http_client(client.clone(), "");

    // When: News is requested
    let error = adapter
        .news(NewsRequest::new(symbol("2222")))
        .await
        .expect_err("missing token must fail");

    // Then: The failure is a precondition, checked before any traffic
    assert_eq!(error.kind(), SourceErrorKind::MissingCredentials);
    assert_eq!(client.call_count(), 0, "no network traffic without a token");
}

#[tokio::test]
async fn when_the_news_upstream_rejects_the_token_the_error_is_distinct() {
    let client = Arc::new(RecordingHttpClient::canned(Ok(HttpResponse {
        status: 401,
        body: String::from("unauthorized"),
    })));
    let adapter = MarketauxAdapter::with_http_client(client, "bad-token");

    let error = adapter
        .news(NewsRequest::new(symbol("2222")))
        .await
        .expect_err("rejected token must fail");

    assert_eq!(error.kind(), SourceErrorKind::AuthFailed);
}

#[tokio::test]
async fn when_the_news_transport_drops_the_error_is_unavailable() {
    let client = Arc::new(RecordingHttpClient::canned(Err(HttpError::new(
        "connection reset",
    ))));
    let adapter = MarketauxAdapter::with_http_client(client, "token");

    let error = adapter
        .news(NewsRequest::new(symbol("2222")))
        .await
        .expect_err("transport failure must fail");

    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
}

#[tokio::test]
async fn when_a_zero_article_limit_is_requested_the_request_is_rejected() {
    let result = NewsRequest::new(symbol("2222")).with_limit(0);
    let error = result.expect_err("zero limit must fail");
    assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
}

#[tokio::test]
async fn when_news_is_requested_the_canonical_query_fields_are_sent() {
    let client = Arc::new(RecordingHttpClient::canned(Ok(HttpResponse::ok_json(
        r#"{"data":[]}"#,
    ))));
    let adapter = MarketauxAdapter::with_http_client(client.clone(), "token").with_country("sa");

    adapter
        .news(NewsRequest::new(symbol("2222")).with_limit(25).expect("valid limit"))
        .await
        .expect("empty feed is a valid response");

    let url = client.requested_urls().remove(0);
    for field in [
        "symbols=2222",
        "filter_entities=true",
        "language=en",
        "limit=25",
        "sort=published_at",
        "published_after=",
        "countries=sa",
        "api_token=",
    ] {
        assert!(url.contains(field), "{field} missing from {url}");
    }
}
