//! Provider adapters.
//!
//! Each adapter supports two modes: a real mode that talks to the upstream
//! through the configured [`HttpClient`](crate::http_client::HttpClient), and
//! a deterministic mock mode (selected automatically when the transport is a
//! mock) for offline use and tests.

mod marketaux;
mod yahoo;

pub use marketaux::{MarketauxAdapter, NEWS_API_TOKEN_ENV};
pub use yahoo::YahooAdapter;
