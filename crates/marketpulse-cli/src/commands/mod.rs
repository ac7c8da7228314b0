mod history;
mod news;
mod score;
mod volume;

use std::sync::Arc;
use std::time::Duration;

use marketpulse_core::cache::CacheMode;
use marketpulse_core::http_client::{HttpClient, NoopHttpClient, ReqwestHttpClient};
use marketpulse_core::{MarketauxAdapter, NewsService, PriceService, YahooAdapter, NEWS_API_TOKEN_ENV};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub cache_hit: bool,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            cache_hit: false,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

/// Shared per-invocation setup: transport, cache policy, market suffix.
pub struct Context {
    http_client: Arc<dyn HttpClient>,
    pub cache_mode: CacheMode,
    cache_ttl: Duration,
    market_suffix: Option<String>,
    country: Option<String>,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        let http_client: Arc<dyn HttpClient> = if cli.offline {
            Arc::new(NoopHttpClient)
        } else {
            Arc::new(ReqwestHttpClient::new())
        };

        Self {
            http_client,
            cache_mode: if cli.refresh {
                CacheMode::Refresh
            } else {
                CacheMode::Use
            },
            cache_ttl: Duration::from_secs(cli.cache_ttl_secs),
            market_suffix: cli.market_suffix.clone(),
            country: cli.country.clone(),
        }
    }

    pub fn price_service(&self) -> PriceService {
        let mut adapter = YahooAdapter::with_http_client(self.http_client.clone());
        if let Some(suffix) = &self.market_suffix {
            adapter = adapter.with_market_suffix(suffix);
        }
        PriceService::with_cache_ttl(Arc::new(adapter), self.cache_ttl)
    }

    pub fn news_service(&self) -> NewsService {
        let api_token = std::env::var(NEWS_API_TOKEN_ENV).unwrap_or_default();
        let mut adapter = MarketauxAdapter::with_http_client(self.http_client.clone(), api_token);
        if let Some(country) = &self.country {
            adapter = adapter.with_country(country);
        }
        NewsService::with_cache_ttl(Arc::new(adapter), self.cache_ttl)
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let ctx = Context::from_cli(cli);

    match &cli.command {
        Command::History(args) => history::run(args, &ctx).await,
        Command::News(args) => news::run(args, &ctx).await,
        Command::Volume(args) => volume::run(args, &ctx).await,
        Command::Score(args) => score::run(args, &ctx).await,
    }
}
