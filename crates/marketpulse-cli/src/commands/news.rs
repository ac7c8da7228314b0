use serde::Serialize;

use marketpulse_core::provider::NewsRequest;
use marketpulse_core::{SentimentSummary, Symbol};

use crate::cli::NewsArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct NewsResponseData {
    symbol: Symbol,
    article_count: usize,
    sentiment: SentimentSummary,
}

pub async fn run(args: &NewsArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let request = NewsRequest::new(symbol.clone())
        .with_limit(args.limit)
        .map_err(|e| CliError::Command(e.message().to_owned()))?;

    let mut service = ctx.news_service();
    let report = service.news_sentiment(request, ctx.cache_mode).await;

    let data = serde_json::to_value(NewsResponseData {
        symbol,
        article_count: report.summary.articles.len(),
        sentiment: report.summary,
    })?;

    let mut result = CommandResult::ok(data).with_cache_hit(report.cache_hit);
    if let Some(warning) = report.warning {
        result = result.with_warning(warning);
    }

    Ok(result)
}
