use std::str::FromStr;

use serde::Serialize;

use marketpulse_core::analytics::indicators::RSI_PERIOD;
use marketpulse_core::cache::CacheMode;
use marketpulse_core::provider::{HistoryRequest, NewsRequest};
use marketpulse_core::{
    analyze_volume, combine_scores, compute_indicators, market_correlations, BetaStats,
    MarketCorrelations, MarketScore, Period, PriceSeries, PriceService, Symbol,
};

use crate::cli::ScoreArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct ScoreResponseData {
    symbol: Symbol,
    period: Period,
    score: MarketScore,
    label: &'static str,
    weighted_sentiment: f64,
    latest_rsi: Option<f64>,
    correlations: Option<MarketCorrelations>,
}

pub async fn run(args: &ScoreArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period = Period::from_str(&args.period)?;

    let mut warnings = Vec::new();

    // Sentiment sub-score: weighted sentiment rescaled from [-1, 1] to [0, 1].
    let news_request = NewsRequest::new(symbol.clone())
        .with_limit(args.limit)
        .map_err(|e| CliError::Command(e.message().to_owned()))?;
    let mut news_service = ctx.news_service();
    let sentiment_report = news_service.news_sentiment(news_request, ctx.cache_mode).await;
    if let Some(warning) = &sentiment_report.warning {
        warnings.push(warning.clone());
    }
    let weighted_sentiment = sentiment_report.summary.weighted_sentiment;
    let sentiment_score = (weighted_sentiment + 1.0) / 2.0;

    let mut price_service = ctx.price_service();
    let history_report = price_service
        .history(HistoryRequest::new(symbol.clone(), period), ctx.cache_mode)
        .await;
    if let Some(warning) = &history_report.warning {
        warnings.push(warning.clone());
    }

    // Technical and volume sub-scores stay neutral without price data.
    let mut technical_score = 0.5;
    let mut volume_score = 0.5;
    let mut latest_rsi = None;
    if let Some(series) = &history_report.series {
        let indicators = compute_indicators(series);
        latest_rsi = indicators.latest_rsi();
        technical_score = match latest_rsi {
            Some(rsi) => rsi / 100.0,
            // Enough sessions but no RSI means a zero-loss window.
            None if series.len() > RSI_PERIOD => 1.0,
            None => 0.5,
        };
        if let Some(pressure) = analyze_volume(series).buying_pressure {
            volume_score = pressure;
        }
    }

    // Beta against the peer set, when peers were given and everything aligns.
    let mut correlations = None;
    if !args.peers.is_empty() {
        if let Some(primary) = &history_report.series {
            // Peers share the primary's service, so a repeated symbol is a
            // cache hit rather than a second fetch.
            let peer_series = fetch_peers(
                &args.peers,
                period,
                &mut price_service,
                ctx.cache_mode,
                &mut warnings,
            )
            .await?;
            let mut all_series = vec![primary.clone()];
            all_series.extend(peer_series);
            if all_series.len() > 1 {
                match market_correlations(&all_series) {
                    Ok(stats) => correlations = Some(stats),
                    Err(error) => {
                        warnings.push(format!("correlation analysis skipped: {error}"));
                    }
                }
            }
        } else {
            warnings.push(String::from(
                "correlation analysis skipped: no price data for the primary symbol",
            ));
        }
    }

    let beta: Option<&BetaStats> = correlations
        .as_ref()
        .and_then(|c| c.betas.get(symbol.as_str()));
    let score = combine_scores(sentiment_score, technical_score, volume_score, beta);

    let data = serde_json::to_value(ScoreResponseData {
        symbol,
        period,
        label: score.label(),
        score,
        weighted_sentiment,
        latest_rsi,
        correlations,
    })?;

    let mut result = CommandResult::ok(data)
        .with_cache_hit(sentiment_report.cache_hit && history_report.cache_hit);
    for warning in warnings {
        result = result.with_warning(warning);
    }

    Ok(result)
}

async fn fetch_peers(
    peers: &[String],
    period: Period,
    service: &mut PriceService,
    mode: CacheMode,
    warnings: &mut Vec<String>,
) -> Result<Vec<PriceSeries>, CliError> {
    let mut series = Vec::with_capacity(peers.len());

    for raw in peers {
        let peer = Symbol::parse(raw)?;
        let report = service
            .history(HistoryRequest::new(peer.clone(), period), mode)
            .await;
        match report.series {
            Some(peer_series) => series.push(peer_series),
            None => warnings.push(format!("peer {peer} skipped: no price data")),
        }
    }

    Ok(series)
}
