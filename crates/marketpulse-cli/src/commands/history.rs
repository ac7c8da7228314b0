use std::str::FromStr;

use serde::Serialize;

use marketpulse_core::{compute_indicators, IndicatorTable, Period, Symbol};
use marketpulse_core::provider::HistoryRequest;

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    symbol: Symbol,
    period: Period,
    sessions: usize,
    latest_rsi: Option<f64>,
    indicators: IndicatorTable,
}

pub async fn run(args: &HistoryArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period = Period::from_str(&args.period)?;

    let mut service = ctx.price_service();
    let report = service
        .history(HistoryRequest::new(symbol.clone(), period), ctx.cache_mode)
        .await;

    let mut result = match report.series {
        Some(series) => {
            let indicators = compute_indicators(&series);
            let data = serde_json::to_value(HistoryResponseData {
                symbol,
                period,
                sessions: series.len(),
                latest_rsi: indicators.latest_rsi(),
                indicators,
            })?;
            CommandResult::ok(data)
        }
        None => CommandResult::ok(serde_json::Value::Null),
    };

    result = result.with_cache_hit(report.cache_hit);
    if let Some(warning) = report.warning {
        result = result.with_warning(warning);
    }

    Ok(result)
}
