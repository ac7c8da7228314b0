use std::str::FromStr;

use serde::Serialize;

use marketpulse_core::provider::HistoryRequest;
use marketpulse_core::{analyze_volume, Period, Symbol, VolumeProfile};

use crate::cli::VolumeArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct VolumeResponseData {
    symbol: Symbol,
    period: Period,
    sessions: usize,
    profile: VolumeProfile,
}

pub async fn run(args: &VolumeArgs, ctx: &Context) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period = Period::from_str(&args.period)?;

    let mut service = ctx.price_service();
    let report = service
        .history(HistoryRequest::new(symbol.clone(), period), ctx.cache_mode)
        .await;

    let mut result = match report.series {
        Some(series) => {
            let profile = analyze_volume(&series);
            let data = serde_json::to_value(VolumeResponseData {
                symbol,
                period,
                sessions: series.len(),
                profile,
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
