//! Cross-symbol correlation and market beta.
//!
//! The "market" here is the equal-weighted mean of daily returns across the
//! analyzed symbols, so betas are relative to the requested watchlist rather
//! than an external index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analytics::volume::pearson;
use crate::{PriceSeries, Symbol, ValidationError};

/// Regression of one symbol's returns against the watchlist mean return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaStats {
    pub beta: f64,
    pub r_squared: f64,
}

/// Correlation matrix of closes plus per-symbol beta statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCorrelations {
    pub symbols: Vec<Symbol>,
    /// Pearson correlations of closing prices, indexed like `symbols`.
    /// `None` where a series has zero variance.
    pub matrix: Vec<Vec<Option<f64>>>,
    /// Betas are omitted for symbols whose regression is degenerate.
    pub betas: BTreeMap<String, BetaStats>,
}

/// Analyze correlations across a set of date-aligned series.
///
/// All series must cover the same number of sessions; mismatched input is a
/// validation error rather than a silent truncation.
pub fn market_correlations(
    series: &[PriceSeries],
) -> Result<MarketCorrelations, ValidationError> {
    let Some(first) = series.first() else {
        return Ok(MarketCorrelations {
            symbols: Vec::new(),
            matrix: Vec::new(),
            betas: BTreeMap::new(),
        });
    };

    if series.iter().any(|s| s.len() != first.len()) {
        return Err(ValidationError::MisalignedSeries);
    }

    let symbols: Vec<Symbol> = series.iter().map(|s| s.symbol.clone()).collect();
    let closes: Vec<Vec<f64>> = series.iter().map(PriceSeries::closes).collect();

    let matrix = closes
        .iter()
        .map(|a| closes.iter().map(|b| pearson(a, b)).collect())
        .collect();

    let returns: Vec<Vec<f64>> = closes.iter().map(|c| daily_returns(c)).collect();
    let market: Vec<f64> = if returns.iter().all(|r| !r.is_empty()) {
        (0..returns[0].len())
            .map(|i| returns.iter().map(|r| r[i]).sum::<f64>() / returns.len() as f64)
            .collect()
    } else {
        Vec::new()
    };

    let mut betas = BTreeMap::new();
    for (symbol, symbol_returns) in symbols.iter().zip(returns.iter()) {
        if let Some(stats) = regress(&market, symbol_returns) {
            betas.insert(symbol.to_string(), stats);
        }
    }

    Ok(MarketCorrelations {
        symbols,
        matrix,
        betas,
    })
}

/// Session-over-session percent changes; one element shorter than the input.
fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| {
            if pair[0] != 0.0 {
                (pair[1] - pair[0]) / pair[0]
            } else {
                0.0
            }
        })
        .collect()
}

/// Least squares slope of y on x plus the squared correlation coefficient.
fn regress(xs: &[f64], ys: &[f64]) -> Option<BetaStats> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        cov += (x - mx) * (y - my);
        var_x += (x - mx) * (x - mx);
    }

    if var_x == 0.0 {
        return None;
    }

    let beta = cov / var_x;
    let r_squared = pearson(xs, ys).map(|r| r * r).unwrap_or(0.0);

    Some(BetaStats { beta, r_squared })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Period, PricePoint, UtcDateTime};

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                let ts = UtcDateTime::parse("2024-01-01T00:00:00Z")
                    .expect("timestamp")
                    .into_inner()
                    + time::Duration::days(i as i64);
                PricePoint::new(
                    UtcDateTime::from_offset_datetime(ts).expect("utc"),
                    *close,
                    close + 1.0,
                    (close - 1.0).max(0.0),
                    *close,
                    1_000,
                )
                .expect("valid point")
            })
            .collect();
        PriceSeries::new(Symbol::parse(symbol).expect("symbol"), Period::OneMonth, points)
            .expect("ordered series")
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = market_correlations(&[]).expect("ok");
        assert!(result.symbols.is_empty());
        assert!(result.betas.is_empty());
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let a = series("2222", &[10.0, 11.0, 12.0]);
        let b = series("1120", &[10.0, 11.0]);
        let err = market_correlations(&[a, b]).expect_err("must fail");
        assert!(matches!(err, ValidationError::MisalignedSeries));
    }

    #[test]
    fn identical_series_have_unit_beta_and_correlation() {
        let closes: Vec<f64> = (0..20).map(|i| 50.0 + ((i * 3) % 7) as f64).collect();
        let a = series("2222", &closes);
        let b = series("1120", &closes);
        let result = market_correlations(&[a, b]).expect("ok");

        let corr = result.matrix[0][1].expect("defined");
        assert!((corr - 1.0).abs() < 1e-9);

        let stats = result.betas.get("2222").expect("present");
        assert!((stats.beta - 1.0).abs() < 1e-9);
        assert!((stats.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_contributes_no_beta() {
        let flat = series("2222", &[10.0; 15]);
        let moving: Vec<f64> = (0..15).map(|i| 20.0 + ((i * 5) % 11) as f64).collect();
        let other = series("1120", &moving);
        let result = market_correlations(&[flat, other]).expect("ok");

        // Flat closes: zero-variance column in the matrix.
        assert!(result.matrix[0][0].is_none());
        // Its returns are all zero, so its beta against the market is 0.
        let stats = result.betas.get("2222").expect("present");
        assert!(stats.beta.abs() < 1e-9);
    }
}
