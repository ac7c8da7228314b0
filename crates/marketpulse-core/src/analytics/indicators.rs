//! Technical indicators over a price series.
//!
//! Every computation is a pure function of the input series. Rolling windows
//! are trailing, and any value that needs more history than the series holds
//! is `None` ("not computable"), never an error.

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, UtcDateTime};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_WIDTH: f64 = 2.0;
pub const VOLUME_WINDOW: usize = 20;
pub const MOMENTUM_PERIOD: usize = 5;
pub const RANGE_WINDOW: usize = 20;

/// Derived indicator values for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub ts: UtcDateTime,
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub volume_ma: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub price_momentum: Option<f64>,
    pub rolling_high: Option<f64>,
    pub rolling_low: Option<f64>,
}

/// A price series with its derived indicator columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTable {
    pub series: PriceSeries,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    /// Most recent RSI value, if the window has filled.
    pub fn latest_rsi(&self) -> Option<f64> {
        self.rows.iter().rev().find_map(|row| row.rsi)
    }
}

/// Compute the full indicator set for a series.
pub fn compute(series: &PriceSeries) -> IndicatorTable {
    let closes = series.closes();
    let volumes = series.volumes();
    let highs: Vec<f64> = series.points().iter().map(|p| p.high).collect();
    let lows: Vec<f64> = series.points().iter().map(|p| p.low).collect();

    let rsi = relative_strength_index(&closes, RSI_PERIOD);
    let (macd, signal) = macd_lines(&closes);
    let (bb_upper, bb_lower) = bollinger_bands(&closes, BOLLINGER_WINDOW, BOLLINGER_WIDTH);
    let volume_ma = rolling_mean(&volumes, VOLUME_WINDOW);
    let momentum = percent_change(&closes, MOMENTUM_PERIOD);
    let rolling_high = rolling_max(&highs, RANGE_WINDOW);
    let rolling_low = rolling_min(&lows, RANGE_WINDOW);

    let rows = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let ratio = volume_ma[i].and_then(|ma| {
                if ma > 0.0 {
                    Some(volumes[i] / ma)
                } else {
                    None
                }
            });

            IndicatorRow {
                ts: point.ts,
                close: point.close,
                rsi: rsi[i],
                macd: Some(macd[i]),
                signal: Some(signal[i]),
                bb_upper: bb_upper[i],
                bb_lower: bb_lower[i],
                volume_ma: volume_ma[i],
                volume_ratio: ratio,
                price_momentum: momentum[i],
                rolling_high: rolling_high[i],
                rolling_low: rolling_low[i],
            }
        })
        .collect();

    IndicatorTable {
        series: series.clone(),
        rows,
    }
}

/// RSI over simple rolling means of gains and losses.
///
/// Undefined before the window fills and wherever the average loss is zero
/// (the division-by-zero "strongly bullish" case the caller must handle).
pub fn relative_strength_index(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    // The first delta exists at index 1, so the window fills at `period`.
    for i in period..closes.len() {
        let start = i + 1 - period;
        let avg_gain: f64 = gains[start..=i].iter().sum::<f64>() / period as f64;
        let avg_loss: f64 = losses[start..=i].iter().sum::<f64>() / period as f64;

        if avg_loss > 0.0 {
            let rs = avg_gain / avg_loss;
            out[i] = Some(100.0 - 100.0 / (1.0 + rs));
        }
    }

    out
}

/// MACD line and its signal line.
pub fn macd_lines(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let fast = ema(closes, MACD_FAST_SPAN);
    let slow = ema(closes, MACD_SLOW_SPAN);
    let macd: Vec<f64> = fast
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd, MACD_SIGNAL_SPAN);
    (macd, signal)
}

/// Exponential moving average with alpha = 2/(span+1), seeded from the first
/// value with no bias adjustment.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut current = values[0];
    out.push(current);
    for value in &values[1..] {
        current = alpha * value + (1.0 - alpha) * current;
        out.push(current);
    }

    out
}

/// Bollinger envelope: rolling mean +/- `width` rolling standard deviations.
pub fn bollinger_bands(
    closes: &[f64],
    window: usize,
    width: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mean = rolling_mean(closes, window);
    let std = rolling_std(closes, window);

    let upper = mean
        .iter()
        .zip(std.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m + width * s),
            _ => None,
        })
        .collect();
    let lower = mean
        .iter()
        .zip(std.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - width * s),
            _ => None,
        })
        .collect();

    (upper, lower)
}

/// `period`-session percent change.
pub fn percent_change(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for i in period..values.len() {
        let base = values[i - period];
        if base != 0.0 {
            out[i] = Some((values[i] - base) / base);
        }
    }
    out
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let start = i + 1 - window;
        let sum: f64 = values[start..=i].iter().sum();
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Rolling sample standard deviation (n-1 denominator).
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window < 2 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let start = i + 1 - window;
        let slice = &values[start..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / (window as f64 - 1.0);
        out[i] = Some(var.sqrt());
    }
    out
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, f64::max)
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, f64::min)
}

fn rolling_fold(values: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let start = i + 1 - window;
        out[i] = values[start..=i].iter().copied().reduce(pick);
    }
    out
}
