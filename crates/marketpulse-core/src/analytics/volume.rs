//! Trading volume pattern analysis.

use serde::{Deserialize, Serialize};

use crate::PriceSeries;

const TREND_WINDOW: usize = 5;
const SPIKE_SIGMA: f64 = 2.0;

/// Aggregate volume statistics for one series.
///
/// Ratios whose denominator is zero, and correlations over degenerate input,
/// are `None` rather than NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// mean(last 5 volumes) / mean(all volumes).
    pub volume_trend: Option<f64>,
    /// Sessions whose volume exceeds mean + 2 sigma.
    pub volume_spikes: usize,
    /// Pearson correlation of close and volume.
    pub price_volume_correlation: Option<f64>,
    /// Coefficient of variation: stddev(volume) / mean(volume).
    pub volume_consistency: Option<f64>,
    /// Up-day volume share of all directional volume.
    pub buying_pressure: Option<f64>,
}

/// Analyze volume patterns over a series with at least one row.
pub fn analyze(series: &PriceSeries) -> VolumeProfile {
    let volumes = series.volumes();
    let closes = series.closes();

    let overall_mean = mean(&volumes);
    let recent_start = volumes.len().saturating_sub(TREND_WINDOW);
    let recent_mean = mean(&volumes[recent_start..]);
    let volume_trend = match overall_mean {
        Some(overall) if overall > 0.0 => recent_mean.map(|recent| recent / overall),
        _ => None,
    };

    let std = sample_std(&volumes);
    let volume_spikes = match (overall_mean, std) {
        (Some(m), Some(s)) => volumes.iter().filter(|v| **v > m + SPIKE_SIGMA * s).count(),
        _ => 0,
    };

    let volume_consistency = match (overall_mean, std) {
        (Some(m), Some(s)) if m > 0.0 => Some(s / m),
        _ => None,
    };

    let price_volume_correlation = pearson(&closes, &volumes);

    let mut up_volume = 0.0;
    let mut down_volume = 0.0;
    for point in series.points() {
        if point.close > point.open {
            up_volume += point.volume as f64;
        } else if point.close < point.open {
            down_volume += point.volume as f64;
        }
    }
    let directional = up_volume + down_volume;
    let buying_pressure = if directional > 0.0 {
        Some(up_volume / directional)
    } else {
        None
    };

    VolumeProfile {
        volume_trend,
        volume_spikes,
        price_volume_correlation,
        volume_consistency,
        buying_pressure,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n-1 denominator); `None` below two samples.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values
        .iter()
        .map(|v| {
            let d = v - m;
            d * d
        })
        .sum::<f64>()
        / (values.len() as f64 - 1.0);
    Some(var.sqrt())
}

/// Pearson correlation; `None` for fewer than two samples or zero variance.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Period, PricePoint, Symbol, UtcDateTime};

    fn series(rows: &[(f64, f64, u64)]) -> PriceSeries {
        let points = rows
            .iter()
            .enumerate()
            .map(|(i, (open, close, volume))| {
                let ts = UtcDateTime::parse("2024-01-01T00:00:00Z")
                    .expect("timestamp")
                    .into_inner()
                    + time::Duration::days(i as i64);
                let high = open.max(*close) + 1.0;
                let low = (open.min(*close) - 1.0).max(0.0);
                PricePoint::new(
                    UtcDateTime::from_offset_datetime(ts).expect("utc"),
                    *open,
                    high,
                    low,
                    *close,
                    *volume,
                )
                .expect("valid point")
            })
            .collect();
        PriceSeries::new(Symbol::parse("1120").expect("symbol"), Period::OneMonth, points)
            .expect("ordered series")
    }

    #[test]
    fn constant_volume_has_unit_trend_and_zero_spikes() {
        let rows: Vec<(f64, f64, u64)> = (0..20)
            .map(|i| (10.0 + i as f64, 10.5 + i as f64, 5_000))
            .collect();
        let profile = analyze(&series(&rows));

        assert_eq!(profile.volume_trend, Some(1.0));
        assert_eq!(profile.volume_spikes, 0);
        assert_eq!(profile.volume_consistency, Some(0.0));
        // Constant volume has zero variance, so the correlation is undefined.
        assert!(profile.price_volume_correlation.is_none());
    }

    #[test]
    fn all_up_days_yield_full_buying_pressure() {
        let rows: Vec<(f64, f64, u64)> = (0..10)
            .map(|i| (10.0, 11.0, 1_000 + i as u64))
            .collect();
        let profile = analyze(&series(&rows));
        assert_eq!(profile.buying_pressure, Some(1.0));
    }

    #[test]
    fn flat_sessions_leave_buying_pressure_undefined() {
        let rows: Vec<(f64, f64, u64)> = (0..5).map(|_| (10.0, 10.0, 1_000)).collect();
        let profile = analyze(&series(&rows));
        assert!(profile.buying_pressure.is_none());
    }

    #[test]
    fn spike_detection_counts_outliers() {
        let mut rows: Vec<(f64, f64, u64)> = (0..30).map(|_| (10.0, 10.5, 1_000)).collect();
        rows.push((10.0, 10.5, 60_000));
        let profile = analyze(&series(&rows));
        assert_eq!(profile.volume_spikes, 1);
    }

    #[test]
    fn correlated_series_report_positive_correlation() {
        let rows: Vec<(f64, f64, u64)> = (0..15)
            .map(|i| (10.0 + i as f64, 10.5 + i as f64, 1_000 + 100 * i as u64))
            .collect();
        let profile = analyze(&series(&rows));
        let corr = profile.price_volume_correlation.expect("defined");
        assert!((corr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_row_series_degrades_gracefully() {
        let profile = analyze(&series(&[(10.0, 11.0, 500)]));
        assert_eq!(profile.volume_trend, Some(1.0));
        assert_eq!(profile.volume_spikes, 0);
        assert!(profile.price_volume_correlation.is_none());
        assert!(profile.volume_consistency.is_none());
        assert_eq!(profile.buying_pressure, Some(1.0));
    }
}
