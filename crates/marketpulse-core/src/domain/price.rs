use serde::{Deserialize, Serialize};

use crate::{Period, Symbol, UtcDateTime, ValidationError};

/// One OHLCV row for a single trading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidPriceRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidPriceBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

/// Ordered OHLCV history for one symbol over a requested period.
///
/// Points are ascending by date with no duplicate sessions; the constructor
/// rejects anything else. The series is not mutated after construction --
/// indicators are derived into a separate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub period: Period,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(
        symbol: Symbol,
        period: Period,
        points: Vec<PricePoint>,
    ) -> Result<Self, ValidationError> {
        for pair in points.windows(2) {
            if pair[1].ts <= pair[0].ts {
                return Err(ValidationError::UnorderedSeries);
            }
        }

        Ok(Self {
            symbol,
            period,
            points,
        })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.volume as f64).collect()
    }
}
