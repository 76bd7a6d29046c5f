//! Price point and price series types.

use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::IndicatorError;

/// A single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Quoted price
    pub price: Decimal,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(timestamp: DateTime<Utc>, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}

/// Time-ordered price observations for one symbol and one sampling interval.
///
/// Construction sorts by timestamp and drops repeated timestamps, keeping the
/// last observation for each instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Sampling interval of the points
    pub timeframe: Timeframe,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series from points in any order.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, mut points: Vec<PricePoint>) -> Self {
        // Stable sort keeps provider order among equal timestamps, so the
        // dedup below retains the most recent observation.
        points.sort_by_key(|p| p.timestamp);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            symbol: symbol.into(),
            timeframe,
            points: deduped,
        }
    }

    /// Create an empty series.
    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            points: Vec::new(),
        }
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get all points, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Get the most recent point.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Get a point by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Get an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    /// Extract timestamps as a vector.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Extract prices as `f64` for indicator math.
    ///
    /// Fails with [`IndicatorError::InvalidData`] if a price cannot be
    /// represented as a finite float.
    pub fn prices_f64(&self) -> Result<Vec<f64>, IndicatorError> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                p.price.to_f64().filter(|v| v.is_finite()).ok_or_else(|| {
                    IndicatorError::InvalidData(format!(
                        "price {} at index {} is not representable",
                        p.price, i
                    ))
                })
            })
            .collect()
    }

    /// Find the point whose timestamp is closest to `target`.
    ///
    /// Ties resolve to the earlier point. Returns `None` for an empty series.
    pub fn closest_to(&self, target: DateTime<Utc>) -> Option<&PricePoint> {
        closest_in(&self.points, target)
    }

    /// Like [`PriceSeries::closest_to`], but never picks the most recent point.
    ///
    /// Returns `None` when the series has fewer than two points.
    pub fn closest_before_last(&self, target: DateTime<Utc>) -> Option<&PricePoint> {
        let earlier = self.points.split_last().map_or(&[][..], |(_, rest)| rest);
        closest_in(earlier, target)
    }
}

fn closest_in(points: &[PricePoint], target: DateTime<Utc>) -> Option<&PricePoint> {
    points
        .iter()
        .min_by_key(|p| (p.timestamp - target).num_milliseconds().unsigned_abs())
}
