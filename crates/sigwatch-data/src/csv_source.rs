//! CSV price history for offline runs.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use sigwatch_core::error::DataError;
use sigwatch_core::traits::PriceHistoryProvider;
use sigwatch_core::types::{PricePoint, PriceSeries, Timeframe};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "Timestamp", alias = "time")]
    timestamp: String,
    #[serde(alias = "Price", alias = "close", alias = "Close")]
    price: Option<String>,
}

/// Price history read from `<dir>/<SYMBOL>_<timeframe>.csv` files.
///
/// Each file holds `timestamp,price` rows for one symbol and interval. A
/// missing file reads as an empty series.
pub struct CsvPriceHistory {
    dir: PathBuf,
}

impl CsvPriceHistory {
    /// Create a new CSV price source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding prices for a symbol and timeframe.
    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", symbol, timeframe))
    }

    /// Load every point in a file.
    fn load_from_path(&self, path: &Path) -> Result<Vec<PricePoint>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let mut points = Vec::new();

        for (row, result) in reader.deserialize().enumerate() {
            let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;
            let timestamp = parse_timestamp(&record.timestamp)?;

            let price = record
                .price
                .filter(|p| !p.is_empty())
                .ok_or_else(|| DataError::InvalidData(format!("row {}: missing price", row + 1)))?;
            let price = Decimal::from_str(&price)
                .or_else(|_| Decimal::from_scientific(&price))
                .map_err(|e| DataError::InvalidData(format!("row {}: price {}: {}", row + 1, price, e)))?;

            points.push(PricePoint::new(timestamp, price));
        }

        Ok(points)
    }
}

/// Parse various timestamp formats.
fn parse_timestamp(date_str: &str) -> Result<DateTime<Utc>, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc());
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt.and_utc());
    }

    // Unix timestamp, milliseconds if more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let parsed = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    Err(DataError::Parse(format!("Could not parse date: {}", date_str)))
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceHistory {
    async fn fetch(
        &self,
        symbol: &str,
        interval_minutes: u32,
        lookback_minutes: u32,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, DataError> {
        let timeframe = Timeframe::from_minutes(interval_minutes);
        let path = self.path_for(symbol, timeframe);
        if !path.exists() {
            debug!(path = %path.display(), "no price file");
            return Ok(PriceSeries::empty(symbol, timeframe));
        }

        let start = end - Duration::minutes(i64::from(lookback_minutes));
        let points: Vec<PricePoint> = self
            .load_from_path(&path)?
            .into_iter()
            .filter(|p| p.timestamp >= start && p.timestamp <= end)
            .collect();

        Ok(PriceSeries::new(symbol, timeframe, points))
    }

    fn name(&self) -> &str {
        "csv"
    }
}
