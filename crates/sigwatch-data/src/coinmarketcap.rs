//! CoinMarketCap historical quotes provider.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client};
use rust_decimal::Decimal;
use serde::Deserialize;
use sigwatch_core::error::DataError;
use sigwatch_core::traits::PriceHistoryProvider;
use sigwatch_core::types::{PricePoint, PriceSeries, Timeframe};
use std::collections::HashMap;
use tracing::debug;

const HISTORICAL_QUOTES_PATH: &str = "/v1/cryptocurrency/quotes/historical";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// CoinMarketCap API configuration.
#[derive(Debug, Clone)]
pub struct CoinMarketCapConfig {
    pub api_key: String,
    pub base_url: String,
    /// Quote currency, e.g. `USD`
    pub convert: String,
    /// Per-request timeout
    pub timeout: std::time::Duration,
}

impl CoinMarketCapConfig {
    /// Create config with the public API endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://pro-api.coinmarketcap.com".to_string(),
            convert: "USD".to_string(),
            timeout: std::time::Duration::from_secs(10),
        }
    }

    /// Load the API key from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, DataError> {
        let api_key = std::env::var(var).map_err(|_| DataError::Provider {
            http_status: None,
            message: format!("{} not set", var),
        })?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_convert(mut self, convert: impl Into<String>) -> Self {
        self.convert = convert.into();
        self
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// CoinMarketCap API response types
#[derive(Debug, Deserialize)]
struct CmcResponse {
    data: Option<CmcData>,
    status: Option<CmcStatus>,
}

#[derive(Debug, Deserialize)]
struct CmcData {
    #[serde(default)]
    quotes: Vec<CmcQuote>,
}

#[derive(Debug, Deserialize)]
struct CmcQuote {
    timestamp: String,
    quote: HashMap<String, CmcQuoteValue>,
}

#[derive(Debug, Deserialize)]
struct CmcQuoteValue {
    price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CmcStatus {
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Historical price provider backed by the CoinMarketCap REST API.
pub struct CoinMarketCapProvider {
    config: CoinMarketCapConfig,
    client: Client,
}

impl CoinMarketCapProvider {
    /// Create a new provider client.
    pub fn new(config: CoinMarketCapConfig) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "X-CMC_PRO_API_KEY",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| DataError::transport(format!("invalid API key header: {}", e)))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn quotes_to_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        response: CmcResponse,
    ) -> Result<PriceSeries, DataError> {
        let quotes = match response.data {
            Some(data) => data.quotes,
            None => return Ok(PriceSeries::empty(symbol, timeframe)),
        };

        let mut points = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let timestamp = DateTime::parse_from_rfc3339(&quote.timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| DataError::Parse(format!("timestamp {}: {}", quote.timestamp, e)))?;

            let price = quote
                .quote
                .get(&self.config.convert)
                .and_then(|q| q.price)
                .ok_or_else(|| {
                    DataError::InvalidData(format!(
                        "missing {} price at {}",
                        self.config.convert, quote.timestamp
                    ))
                })?;
            let price = Decimal::try_from(price)
                .map_err(|e| DataError::InvalidData(format!("price {}: {}", price, e)))?;

            points.push(PricePoint::new(timestamp, price));
        }

        Ok(PriceSeries::new(symbol, timeframe, points))
    }
}

#[async_trait]
impl PriceHistoryProvider for CoinMarketCapProvider {
    async fn fetch(
        &self,
        symbol: &str,
        interval_minutes: u32,
        lookback_minutes: u32,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, DataError> {
        let timeframe = Timeframe::from_minutes(interval_minutes);
        let start = end - Duration::minutes(i64::from(lookback_minutes));
        let url = format!("{}{}", self.config.base_url, HISTORICAL_QUOTES_PATH);

        let params = [
            ("symbol", symbol.to_string()),
            ("time_start", start.format(TIME_FORMAT).to_string()),
            ("time_end", end.format(TIME_FORMAT).to_string()),
            ("interval", timeframe.to_string()),
            ("convert", self.config.convert.clone()),
        ];

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DataError::transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| DataError::transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<CmcResponse>(&text)
                .ok()
                .and_then(|r| r.status)
                .and_then(|s| s.error_message)
                .unwrap_or_else(|| "No error message provided".to_string());
            return Err(DataError::Provider {
                http_status: Some(status.as_u16()),
                message,
            });
        }

        let response: CmcResponse =
            serde_json::from_str(&text).map_err(|e| DataError::Parse(e.to_string()))?;

        if let Some(CmcStatus {
            error_code: Some(code),
            error_message,
        }) = &response.status
        {
            if *code != 0 {
                return Err(DataError::Provider {
                    http_status: Some(status.as_u16()),
                    message: error_message
                        .clone()
                        .unwrap_or_else(|| format!("error code {}", code)),
                });
            }
        }

        let series = self.quotes_to_series(symbol, timeframe, response)?;
        debug!(
            symbol,
            timeframe = %timeframe,
            points = series.len(),
            "fetched historical quotes"
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "coinmarketcap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    const BODY: &str = r#"{
        "data": {
            "id": 1,
            "symbol": "BTC",
            "quotes": [
                {"timestamp": "2024-01-15T12:05:00.000Z", "quote": {"USD": {"price": 42010.5, "volume_24h": 1.0}}},
                {"timestamp": "2024-01-15T12:00:00.000Z", "quote": {"USD": {"price": 42000.25, "volume_24h": 1.0}}}
            ]
        },
        "status": {"error_code": 0, "error_message": null}
    }"#;

    fn provider(base_url: &str) -> CoinMarketCapProvider {
        CoinMarketCapProvider::new(CoinMarketCapConfig::new("test-key").with_base_url(base_url))
            .unwrap()
    }

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 10, 0).unwrap()
    }

    #[test]
    fn test_quotes_to_series_orders_points() {
        let provider = provider("http://localhost");
        let response: CmcResponse = serde_json::from_str(BODY).unwrap();
        let series = provider
            .quotes_to_series("BTC", Timeframe::from_minutes(5), response)
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].price, dec!(42000.25));
        assert_eq!(series.last().unwrap().price, dec!(42010.5));
    }

    #[test]
    fn test_null_price_is_invalid() {
        let provider = provider("http://localhost");
        let response: CmcResponse = serde_json::from_str(
            r#"{"data": {"quotes": [{"timestamp": "2024-01-15T12:00:00Z", "quote": {"USD": {"price": null}}}]}}"#,
        )
        .unwrap();

        assert!(matches!(
            provider.quotes_to_series("BTC", Timeframe::from_minutes(5), response),
            Err(DataError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_sends_window_and_parses() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", HISTORICAL_QUOTES_PATH)
            .match_header("X-CMC_PRO_API_KEY", "test-key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("symbol".into(), "BTC".into()),
                Matcher::UrlEncoded("interval".into(), "5m".into()),
                Matcher::UrlEncoded("time_start".into(), "2024-01-15T11:50:00Z".into()),
                Matcher::UrlEncoded("time_end".into(), "2024-01-15T12:10:00Z".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let series = provider(&server.url())
            .fetch("BTC", 5, 20, end())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", HISTORICAL_QUOTES_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status": {"error_code": 1002, "error_message": "API key missing."}}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .fetch("BTC", 5, 20, end())
            .await
            .unwrap_err();

        match err {
            DataError::Provider {
                http_status,
                message,
            } => {
                assert_eq!(http_status, Some(401));
                assert_eq!(message, "API key missing.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_without_data_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", HISTORICAL_QUOTES_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": {"quotes": []}, "status": {"error_code": 0}}"#)
            .create_async()
            .await;

        let series = provider(&server.url())
            .fetch("BTC", 15, 240, end())
            .await
            .unwrap();
        assert!(series.is_empty());
        assert_eq!(series.timeframe, Timeframe::from_minutes(15));
    }
}
