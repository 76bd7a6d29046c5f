//! Accepted signal changes and their notification text.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sigwatch_core::types::{SignalState, TimeframeSnapshot};
use std::fmt::Write;

/// A signal change accepted by the gate.
#[derive(Debug, Clone, Serialize)]
pub struct SignalTransition {
    pub symbol: String,
    pub from: SignalState,
    pub to: SignalState,
    pub at: DateTime<Utc>,
    /// Price at the latest bar of the finest timeframe
    pub latest_price: Option<Decimal>,
    pub snapshots: Vec<TimeframeSnapshot>,
}

impl SignalTransition {
    pub fn new(
        symbol: impl Into<String>,
        from: SignalState,
        to: SignalState,
        at: DateTime<Utc>,
        snapshots: &[TimeframeSnapshot],
    ) -> Self {
        let latest_price = snapshots
            .iter()
            .min_by_key(|s| s.timeframe)
            .map(|s| s.latest_price);

        Self {
            symbol: symbol.into(),
            from,
            to,
            at,
            latest_price,
            snapshots: snapshots.to_vec(),
        }
    }

    /// e.g. `BTC HOLD TO SELL Signal`
    pub fn subject(&self) -> String {
        format!("{} {} Signal", self.symbol, self.to.label().to_uppercase())
    }

    pub fn body(&self) -> String {
        let mut body = format!(
            "A {} signal has been detected for {}.\n\nPrevious signal: {}\n",
            self.to, self.symbol, self.from
        );
        if let Some(price) = self.latest_price {
            let _ = writeln!(body, "Current price: {}", price);
        }
        let _ = writeln!(body, "Time: {}", self.at.format("%Y-%m-%d %H:%M:%S UTC"));

        if !self.snapshots.is_empty() {
            body.push_str("\nTimeframes:\n");
            for snap in &self.snapshots {
                let _ = writeln!(
                    body,
                    "  {:>4}  RSI {}  StochRSI {}  price {} vs {} at {}",
                    snap.timeframe.to_string(),
                    fmt_value(snap.latest_rsi, 2),
                    fmt_value(snap.latest_stoch_rsi, 3),
                    snap.latest_price,
                    snap.reference_price,
                    snap.reference_at.format("%H:%M"),
                );
            }
        }
        body
    }
}

fn fmt_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use sigwatch_core::types::Timeframe;

    #[test]
    fn test_subject_and_body() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let snaps: Vec<TimeframeSnapshot> = [30, 5]
            .into_iter()
            .map(|m| TimeframeSnapshot {
                timeframe: Timeframe::from_minutes(m),
                latest_rsi: Some(61.234),
                latest_stoch_rsi: None,
                latest_price: Decimal::from(m),
                latest_at: at,
                reference_price: dec!(1),
                reference_at: at,
                bars: 20,
            })
            .collect();
        let transition = SignalTransition::new("BTC", SignalState::Buy, SignalState::HoldToSell, at, &snaps);

        assert_eq!(transition.subject(), "BTC HOLD TO SELL Signal");
        // Finest timeframe supplies the headline price
        assert_eq!(transition.latest_price, Some(dec!(5)));

        let body = transition.body();
        assert!(body.starts_with("A hold to sell signal has been detected for BTC."));
        assert!(body.contains("Previous signal: buy"));
        assert!(body.contains("RSI 61.23"));
        assert!(body.contains("StochRSI n/a"));
        assert!(body.contains("2024-03-01 09:30:00 UTC"));
    }
}
