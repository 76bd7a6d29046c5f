//! Per-tick console report.

use sigwatch_core::error::WatchResult;
use sigwatch_core::types::TimeframeSnapshot;
use sigwatch_engine::TickReport;
use sigwatch_signals::GateOutcome;
use std::fmt::Write;
use tracing::info;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

fn fmt_snapshot(snap: &TimeframeSnapshot) -> String {
    let trend = if snap.is_falling() {
        "falling"
    } else if snap.is_rising() {
        "rising"
    } else {
        "flat"
    };
    format!(
        "  {:>4}  RSI {:>6}  StochRSI {:>5}  price {} ({} vs {})  bars {}",
        snap.timeframe.to_string(),
        fmt_opt(snap.latest_rsi, 2),
        fmt_opt(snap.latest_stoch_rsi, 3),
        snap.latest_price,
        trend,
        snap.reference_price,
        snap.bars,
    )
}

fn fmt_outcome(outcome: &GateOutcome) -> String {
    match outcome {
        GateOutcome::Unchanged => "unchanged".to_string(),
        GateOutcome::Transitioned { from, to, notified } => format!(
            "{} -> {} ({})",
            from,
            to,
            if *notified { "notified" } else { "notification failed" }
        ),
        GateOutcome::Reverted { from } => format!("{} -> none (not notified)", from),
    }
}

/// Render a tick result for the console.
pub fn format_tick(result: &WatchResult<TickReport>) -> String {
    match result {
        Ok(report) => {
            let mut out = format!(
                "[{}] {}  previous: {}  evaluated: {}  outcome: {}\n",
                report.at.format("%Y-%m-%d %H:%M:%S"),
                report.symbol,
                report.previous,
                report.evaluated,
                fmt_outcome(&report.outcome),
            );
            for snap in &report.snapshots {
                let _ = writeln!(out, "{}", fmt_snapshot(snap));
            }
            out
        }
        Err(e) => format!("tick failed: {}\n", e),
    }
}

/// Print a tick result to stdout and log its summary.
pub fn report_tick(result: &WatchResult<TickReport>) {
    if let Ok(report) = result {
        info!(
            symbol = %report.symbol,
            previous = %report.previous,
            evaluated = %report.evaluated,
            changed = report.outcome.is_change(),
            "tick complete"
        );
    }
    print!("{}", format_tick(result));
}
