//! Performance metrics — pure functions over the recorded equity curve.
//!
//! Every metric is a pure function: equity curve in, scalar (or sequence)
//! out. No dependencies on the runner or the engine loop. Statistical
//! degeneracies are surfaced as `None`, never coerced to zero: a Sharpe
//! ratio over a zero-variance return stream is undefined, not flattering.

use barlab_core::engine::EquityPoint;
use serde::{Deserialize, Serialize};

/// Trading days per year, used to annualize daily statistics.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Aggregate equity-curve metrics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// (final - initial) / initial.
    pub total_return: f64,
    /// Annualized Sharpe ratio; `None` when the return stream has no
    /// variance or fewer than two returns.
    pub sharpe: Option<f64>,
    /// Maximum peak-to-trough decline as a fraction in [0, 1].
    pub max_drawdown: f64,
    /// Longest stretch of bars spent below a prior equity peak.
    pub max_drawdown_duration: usize,
}

impl PerformanceSummary {
    pub fn compute(equity_curve: &[EquityPoint], risk_free_rate: f64) -> Self {
        Self {
            total_return: total_return(equity_curve),
            sharpe: sharpe_ratio(equity_curve, risk_free_rate),
            max_drawdown: max_drawdown(equity_curve),
            max_drawdown_duration: longest_drawdown_duration(equity_curve),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity_curve: &[EquityPoint]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) if first.equity > 0.0 => {
            (last.equity - first.equity) / first.equity
        }
        _ => 0.0,
    }
}

/// Cumulative return at every bar: equity[t] / equity[0] - 1.
pub fn cumulative_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    let Some(first) = equity_curve.first() else {
        return Vec::new();
    };
    if first.equity <= 0.0 {
        return vec![0.0; equity_curve.len()];
    }
    equity_curve
        .iter()
        .map(|p| p.equity / first.equity - 1.0)
        .collect()
}

/// Bar-over-bar simple returns.
pub fn periodic_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                (w[1].equity - w[0].equity) / w[0].equity
            } else {
                0.0
            }
        })
        .collect()
}

/// Annualized Sharpe ratio from periodic returns.
///
/// Sharpe = mean(return - rf_period) / std(return - rf_period) * sqrt(252),
/// with the annual risk-free rate spread evenly over the year. `None` when
/// there are fewer than two returns or the variance is zero — the ratio is
/// undefined there, not zero.
pub fn sharpe_ratio(equity_curve: &[EquityPoint], risk_free_rate: f64) -> Option<f64> {
    let returns = periodic_returns(equity_curve);
    if returns.len() < 2 {
        return None;
    }
    let rf_period = risk_free_rate / PERIODS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - rf_period).collect();
    let mean = mean_f64(&excess);
    let std = std_dev(&excess);
    if std < 1e-15 {
        return None;
    }
    Some(mean / std * PERIODS_PER_YEAR.sqrt())
}

/// Maximum drawdown as a positive fraction in [0, 1].
///
/// 0.0 for a monotonically non-decreasing curve.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Longest run of consecutive bars spent strictly below a prior peak.
///
/// A bar that matches or sets a new peak ends the current stretch.
pub fn longest_drawdown_duration(equity_curve: &[EquityPoint]) -> usize {
    let mut peak = f64::MIN;
    let mut longest = 0usize;
    let mut current = 0usize;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }
    longest
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator). 0.0 for fewer than 2 values.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
