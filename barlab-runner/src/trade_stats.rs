//! Trade ledger statistics.
//!
//! Profit and percentage-return profiles computed separately over the full
//! ledger, the winning subset, and the losing subset. An empty subset has
//! no profile at all (`None`) — its statistics are undefined, not zero.

use crate::metrics::{mean_f64, std_dev};
use barlab_core::domain::TradeRecord;
use serde::{Deserialize, Serialize};

/// Mean/stdev/max/min of signed profit and of percentage return over one
/// subset of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeProfile {
    pub mean_pnl: f64,
    pub std_pnl: f64,
    pub max_pnl: f64,
    pub min_pnl: f64,
    pub mean_return: f64,
    pub std_return: f64,
    pub max_return: f64,
    pub min_return: f64,
}

impl TradeProfile {
    fn compute(trades: &[&TradeRecord]) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }
        let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
        let returns: Vec<f64> = trades.iter().map(|t| t.return_pct).collect();
        Some(Self {
            mean_pnl: mean_f64(&pnls),
            std_pnl: std_dev(&pnls),
            max_pnl: pnls.iter().copied().fold(f64::MIN, f64::max),
            min_pnl: pnls.iter().copied().fold(f64::MAX, f64::min),
            mean_return: mean_f64(&returns),
            std_return: std_dev(&returns),
            max_return: returns.iter().copied().fold(f64::MIN, f64::max),
            min_return: returns.iter().copied().fold(f64::MAX, f64::min),
        })
    }
}

/// Counts and per-subset profiles for a trade ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeStats {
    pub count: usize,
    pub winning_count: usize,
    pub losing_count: usize,
    /// Trades that closed exactly flat.
    pub even_count: usize,
    pub all: Option<TradeProfile>,
    pub winning: Option<TradeProfile>,
    pub losing: Option<TradeProfile>,
}

impl TradeStats {
    pub fn compute(trades: &[TradeRecord]) -> Self {
        let winners: Vec<&TradeRecord> = trades.iter().filter(|t| t.pnl > 0.0).collect();
        let losers: Vec<&TradeRecord> = trades.iter().filter(|t| t.pnl < 0.0).collect();
        let all: Vec<&TradeRecord> = trades.iter().collect();

        Self {
            count: trades.len(),
            winning_count: winners.len(),
            losing_count: losers.len(),
            even_count: trades.len() - winners.len() - losers.len(),
            all: TradeProfile::compute(&all),
            winning: TradeProfile::compute(&winners),
            losing: TradeProfile::compute(&losers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barlab_core::domain::PositionSide;
    use chrono::NaiveDate;

    fn make_trade(pnl: f64) -> TradeRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let entry_price = 100.0;
        let quantity = 50.0;
        TradeRecord {
            symbol: "SPY".into(),
            side: PositionSide::Long,
            entry_bar: 0,
            entry_date: date,
            entry_price,
            exit_bar: 5,
            exit_date: date,
            exit_price: entry_price + pnl / quantity,
            quantity,
            pnl,
            return_pct: pnl / (entry_price * quantity),
            bars_held: 5,
        }
    }

    #[test]
    fn empty_ledger_has_undefined_profiles() {
        let stats = TradeStats::compute(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.winning_count, 0);
        assert_eq!(stats.losing_count, 0);
        assert!(stats.all.is_none());
        assert!(stats.winning.is_none());
        assert!(stats.losing.is_none());
    }

    #[test]
    fn all_winners_leaves_losing_undefined() {
        let trades = vec![make_trade(500.0), make_trade(300.0)];
        let stats = TradeStats::compute(&trades);
        assert_eq!(stats.winning_count, 2);
        assert_eq!(stats.losing_count, 0);
        assert!(stats.winning.is_some());
        assert!(stats.losing.is_none());
    }

    #[test]
    fn mixed_ledger_profiles() {
        let trades = vec![make_trade(500.0), make_trade(-200.0), make_trade(300.0)];
        let stats = TradeStats::compute(&trades);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.winning_count, 2);
        assert_eq!(stats.losing_count, 1);

        let all = stats.all.unwrap();
        assert!((all.mean_pnl - 200.0).abs() < 1e-10);
        assert_eq!(all.max_pnl, 500.0);
        assert_eq!(all.min_pnl, -200.0);

        let winning = stats.winning.unwrap();
        assert!((winning.mean_pnl - 400.0).abs() < 1e-10);
        assert_eq!(winning.min_pnl, 300.0);

        let losing = stats.losing.unwrap();
        assert_eq!(losing.mean_pnl, -200.0);
        assert_eq!(losing.std_pnl, 0.0); // single trade, no spread
    }

    #[test]
    fn even_trades_counted_separately() {
        let trades = vec![make_trade(0.0), make_trade(100.0)];
        let stats = TradeStats::compute(&trades);
        assert_eq!(stats.even_count, 1);
        assert_eq!(stats.winning_count, 1);
        assert_eq!(stats.losing_count, 0);
    }

    #[test]
    fn returns_profile_scales_with_entry_cost() {
        let trades = vec![make_trade(1000.0)];
        let stats = TradeStats::compute(&trades);
        let all = stats.all.unwrap();
        // 1000 profit on a 5000 entry: +20%.
        assert!((all.mean_return - 0.2).abs() < 1e-10);
    }

    #[test]
    fn undefined_subsets_serialize_as_null() {
        let stats = TradeStats::compute(&[]);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["all"].is_null());
        assert!(json["winning"].is_null());
        assert!(json["losing"].is_null());
    }
}
