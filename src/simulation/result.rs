use crate::scenario::path::PricePath;
use serde::Serialize;

/// Position value recorded for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionValuePoint {
    pub day: usize,
    pub total_value: f64,
    pub intrinsic_value: f64,
}

/// Profit and loss recorded for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PnlPoint {
    pub day: usize,
    pub pnl: f64,
    pub total_value: f64,
}

/// Aggregate statistics over a P&L series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PnlStatistics {
    /// P&L of the last entry.
    pub total_pnl: f64,
    pub max_loss: f64,
    pub max_gain: f64,
    /// Fraction of entries with strictly positive P&L. A whole-path
    /// statistic, not a final-day flag.
    pub win_probability: f64,
}

impl PnlStatistics {
    /// Aggregate `series`. An empty series yields all zeros.
    pub fn from_series(series: &[f64]) -> Self {
        let Some(&total_pnl) = series.last() else {
            return Self::default();
        };
        let max_loss = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max_gain = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let winners = series.iter().filter(|pnl| **pnl > 0.0).count();

        Self {
            total_pnl,
            max_loss,
            max_gain,
            win_probability: winners as f64 / series.len() as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalResult {
    pub total_pnl: f64,
    pub max_loss: f64,
    pub max_gain: f64,
    pub win_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_day: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_reason: Option<String>,
}

/// Output of one simulation run.
///
/// `option_values` and `strategy_pnl` always have one entry per path
/// point. After an exit on day `d`, later entries repeat day `d`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub price_path: PricePath,
    pub option_values: Vec<OptionValuePoint>,
    pub strategy_pnl: Vec<PnlPoint>,
    pub final_result: FinalResult,
}

impl SimulationResult {
    /// Whether an exit rule closed the position before expiry.
    pub fn exited_early(&self) -> bool {
        self.final_result.exit_day.is_some()
    }

    pub fn pnl_series(&self) -> impl Iterator<Item = f64> + '_ {
        self.strategy_pnl.iter().map(|p| p.pnl)
    }
}
