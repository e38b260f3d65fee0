use serde::{ Deserialize, Serialize };

use crate::error::{ Error, Result };

pub const DEFAULT_TRANSACTION_COST_PERCENT: f64 = 0.1;
pub const DEFAULT_PROFIT_THRESHOLD_PERCENT: f64 = 0.0;

/// Cost and profitability settings, swapped as one value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Flat cost charged on every leg, in percent of the traded amount
    pub transaction_cost_percent: f64,
    /// Minimum round-trip return, in percent, for a cycle to count as an opportunity
    pub profit_threshold_percent: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transaction_cost_percent: DEFAULT_TRANSACTION_COST_PERCENT,
            profit_threshold_percent: DEFAULT_PROFIT_THRESHOLD_PERCENT,
        }
    }
}

impl EngineConfig {
    pub fn new(transaction_cost_percent: f64, profit_threshold_percent: f64) -> Result<Self> {
        let config = Self { transaction_cost_percent, profit_threshold_percent };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_cost(self.transaction_cost_percent)?;
        validate_threshold(self.profit_threshold_percent)
    }

    /// Fraction of the amount left after paying one leg's cost
    #[inline]
    pub fn retention(&self) -> f64 {
        1.0 - self.transaction_cost_percent / 100.0
    }
}

pub(crate) fn validate_cost(pct: f64) -> Result<()> {
    if !pct.is_finite() || !(0.0..100.0).contains(&pct) {
        return Err(
            Error::Configuration(format!("transaction cost {}% is outside [0, 100)", pct))
        );
    }
    Ok(())
}

pub(crate) fn validate_threshold(pct: f64) -> Result<()> {
    if !pct.is_finite() {
        return Err(Error::Configuration(format!("profit threshold {}% is not finite", pct)));
    }
    Ok(())
}
