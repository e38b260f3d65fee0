use serde::Serialize;

use super::cycle::ArbitrageCycle;
use crate::error::Error;

/// Outcome of evaluating one cycle against one quote set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityResult {
    pub cycle: ArbitrageCycle,
    pub is_opportunity: bool,
    /// Amount of A gained per unit of A started with
    pub profit: f64,
    pub profit_percent: f64,
    pub final_amount: f64,
}

/// Ranked results of evaluating a batch of cycles.
///
/// `results` is ordered by descending `profit_percent`, ties kept in input order.
/// Cycles that could not be evaluated are listed in `failures` with their input position.
#[derive(Debug, Clone, Default)]
pub struct OpportunityReport {
    pub results: Vec<OpportunityResult>,
    pub failures: Vec<(usize, Error)>,
}

impl OpportunityReport {
    /// Results that beat the profit threshold, best first
    pub fn opportunities(&self) -> impl Iterator<Item = &OpportunityResult> {
        self.results.iter().filter(|result| result.is_opportunity)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, OpportunityResult> {
        self.results.iter()
    }

    /// Best `n` results regardless of threshold
    pub fn top(&self, n: usize) -> &[OpportunityResult] {
        &self.results[..n.min(self.results.len())]
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<'a> IntoIterator for &'a OpportunityReport {
    type Item = &'a OpportunityResult;
    type IntoIter = std::slice::Iter<'a, OpportunityResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
