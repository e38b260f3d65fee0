use serde_json::Value;

use super::engine::ArbitrageEngine;
use crate::models::{ ArbitrageCycle, OpportunityReport };
use crate::normalizer::{ NormalizationReport, Normalizer };

/// Normalization and evaluation results for one snapshot
#[derive(Debug, Clone)]
pub struct SnapshotAnalysis {
    pub normalization: NormalizationReport,
    pub opportunities: OpportunityReport,
}

/// Normalize `raw` and evaluate `cycles` against whatever quotes resolved.
///
/// Cycles that need a symbol which failed normalization show up as
/// `MissingQuote` failures in the opportunity report.
pub fn analyze_snapshot(
    normalizer: &Normalizer,
    engine: &ArbitrageEngine,
    raw: &Value,
    cycles: &[ArbitrageCycle]
) -> SnapshotAnalysis {
    let normalization = normalizer.normalize(raw);
    let opportunities = engine.evaluate_all(&normalization.quotes, cycles);

    SnapshotAnalysis {
        normalization,
        opportunities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{ FormatMapping, Leg };
    use serde_json::json;

    #[test]
    fn test_partial_snapshot_fails_only_dependent_cycles() {
        let normalizer = Normalizer::new(FormatMapping::flat(["AB", "BC", "CA", "XY"]));
        let engine = ArbitrageEngine::default();
        let cycles = vec![
            ArbitrageCycle::new("AB", "BC", "CA"),
            ArbitrageCycle::from_legs(Leg::direct("AB"), Leg::direct("XY"), Leg::inverse("CA"))
        ];

        let analysis = analyze_snapshot(
            &normalizer,
            &engine,
            &json!({ "AB": 2, "BC": 4, "CA": 0.125, "XY": "n/a" }),
            &cycles
        );

        assert_eq!(analysis.normalization.failures.len(), 1);
        assert_eq!(analysis.opportunities.results.len(), 1);
        assert_eq!(analysis.opportunities.failures.len(), 1);
        assert!(
            matches!(&analysis.opportunities.failures[0], (1, Error::MissingQuote { symbol, .. }) if symbol.as_ref() == "XY")
        );
    }
}
