use std::sync::Arc;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rayon::prelude::*;

use super::config::{ EngineConfig, validate_cost, validate_threshold };
use crate::error::{ Error, Result };
use crate::models::{
    ArbitrageCycle,
    Leg,
    OpportunityReport,
    OpportunityResult,
    QuoteSource,
    validate_price,
};

/// Evaluates triangular cycles against canonical quotes.
///
/// Readers load the current [`EngineConfig`] without locking; setters go through
/// one writer lock and publish a whole new config, so cost and threshold are
/// always observed together.
#[derive(Debug)]
pub struct ArbitrageEngine {
    config: ArcSwap<EngineConfig>,
    writer: Mutex<()>,
}

impl Default for ArbitrageEngine {
    fn default() -> Self {
        Self {
            config: ArcSwap::from_pointee(EngineConfig::default()),
            writer: Mutex::new(()),
        }
    }
}

impl ArbitrageEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: ArcSwap::from_pointee(config),
            writer: Mutex::new(()),
        })
    }

    /// Snapshot of the active configuration
    #[inline]
    pub fn config(&self) -> EngineConfig {
        **self.config.load()
    }

    pub fn set_transaction_cost_percent(&self, pct: f64) -> Result<()> {
        validate_cost(pct)?;
        self.update(|config| {
            config.transaction_cost_percent = pct;
        });
        Ok(())
    }

    pub fn set_profit_threshold_percent(&self, pct: f64) -> Result<()> {
        validate_threshold(pct)?;
        self.update(|config| {
            config.profit_threshold_percent = pct;
        });
        Ok(())
    }

    /// Replace cost and threshold together
    pub fn replace_config(&self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        let _guard = self.writer.lock();
        self.config.store(Arc::new(config));
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut EngineConfig)) {
        let _guard = self.writer.lock();
        let mut next = **self.config.load();
        apply(&mut next);
        self.config.store(Arc::new(next));
    }

    /// Compound one unit of A through the three legs of `cycle`
    pub fn evaluate_cycle<Q>(&self, quotes: &Q, cycle: &ArbitrageCycle) -> Result<OpportunityResult>
        where Q: QuoteSource + ?Sized
    {
        let config = self.config.load();
        evaluate_with(&config, quotes, cycle)
    }

    /// Evaluate every cycle against the same config snapshot, best first.
    ///
    /// Cycles are independent; one failing does not affect the others.
    pub fn evaluate_all<Q>(&self, quotes: &Q, cycles: &[ArbitrageCycle]) -> OpportunityReport
        where Q: QuoteSource + Sync + ?Sized
    {
        let config = self.config.load_full();

        let outcomes: Vec<Result<OpportunityResult>> = cycles
            .par_iter()
            .map(|cycle| evaluate_with(&config, quotes, cycle))
            .collect();

        let mut report = OpportunityReport {
            results: Vec::with_capacity(outcomes.len()),
            failures: Vec::new(),
        };
        for (position, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(e) => report.failures.push((position, e)),
            }
        }

        // Stable sort keeps input order among equal returns
        report.results.sort_by(|a, b| b.profit_percent.total_cmp(&a.profit_percent));
        report
    }
}

fn evaluate_with<Q>(
    config: &EngineConfig,
    quotes: &Q,
    cycle: &ArbitrageCycle
) -> Result<OpportunityResult>
    where Q: QuoteSource + ?Sized
{
    let [ab, bc, ca] = cycle.legs();
    let prices = [
        leg_price(quotes, ab, cycle)?,
        leg_price(quotes, bc, cycle)?,
        leg_price(quotes, ca, cycle)?,
    ];

    let retention = config.retention();
    let mut amount = 1.0_f64;

    for (leg, price) in cycle.legs().iter().zip(prices) {
        amount *= retention;
        amount /= price;
        // Tiny but valid prices can compound past f64 range
        if !amount.is_finite() {
            return Err(
                Error::invalid_price(
                    &leg.symbol,
                    format!("conversion at price {} overflows the running amount", price)
                )
            );
        }
    }

    let profit = amount - 1.0;
    let profit_percent = profit * 100.0;

    Ok(OpportunityResult {
        cycle: cycle.clone(),
        is_opportunity: profit_percent > config.profit_threshold_percent,
        profit,
        profit_percent,
        final_amount: amount,
    })
}

fn leg_price<Q>(quotes: &Q, leg: &Leg, cycle: &ArbitrageCycle) -> Result<f64>
    where Q: QuoteSource + ?Sized
{
    let quoted = quotes.price(&leg.symbol).ok_or_else(|| Error::MissingQuote {
        symbol: leg.symbol.clone(),
        cycle: cycle.to_string(),
    })?;
    let quoted = validate_price(&leg.symbol, quoted)?;

    if !leg.inverted {
        return Ok(quoted);
    }

    let reciprocal = 1.0 / quoted;
    if !reciprocal.is_finite() || reciprocal <= 0.0 {
        return Err(
            Error::invalid_price(&leg.symbol, format!("reciprocal of {} is not usable", quoted))
        );
    }
    Ok(reciprocal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::models::CanonicalQuoteSet;

    fn engine(cost: f64, threshold: f64) -> ArbitrageEngine {
        ArbitrageEngine::new(EngineConfig::new(cost, threshold).unwrap()).unwrap()
    }

    fn fair_quotes() -> CanonicalQuoteSet {
        // 1 / 2 / 4 / 0.125 == 1 exactly
        CanonicalQuoteSet::try_from_prices([("AB", 2.0), ("BC", 4.0), ("CA", 0.125)]).unwrap()
    }

    fn sample_cycle() -> ArbitrageCycle {
        ArbitrageCycle::from_legs(Leg::direct("BTCUSD"), Leg::direct("ETHBTC"), Leg::inverse("ETHUSD"))
    }

    fn sample_quotes() -> CanonicalQuoteSet {
        CanonicalQuoteSet::try_from_prices([
            ("BTCUSD", 50000.0),
            ("ETHBTC", 0.06),
            ("ETHUSD", 3000.0),
        ]).unwrap()
    }

    #[test]
    fn test_zero_cost_fair_prices_break_even() {
        let result = engine(0.0, 0.0)
            .evaluate_cycle(&fair_quotes(), &ArbitrageCycle::new("AB", "BC", "CA"))
            .unwrap();

        assert_eq!(result.profit, 0.0);
        assert_eq!(result.profit_percent, 0.0);
        assert!(!result.is_opportunity);
    }

    #[test]
    fn test_profit_decreases_with_cost() {
        let cycle = ArbitrageCycle::new("AB", "BC", "CA");
        let quotes = fair_quotes();
        let engine = ArbitrageEngine::default();

        let mut previous = f64::INFINITY;
        for cost in [0.0, 0.01, 0.1, 1.0, 10.0, 50.0, 99.0] {
            engine.set_transaction_cost_percent(cost).unwrap();
            let result = engine.evaluate_cycle(&quotes, &cycle).unwrap();
            assert!(result.profit_percent < previous, "cost {} did not lower profit", cost);
            previous = result.profit_percent;
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        // Profit of exactly 25% with no cost
        let quotes = CanonicalQuoteSet::try_from_prices([("AB", 0.5), ("BC", 2.0), ("CA", 0.8)]).unwrap();
        let cycle = ArbitrageCycle::new("AB", "BC", "CA");

        let at_threshold = engine(0.0, 25.0).evaluate_cycle(&quotes, &cycle).unwrap();
        assert_eq!(at_threshold.profit_percent, 25.0);
        assert!(!at_threshold.is_opportunity);

        let below_threshold = engine(0.0, 24.999).evaluate_cycle(&quotes, &cycle).unwrap();
        assert!(below_threshold.is_opportunity);
    }

    #[test]
    fn test_sample_scenario_matches_formula() {
        let result = engine(0.05, 0.0).evaluate_cycle(&sample_quotes(), &sample_cycle()).unwrap();

        let retention = 1.0 - 0.05 / 100.0;
        let after_first = retention / 50000.0;
        let after_second = (after_first * retention) / 0.06;
        let expected_final = (after_second * retention) / (1.0 / 3000.0);

        assert!((result.final_amount - expected_final).abs() < 1e-12);
        assert!((result.profit - (expected_final - 1.0)).abs() < 1e-12);
        assert!((result.profit_percent - (expected_final - 1.0) * 100.0).abs() < 1e-10);
        assert_eq!(result.is_opportunity, result.profit_percent > 0.0);
    }

    #[test]
    fn test_missing_quote_names_symbol_and_cycle() {
        let quotes = CanonicalQuoteSet::try_from_prices([("BTCUSD", 50000.0), ("ETHUSD", 3000.0)]).unwrap();
        let err = ArbitrageEngine::default().evaluate_cycle(&quotes, &sample_cycle()).unwrap_err();

        match err {
            Error::MissingQuote { symbol, cycle } => {
                assert_eq!(symbol.as_ref(), "ETHBTC");
                assert_eq!(cycle, "BTCUSD → ETHBTC → 1/ETHUSD");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unvalidated_quotes_are_rechecked() {
        let mut raw: HashMap<String, f64> = HashMap::new();
        raw.insert("AB".to_string(), 2.0);
        raw.insert("BC".to_string(), 0.0);
        raw.insert("CA".to_string(), 0.125);

        let err = ArbitrageEngine::default()
            .evaluate_cycle(&raw, &ArbitrageCycle::new("AB", "BC", "CA"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPrice { ref symbol, .. } if symbol.as_ref() == "BC"));

        raw.insert("BC".to_string(), f64::NAN);
        let err = ArbitrageEngine::default()
            .evaluate_cycle(&raw, &ArbitrageCycle::new("AB", "BC", "CA"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPrice { .. }));
    }

    #[test]
    fn test_overflowing_amount_is_rejected() {
        // Each leg multiplies the amount by 1e200; the second leg leaves f64 range
        let quotes = CanonicalQuoteSet::try_from_prices([("AB", 1e-200), ("BC", 1e-200), ("CA", 1e-200)]).unwrap();

        let err = engine(0.0, 0.0)
            .evaluate_cycle(&quotes, &ArbitrageCycle::new("AB", "BC", "CA"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPrice { ref symbol, .. } if symbol.as_ref() == "BC"));

        let report = engine(0.0, 0.0).evaluate_all(&quotes, &[ArbitrageCycle::new("AB", "BC", "CA")]);
        assert_eq!(report.opportunities().count(), 0);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_rejected_settings_leave_config_unchanged() {
        let engine = engine(0.2, 1.5);

        assert!(matches!(engine.set_transaction_cost_percent(100.0), Err(Error::Configuration(_))));
        assert!(matches!(engine.set_transaction_cost_percent(-1.0), Err(Error::Configuration(_))));
        assert!(matches!(engine.set_profit_threshold_percent(f64::NAN), Err(Error::Configuration(_))));
        assert!(engine.replace_config(EngineConfig { transaction_cost_percent: 150.0, profit_threshold_percent: 0.0 }).is_err());

        assert_eq!(engine.config(), EngineConfig::new(0.2, 1.5).unwrap());

        engine.set_profit_threshold_percent(-3.0).unwrap();
        assert_eq!(engine.config().profit_threshold_percent, -3.0);
        assert_eq!(engine.config().transaction_cost_percent, 0.2);
    }

    #[test]
    fn test_evaluate_all_ranks_and_keeps_failures() {
        let quotes = CanonicalQuoteSet::try_from_prices([
            ("AB", 2.0),
            ("BC", 4.0),
            ("CA", 0.125),
            ("CA_RICH", 0.1),
        ]).unwrap();
        let cycles = vec![
            ArbitrageCycle::new("AB", "BC", "CA"),
            ArbitrageCycle::new("AB", "BC", "MISSING"),
            ArbitrageCycle::new("AB", "BC", "CA_RICH"),
            ArbitrageCycle::new("BC", "AB", "CA")
        ];

        let report = engine(0.0, 0.0).evaluate_all(&quotes, &cycles);

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].cycle, cycles[2]);
        // Equal returns stay in input order
        assert_eq!(report.results[1].cycle, cycles[0]);
        assert_eq!(report.results[2].cycle, cycles[3]);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, 1);
        assert!(matches!(report.failures[0].1, Error::MissingQuote { .. }));

        let opportunities: Vec<_> = report.opportunities().collect();
        assert_eq!(opportunities.len(), 1);

        // Re-iterating reads the same results
        let first: Vec<f64> = report.iter().map(|r| r.profit_percent).collect();
        let second: Vec<f64> = (&report).into_iter().map(|r| r.profit_percent).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_readers_never_see_torn_config() {
        let engine = Arc::new(engine(0.0, 0.0));
        let quotes = Arc::new(fair_quotes());
        let cycle = ArbitrageCycle::new("AB", "BC", "CA");

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                let quotes = quotes.clone();
                let cycle = cycle.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let config = engine.config();
                        let paired = (config.transaction_cost_percent, config.profit_threshold_percent);
                        assert!(paired == (0.0, 0.0) || paired == (1.0, -5.0));
                        engine.evaluate_cycle(quotes.as_ref(), &cycle).unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..100 {
            engine.replace_config(EngineConfig::new(1.0, -5.0).unwrap()).unwrap();
            engine.replace_config(EngineConfig::new(0.0, 0.0).unwrap()).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }

    // =========================================================================
    // Property-based tests (proptest)
    // =========================================================================
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn quotes(ab: f64, bc: f64, ca: f64) -> CanonicalQuoteSet {
            CanonicalQuoteSet::try_from_prices([("AB", ab), ("BC", bc), ("CA", ca)]).unwrap()
        }

        proptest! {
            #[test]
            fn power_of_two_fair_prices_break_even(
                a in -20i32..20,
                b in -20i32..20,
                threshold in 0.0f64..50.0
            ) {
                // 2^a * 2^b * 2^-(a+b) == 1 with no rounding
                let quotes = quotes(2f64.powi(a), 2f64.powi(b), 2f64.powi(-(a + b)));
                let result = engine(0.0, threshold)
                    .evaluate_cycle(&quotes, &ArbitrageCycle::new("AB", "BC", "CA"))
                    .unwrap();

                prop_assert_eq!(result.final_amount, 1.0);
                prop_assert_eq!(result.profit, 0.0);
                prop_assert_eq!(result.profit_percent, 0.0);
                prop_assert!(!result.is_opportunity);
            }

            #[test]
            fn higher_cost_strictly_lowers_profit(
                ab in 0.5f64..2.0,
                bc in 0.5f64..2.0,
                skew in 0.5f64..2.0,
                low in 0.0f64..98.0,
                step in 0.001f64..1.0
            ) {
                // Keeps the final amount near 1 so profit differences stay representable
                let quotes = quotes(ab, bc, skew / (ab * bc));
                let cycle = ArbitrageCycle::new("AB", "BC", "CA");
                let high = low + step;

                let cheap = engine(low, 0.0).evaluate_cycle(&quotes, &cycle).unwrap();
                let costly = engine(high, 0.0).evaluate_cycle(&quotes, &cycle).unwrap();

                prop_assert!(
                    cheap.profit_percent > costly.profit_percent,
                    "cost {} gave {} but cost {} gave {}",
                    low,
                    cheap.profit_percent,
                    high,
                    costly.profit_percent
                );
            }

            #[test]
            fn profit_equal_to_threshold_is_not_an_opportunity(
                ab in 0.01f64..1000.0,
                bc in 0.01f64..1000.0,
                ca in 0.01f64..1000.0,
                cost in 0.0f64..5.0
            ) {
                let quotes = quotes(ab, bc, ca);
                let cycle = ArbitrageCycle::new("AB", "BC", "CA");
                let profit_percent = engine(cost, 0.0).evaluate_cycle(&quotes, &cycle).unwrap().profit_percent;

                let at = engine(cost, profit_percent).evaluate_cycle(&quotes, &cycle).unwrap();
                prop_assert_eq!(at.profit_percent, profit_percent);
                prop_assert!(!at.is_opportunity);

                let below = profit_percent - profit_percent.abs().max(1.0) * 1e-9;
                let under = engine(cost, below).evaluate_cycle(&quotes, &cycle).unwrap();
                prop_assert!(under.is_opportunity);
            }
        }
    }
}
