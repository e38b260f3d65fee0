use anyhow::{ Context, Result };
use serde_json::json;
use tracing::info;

use tri_arb::{
    analyze_snapshot,
    ArbitrageCycle,
    ArbitrageEngine,
    EngineConfig,
    FormatMapping,
    Leg,
    Normalizer,
};
use crate::config::Config;
use crate::utils::console::{ print_banner, print_failures, print_opportunities, print_quotes };

/// Sample BTC/ETH/USD walk-through: 0.05% cost per leg, USD → BTC → ETH → USD
pub fn run_demo(config: Config) -> Result<()> {
    print_banner("TRA demo");

    let engine_config = EngineConfig::new(0.05, config.profit_threshold_percent).context(
        "Invalid demo engine settings"
    )?;
    let engine = ArbitrageEngine::new(engine_config)?;
    let normalizer = Normalizer::new(FormatMapping::flat(["BTCUSD", "ETHBTC", "ETHUSD"]));

    let snapshot = json!({ "BTCUSD": 50000, "ETHBTC": 0.06, "ETHUSD": 3000 });
    let cycles = vec![
        ArbitrageCycle::from_legs(Leg::direct("BTCUSD"), Leg::direct("ETHBTC"), Leg::inverse("ETHUSD"))
    ];

    let analysis = analyze_snapshot(&normalizer, &engine, &snapshot, &cycles);

    print_quotes("demo", &analysis.normalization.quotes);
    print_failures("demo", &analysis.normalization.failures);
    print_opportunities(&analysis.opportunities.results);

    info!(
        opportunities = analysis.opportunities.opportunities().count(),
        "Demo finished with threshold {}%",
        engine_config.profit_threshold_percent
    );

    Ok(())
}
