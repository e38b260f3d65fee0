use std::fs;
use std::path::{ Path, PathBuf };

use anyhow::{ anyhow, bail, Context, Result };
use serde_json::Value;
use tracing::{ info, warn };

use tri_arb::{ ArbitrageEngine, SourceRegistry };
use crate::config::{ Config, Profile };
use crate::utils::console::{ print_banner, print_config, print_failures, print_opportunities, print_quotes };

/// Split a `source=path/to/snapshot.json` argument
pub fn parse_snapshot_arg(arg: &str) -> Result<(String, PathBuf)> {
    let (source, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected <source>=<snapshot.json>, got {:?}", arg))?;

    let (source, path) = (source.trim(), path.trim());
    if source.is_empty() || path.is_empty() {
        bail!("Expected <source>=<snapshot.json>, got {:?}", arg);
    }

    Ok((source.to_string(), PathBuf::from(path)))
}

fn read_snapshot(path: &Path) -> Result<Value> {
    let text = fs
        ::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Snapshot {} is not valid JSON", path.display()))
}

/// Evaluate the profile's cycles against snapshot files, one per source
pub fn run_snapshots(config: Config, snapshot_args: &[String]) -> Result<()> {
    print_banner("TRA is starting...");
    print_config(&config);

    let profile_path = config.profile
        .as_deref()
        .context("TRA_PROFILE must point to a profile JSON file for the run command")?;
    let profile = Profile::load(profile_path)?;

    let engine_config = match profile.engine {
        Some(engine_config) => engine_config,
        None => config.engine_config()?,
    };
    let engine = ArbitrageEngine::new(engine_config).context("Failed to create arbitrage engine")?;
    let registry = profile.registry();

    info!(
        sources = profile.sources.len(),
        cycles = profile.cycles.len(),
        cost_percent = engine_config.transaction_cost_percent,
        threshold_percent = engine_config.profit_threshold_percent,
        "Profile loaded from {}",
        profile_path.display()
    );

    let mut snapshots = Vec::with_capacity(snapshot_args.len());
    for arg in snapshot_args {
        let (source, path) = parse_snapshot_arg(arg)?;
        snapshots.push((source, read_snapshot(&path)?));
    }
    if snapshots.is_empty() {
        bail!("No snapshots given; usage: tri-arb run <source>=<snapshot.json>...");
    }

    let reports = registry.normalize_all(
        snapshots.iter().map(|(source, raw)| (source.as_str(), raw))
    );

    for report in &reports {
        match &report.outcome {
            Ok(normalization) => {
                info!(
                    source = %report.source,
                    quotes = normalization.quotes.len(),
                    failures = normalization.failures.len(),
                    "Snapshot normalized"
                );
                print_quotes(&report.source, &normalization.quotes);
                print_failures(&report.source, &normalization.failures);
            }
            Err(e) => {
                warn!(source = %report.source, "Source skipped: {}", e);
            }
        }
    }

    let quotes = SourceRegistry::merged_quotes(&reports);
    let outcome = engine.evaluate_all(&quotes, &profile.cycles);

    for (position, failure) in &outcome.failures {
        warn!(cycle = %profile.cycles[*position], "Cycle not evaluated: {}", failure);
    }

    print_opportunities(outcome.top(config.top_n));

    info!(
        evaluated = outcome.results.len(),
        opportunities = outcome.opportunities().count(),
        failed = outcome.failures.len(),
        "Evaluation finished"
    );

    Ok(())
}
