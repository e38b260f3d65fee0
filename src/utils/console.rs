use colored::*;
use figlet_rs::FIGfont;
use tracing::{ info, warn };

use tri_arb::{ CanonicalQuoteSet, Error, OpportunityResult };
use crate::config::Config;

pub fn print_config(config: &Config) {
    let json = serde_json::to_string_pretty(config).unwrap_or_default();

    info!("\n{}: \n{}", String::from("[CONFIG]").blue().underline(), json.magenta());
}

pub fn print_banner(text: &str) {
    let figure = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(text).map(|figure| figure.to_string()));

    match figure {
        Some(figure) => info!("\n{}", figure),
        None => info!("{}", text),
    }
}

pub fn print_quotes(source: &str, quotes: &CanonicalQuoteSet) {
    println!("\n{} {}", "=== QUOTES ===".bright_blue().bold(), source.cyan());
    for (symbol, price) in quotes.sorted() {
        println!("  {:<12} {}", symbol.yellow(), price);
    }
}

pub fn print_failures(context: &str, failures: &[Error]) {
    for failure in failures {
        warn!("{}: {}", context, failure);
        println!("  {} {}", "✗".red(), failure.to_string().red());
    }
}

/// Format one evaluated cycle for display
pub fn format_result(result: &OpportunityResult) -> String {
    let marker = if result.is_opportunity { "✓".bright_green().bold() } else { "·".dimmed() };
    let percent = format!("{:+.6}%", result.profit_percent);
    let percent = if result.profit_percent > 0.0 { percent.bright_green() } else { percent.red() };

    format!(
        "{} {} | Profit: {} | Final: {:.8}",
        marker,
        result.cycle.to_string().yellow(),
        percent,
        result.final_amount
    )
}

/// Print ranked results, best first
pub fn print_opportunities(results: &[OpportunityResult]) {
    if results.is_empty() {
        return;
    }

    println!("\n{}", "=== ARBITRAGE CYCLES ===".bright_purple().bold());

    for (i, result) in results.iter().enumerate() {
        println!("#{}: {}", i + 1, format_result(result));
    }

    println!("{}\n", "========================".bright_purple().bold());
}
