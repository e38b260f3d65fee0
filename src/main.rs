// for the quick data allocation on memory
#[global_allocator]
static ALLOC: rpmalloc::RpMalloc = rpmalloc::RpMalloc;

mod app;
mod config;
mod utils;

use anyhow::{ Context, Result };

use config::Config;
use utils::logging;

// Define command line arguments enum
#[derive(Debug)]
enum Command {
    /// Evaluate the profile's cycles against `source=snapshot.json` files
    Run(Vec<String>),
    /// Built-in sample scenario
    Demo,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let command = match args.next().as_deref() {
        Some("demo") => Command::Demo,
        Some("run") => Command::Run(args.collect()),
        _ => {
            eprintln!("usage: tri-arb run <source>=<snapshot.json>... | tri-arb demo");
            std::process::exit(2);
        }
    };

    // Load configuration with helpful error messages
    let config = Config::from_env().context("Failed to load configuration from environment")?;

    // Initialize logging system; the guards flush on drop at exit
    let _log_guards = logging
        ::init_logging(config.log_level, config.debug, &config.log_config)
        .context("Failed to initialize logging system")?;

    match command {
        Command::Run(snapshots) => app::run_mode::run_snapshots(config, &snapshots)?,
        Command::Demo => app::demo_mode::run_demo(config)?,
    }

    Ok(())
}
