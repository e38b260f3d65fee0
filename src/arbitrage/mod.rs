pub mod analysis;
pub mod config;
pub mod engine;

pub use analysis::{ SnapshotAnalysis, analyze_snapshot };
pub use config::EngineConfig;
pub use engine::ArbitrageEngine;
