//! Triangular arbitrage detection over heterogeneous exchange snapshots.
//!
//! Raw payloads go through a [`Normalizer`] (declarative field paths, no code
//! evaluation) into a [`CanonicalQuoteSet`], which the [`ArbitrageEngine`]
//! evaluates against three-leg cycles. The library never logs or prints;
//! every failure comes back as an [`Error`] value.

pub mod arbitrage;
pub mod error;
pub mod models;
pub mod normalizer;

pub use arbitrage::{ ArbitrageEngine, EngineConfig, SnapshotAnalysis, analyze_snapshot };
pub use error::{ Error, Result };
pub use models::{
    Accessor,
    ArbitrageCycle,
    CanonicalQuoteSet,
    FieldPath,
    FormatMapping,
    Leg,
    OpportunityReport,
    OpportunityResult,
    QuoteSource,
};
pub use normalizer::{ NormalizationReport, Normalizer, SourceRegistry, SourceReport };
