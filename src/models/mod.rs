pub mod cycle;
pub mod field_path;
pub mod format_mapping;
pub mod opportunity;
pub mod quote_set;

pub use cycle::{ ArbitrageCycle, Leg };
pub use field_path::{ Accessor, FieldPath };
pub use format_mapping::FormatMapping;
pub use opportunity::{ OpportunityReport, OpportunityResult };
pub use quote_set::{ CanonicalQuoteSet, QuoteSource, validate_price };
