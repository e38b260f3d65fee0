pub mod registry;

use std::sync::Arc;
use arc_swap::ArcSwap;
use serde_json::Value;

use crate::error::Error;
use crate::models::{ Accessor, CanonicalQuoteSet, FieldPath, FormatMapping };

pub use registry::{ SourceReport, SourceRegistry };

/// Quotes that resolved plus every per-symbol failure, in mapping order
#[derive(Debug, Clone, Default)]
pub struct NormalizationReport {
    pub quotes: CanonicalQuoteSet,
    pub failures: Vec<Error>,
}

impl NormalizationReport {
    /// True when every mapped symbol produced a quote
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_symbols(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().filter_map(Error::symbol)
    }

    /// Demand full coverage, handing back the failures otherwise
    pub fn into_complete(self) -> Result<CanonicalQuoteSet, Vec<Error>> {
        if self.failures.is_empty() { Ok(self.quotes) } else { Err(self.failures) }
    }
}

/// Translates one exchange's payload shape into canonical quotes
#[derive(Debug)]
pub struct Normalizer {
    mapping: ArcSwap<FormatMapping>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(FormatMapping::default())
    }
}

impl Normalizer {
    pub fn new(mapping: FormatMapping) -> Self {
        Self {
            mapping: ArcSwap::from_pointee(mapping),
        }
    }

    /// Replace the active mapping; in-flight `normalize` calls keep the one they loaded
    pub fn configure(&self, mapping: FormatMapping) {
        self.mapping.store(Arc::new(mapping));
    }

    /// Current mapping snapshot
    pub fn mapping(&self) -> Arc<FormatMapping> {
        self.mapping.load_full()
    }

    /// Resolve every mapped symbol against `raw`
    pub fn normalize(&self, raw: &Value) -> NormalizationReport {
        let mapping = self.mapping.load();
        let mut report = NormalizationReport::default();

        for (symbol, path) in mapping.iter() {
            let outcome = resolve_path(raw, path)
                .map_err(|(step, reason)| Error::Normalization {
                    symbol: symbol.clone(),
                    step,
                    reason,
                })
                .and_then(|value| extract_price(symbol, value));

            if let Err(e) = outcome.and_then(|price| report.quotes.insert(symbol, price)) {
                report.failures.push(e);
            }
        }

        report
    }
}

/// Walk `path` through `raw` using plain key/index lookups.
///
/// On failure returns the zero-based step that could not be taken and why.
pub fn resolve_path<'a>(raw: &'a Value, path: &FieldPath) -> Result<&'a Value, (usize, String)> {
    let mut current = raw;

    for (step, accessor) in path.steps().iter().enumerate() {
        current = match (accessor, current) {
            (Accessor::Key(key), Value::Object(map)) =>
                map.get(key).ok_or_else(|| (step, format!("key {:?} not found", key)))?,
            (Accessor::Index(index), Value::Array(items)) =>
                items
                    .get(*index)
                    .ok_or_else(|| {
                        (step, format!("index {} out of range (length {})", index, items.len()))
                    })?,
            (Accessor::Key(key), Value::Array(_)) => {
                return Err((step, format!("key {:?} applied to a list", key)));
            }
            (Accessor::Index(index), Value::Object(_)) => {
                return Err((step, format!("index {} applied to a map", index)));
            }
            (_, scalar) => {
                return Err((step, format!("cannot traverse into {}", kind_of(scalar))));
            }
        };
    }

    Ok(current)
}

/// Numeric JSON value as `f64`; range checks happen on insertion into the quote set
fn extract_price(symbol: &str, value: &Value) -> Result<f64, Error> {
    match value {
        Value::Number(number) =>
            number
                .as_f64()
                .ok_or_else(|| Error::invalid_price(symbol, format!("{} is not representable as f64", number))),
        other => Err(Error::invalid_price(symbol, format!("expected a number, found {}", kind_of(other)))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}
