use std::collections::BTreeMap;
use std::sync::Arc;
use serde::{ Deserialize, Serialize };

use super::field_path::FieldPath;

/// Per-source mapping from canonical symbol to the path of its price.
///
/// Iteration is ordered by symbol so normalization output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatMapping {
    paths: BTreeMap<Arc<str>, FieldPath>,
}

impl FormatMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a later entry for the same symbol replaces the earlier one
    pub fn with(mut self, symbol: &str, path: FieldPath) -> Self {
        self.paths.insert(Arc::from(symbol), path);
        self
    }

    /// Flat `{ "SYMBOL": price }` layout for the given symbols
    pub fn flat<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Self {
        symbols
            .into_iter()
            .fold(Self::new(), |mapping, symbol| mapping.with(symbol, FieldPath::key(symbol)))
    }

    #[inline]
    pub fn get(&self, symbol: &str) -> Option<&FieldPath> {
        self.paths.get(symbol)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &FieldPath)> {
        self.paths.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<(String, FieldPath)> for FormatMapping {
    fn from_iter<T: IntoIterator<Item = (String, FieldPath)>>(iter: T) -> Self {
        Self {
            paths: iter
                .into_iter()
                .map(|(symbol, path)| (Arc::from(symbol), path))
                .collect(),
        }
    }
}
