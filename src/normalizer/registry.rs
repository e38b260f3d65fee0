use std::collections::BTreeMap;
use std::sync::Arc;
use arc_swap::ArcSwap;
use serde_json::Value;

use super::{ NormalizationReport, Normalizer };
use crate::error::Error;
use crate::models::{ CanonicalQuoteSet, FormatMapping };

/// Normalization outcome for one named source
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: Arc<str>,
    pub outcome: Result<NormalizationReport, Error>,
}

/// One normalizer per exchange, keyed by source name
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: ArcSwap<BTreeMap<Arc<str>, Arc<Normalizer>>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source or replace its mapping; the last call for a source wins
    pub fn register(&self, source: &str, mapping: FormatMapping) {
        if let Some(existing) = self.normalizer(source) {
            existing.configure(mapping);
            return;
        }

        let candidate = Arc::new(Normalizer::new(mapping.clone()));
        self.sources.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.entry(Arc::from(source)).or_insert_with(|| candidate.clone());
            next
        });

        // Another register for the same source got its normalizer in first
        if let Some(normalizer) = self.normalizer(source) {
            if !Arc::ptr_eq(&normalizer, &candidate) {
                normalizer.configure(mapping);
            }
        }
    }

    /// Replace the mapping of a registered source
    pub fn configure(&self, source: &str, mapping: FormatMapping) -> Result<(), Error> {
        let normalizer = self
            .normalizer(source)
            .ok_or_else(|| Error::Configuration(format!("unknown source {}", source)))?;
        normalizer.configure(mapping);
        Ok(())
    }

    pub fn normalizer(&self, source: &str) -> Option<Arc<Normalizer>> {
        self.sources.load().get(source).cloned()
    }

    pub fn sources(&self) -> Vec<Arc<str>> {
        self.sources.load().keys().cloned().collect()
    }

    /// Normalize one snapshot per source.
    ///
    /// Reports come back in source-name order. Snapshots for unregistered sources
    /// and registered sources without a snapshot are reported as errors.
    pub fn normalize_all<'a>(
        &self,
        snapshots: impl IntoIterator<Item = (&'a str, &'a Value)>
    ) -> Vec<SourceReport> {
        let sources = self.sources.load();
        let mut supplied: BTreeMap<&str, &Value> = BTreeMap::new();
        let mut reports = Vec::with_capacity(sources.len());

        for (source, raw) in snapshots {
            if sources.contains_key(source) {
                supplied.insert(source, raw);
            } else {
                reports.push(SourceReport {
                    source: Arc::from(source),
                    outcome: Err(
                        Error::Configuration(format!("no mapping registered for source {}", source))
                    ),
                });
            }
        }

        for (source, normalizer) in sources.iter() {
            let outcome = match supplied.get(source.as_ref()) {
                Some(raw) => Ok(normalizer.normalize(raw)),
                None => Err(Error::MissingSnapshot(source.clone())),
            };
            reports.push(SourceReport { source: source.clone(), outcome });
        }

        reports.sort_by(|a, b| a.source.cmp(&b.source));
        reports
    }

    /// Quotes of every successfully normalized source, later source names winning collisions
    pub fn merged_quotes(reports: &[SourceReport]) -> CanonicalQuoteSet {
        CanonicalQuoteSet::merge(
            reports
                .iter()
                .filter_map(|report| report.outcome.as_ref().ok())
                .map(|report| &report.quotes)
        )
    }
}
