use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;
use ahash::AHashMap;

use crate::error::{ Error, Result };

/// Check that a price can take part in a conversion
#[inline]
pub fn validate_price(symbol: &str, price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(Error::invalid_price(symbol, format!("price {} is not finite", price)));
    }
    if price <= 0.0 {
        return Err(Error::invalid_price(symbol, format!("price {} is not positive", price)));
    }
    Ok(price)
}

/// Anything the engine can look prices up in
pub trait QuoteSource {
    fn price(&self, symbol: &str) -> Option<f64>;
}

/// Validated symbol → price map produced by normalization
#[derive(Debug, Clone, Default)]
pub struct CanonicalQuoteSet {
    prices: AHashMap<Arc<str>, f64>,
}

impl CanonicalQuoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a price after validating it; rejected prices leave the set untouched
    pub fn insert(&mut self, symbol: &str, price: f64) -> Result<()> {
        let price = validate_price(symbol, price)?;
        self.prices.insert(Arc::from(symbol), price);
        Ok(())
    }

    /// Build a set from `(symbol, price)` pairs, failing on the first invalid price
    pub fn try_from_prices<'a>(prices: impl IntoIterator<Item = (&'a str, f64)>) -> Result<Self> {
        let mut set = Self::new();
        for (symbol, price) in prices {
            set.insert(symbol, price)?;
        }
        Ok(set)
    }

    /// Combine several sets; later sets win on symbol collisions
    pub fn merge<'a>(sets: impl IntoIterator<Item = &'a CanonicalQuoteSet>) -> Self {
        let mut merged = Self::new();
        for set in sets {
            for (symbol, price) in &set.prices {
                merged.prices.insert(symbol.clone(), *price);
            }
        }
        merged
    }

    #[inline]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }

    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.prices.contains_key(symbol)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Prices ordered by symbol, for reporting
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.prices
            .iter()
            .map(|(symbol, price)| (symbol.as_ref(), *price))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl QuoteSource for CanonicalQuoteSet {
    #[inline]
    fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol)
    }
}

// Un-normalized input; the engine revalidates whatever comes out of it.
impl<S: BuildHasher> QuoteSource for HashMap<String, f64, S> {
    #[inline]
    fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).copied()
    }
}
