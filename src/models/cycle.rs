use std::fmt;
use std::sync::Arc;
use serde::{ Deserialize, Serialize };

/// One conversion step of a cycle.
///
/// An inverted leg trades against the reciprocal of the quoted price,
/// e.g. USD → ETH priced off an `ETHUSD` quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LegRepr")]
pub struct Leg {
    pub symbol: Arc<str>,
    pub inverted: bool,
}

// Profiles may write a leg as a bare symbol or as `{ symbol, inverted }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LegRepr {
    Symbol(String),
    Detailed {
        symbol: String,
        #[serde(default)]
        inverted: bool,
    },
}

impl From<LegRepr> for Leg {
    fn from(repr: LegRepr) -> Self {
        match repr {
            LegRepr::Symbol(symbol) => Leg::direct(&symbol),
            LegRepr::Detailed { symbol, inverted } =>
                Leg {
                    symbol: Arc::from(symbol),
                    inverted,
                },
        }
    }
}

impl Leg {
    #[inline]
    pub fn direct(symbol: &str) -> Self {
        Self { symbol: Arc::from(symbol), inverted: false }
    }

    #[inline]
    pub fn inverse(symbol: &str) -> Self {
        Self { symbol: Arc::from(symbol), inverted: true }
    }
}

impl From<&str> for Leg {
    fn from(symbol: &str) -> Self {
        Leg::direct(symbol)
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted { write!(f, "1/{}", self.symbol) } else { write!(f, "{}", self.symbol) }
    }
}

/// Three-leg conversion loop A → B → C → A, legs ordered (AB, BC, CA)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArbitrageCycle {
    pub legs: [Leg; 3],
}

impl ArbitrageCycle {
    /// Cycle over three directly quoted symbols
    pub fn new(ab: &str, bc: &str, ca: &str) -> Self {
        Self::from_legs(Leg::direct(ab), Leg::direct(bc), Leg::direct(ca))
    }

    pub fn from_legs(ab: Leg, bc: Leg, ca: Leg) -> Self {
        Self { legs: [ab, bc, ca] }
    }

    #[inline]
    pub fn legs(&self) -> &[Leg; 3] {
        &self.legs
    }

    /// Symbols the cycle needs quotes for
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.legs.iter().map(|leg| leg.symbol.as_ref())
    }
}

impl fmt::Display for ArbitrageCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [ab, bc, ca] = &self.legs;
        write!(f, "{} → {} → {}", ab, bc, ca)
    }
}
