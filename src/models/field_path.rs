use std::fmt;
use serde::{ Deserialize, Serialize };
use smallvec::SmallVec;

/// One data-only step into a raw snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Accessor {
    /// Look up a key in a map
    Key(String),
    /// Look up a position in a list
    Index(usize),
}

impl From<&str> for Accessor {
    fn from(key: &str) -> Self {
        Accessor::Key(key.to_string())
    }
}

impl From<String> for Accessor {
    fn from(key: String) -> Self {
        Accessor::Key(key)
    }
}

impl From<usize> for Accessor {
    fn from(index: usize) -> Self {
        Accessor::Index(index)
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Key(key) => write!(f, "[{:?}]", key),
            Accessor::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Location of a scalar inside a nested snapshot.
///
/// Most exchange payloads put a price within a few levels of the root,
/// so steps are stored inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Accessor>", into = "Vec<Accessor>")]
pub struct FieldPath {
    steps: SmallVec<[Accessor; 4]>,
}

impl FieldPath {
    pub fn new<I, A>(steps: I) -> Self where I: IntoIterator<Item = A>, A: Into<Accessor> {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Path made of a single map key, the shape of flat ticker maps
    #[inline]
    pub fn key(key: &str) -> Self {
        Self::new([key])
    }

    #[inline]
    pub fn steps(&self) -> &[Accessor] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl From<Vec<Accessor>> for FieldPath {
    fn from(steps: Vec<Accessor>) -> Self {
        Self { steps: SmallVec::from_vec(steps) }
    }
}

impl From<FieldPath> for Vec<Accessor> {
    fn from(path: FieldPath) -> Self {
        path.steps.into_vec()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "<root>");
        }
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
