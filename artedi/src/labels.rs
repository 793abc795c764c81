//! Label sets and their canonical identity.
//!
//! A [`LabelSet`] is an unordered mapping of label name to [`LabelValue`].
//! Internally the pairs are kept in a [`BTreeMap`] so iteration, equality and
//! the [`canonical_hash`](LabelSet::canonical_hash) never depend on the order
//! in which the caller supplied them.

use std::{
    collections::BTreeMap,
    fmt::{Display, Write},
    hash::{Hash, Hasher},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

/// Pattern every collector name and label key must match.
pub const NAME_PATTERN: &str = "^[a-zA-Z_][a-zA-Z0-9_]*$";

/// Label name reserved for histogram bucket boundaries.
pub const BUCKET_LABEL: &str = "le";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"));

/// Returns true if `name` is usable as a collector name or label key.
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("label key {key:?} must match regex \"{pattern}\"", pattern = NAME_PATTERN)]
    InvalidKey { key: String },

    #[error("label {key:?} has a non-finite numeric value")]
    InvalidValue { key: String },

    #[error("label key {key:?} is reserved")]
    ReservedKey { key: String },
}

/// A scalar label value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl LabelValue {
    fn trim(&self) -> Self {
        match self {
            Self::String(s) => Self::String(s.trim().to_string()),
            other => other.clone(),
        }
    }
}

// NaN is rejected by `LabelSet::validate`, so equality is reflexive for every
// value stored in a collector.
impl Eq for LabelValue {}

impl Hash for LabelValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            // -0.0 and 0.0 compare equal so they must hash equal
            Self::Number(n) => (if *n == 0.0 { 0.0_f64 } else { *n })
                .to_bits()
                .hash(state),
            Self::String(s) => s.hash(state),
        }
    }
}

impl Display for LabelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for LabelValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LabelValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for LabelValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for LabelValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

macro_rules! label_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LabelValue {
                fn from(value: $t) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

label_value_from_int!(i32, i64, u16, u32, u64, usize);

/// Formats a sample value or bucket boundary the way the exposition format
/// expects: no trailing zeros, `+Inf`/`-Inf`/`NaN` for the special values.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "+Inf".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        n.to_string()
    }
}

/// Opaque identity of a [`LabelSet`], see [`LabelSet::canonical_hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelHash(u64);

/// An immutable, order-independent set of label pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeMap<String, LabelValue>);

impl LabelSet {
    /// The set with no labels.
    pub const EMPTY: Self = Self(BTreeMap::new());

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this set with `key` bound to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<LabelValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&LabelValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates the pairs in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Checks every key against [`NAME_PATTERN`] and every numeric value for
    /// finiteness.
    pub fn validate(&self) -> Result<(), LabelError> {
        for (key, value) in &self.0 {
            if !is_valid_name(key) {
                return Err(LabelError::InvalidKey { key: key.clone() });
            }
            if let LabelValue::Number(n) = value {
                if !n.is_finite() {
                    return Err(LabelError::InvalidValue { key: key.clone() });
                }
            }
        }
        Ok(())
    }

    /// Strips leading and trailing whitespace from keys and string values.
    pub fn trim(&self) -> Self {
        self.0
            .iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim()))
            .collect()
    }

    /// Merges `child` over `self`; on a key collision the child's value wins.
    pub fn merge(&self, child: &Self) -> Self {
        if child.is_empty() {
            return self.clone();
        }
        let mut merged = self.0.clone();
        merged.extend(child.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }

    /// A copy of this set without `key`.
    pub fn without(&self, key: &str) -> Self {
        let mut labels = self.clone();
        labels.0.remove(key);
        labels
    }

    /// Hashes the pairs in sorted key order.
    ///
    /// Two sets holding the same pairs always produce the same hash, however
    /// they were built.
    pub fn canonical_hash(&self) -> LabelHash {
        let mut hasher = XxHash64::with_seed(0);
        self.hash(&mut hasher);
        LabelHash(hasher.finish())
    }

    /// Writes `k1="v1",k2="v2"` with exposition-format escaping, without the
    /// surrounding braces.
    pub(crate) fn write_pairs(&self, out: &mut String) {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_pair(out, key, &value.to_string());
        }
    }
}

pub(crate) fn write_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Display for LabelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pairs = String::new();
        self.write_pairs(&mut pairs);
        f.write_char('{')?;
        f.write_str(&pairs)?;
        f.write_char('}')
    }
}

impl<K, V> FromIterator<(K, V)> for LabelSet
where
    K: Into<String>,
    V: Into<LabelValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for LabelSet
where
    K: Into<String>,
    V: Into<LabelValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Builds a [`LabelSet`] from `key => value` pairs.
///
/// ```
/// let labels = artedi::labels! { "method" => "GET", "code" => 200 };
/// assert_eq!(labels.to_string(), r#"{code="200",method="GET"}"#);
/// ```
#[macro_export]
macro_rules! labels {
    () => {
        $crate::LabelSet::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::LabelSet::new()$(.with($key, $value))+
    };
}
