/// Absolute tolerance for float leaf comparison.
///
/// Absorbs serialization round-trip noise without hiding genuine edits; the
/// smallest UI step for any float leaf is 0.1.
pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Compares two float leaves under [`FLOAT_TOLERANCE`].
pub fn floats_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= FLOAT_TOLERANCE
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A leaf value in edit/diff form.
///
/// The DNA schema is heterogeneous (enum tokens, integers, floats, booleans,
/// one string sequence), and the diff/edit surface needs a single value type
/// keyed by dotted path. Rather than generic deep equality, this is a closed
/// tagged set with one explicit comparison rule per shape: scalars by exact
/// equality, floats under [`FLOAT_TOLERANCE`], sequences by full ordered
/// equality.
///
/// Serialization is untagged, so a modifications map renders as plain JSON:
/// `{"lighting.intensity": 0.8, "color.mood": "warm"}`.
pub enum LeafValue {
    /// Boolean leaf.
    Bool(bool),
    /// Integer leaf (focal length, color temperature).
    Int(i64),
    /// Float leaf (intensity, saturation, contrast, symmetry, haze).
    Float(f64),
    /// Enum leaf as its snake_case wire token.
    Str(String),
    /// The color palette.
    StrList(Vec<String>),
}

impl LeafValue {
    /// Leaf equality under the per-shape comparison rules.
    ///
    /// Values of different shapes are never equal; in particular an integer
    /// is not compared against a float, mirroring the schema's refusal to
    /// coerce types.
    pub fn leaf_eq(&self, other: &LeafValue) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => floats_close(*a, *b),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::StrList(a), Self::StrList(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for LeafValue {
    fn eq(&self, other: &Self) -> bool {
        self.leaf_eq(other)
    }
}

impl From<bool> for LeafValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for LeafValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for LeafValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for LeafValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Vec<String>> for LeafValue {
    fn from(v: Vec<String>) -> Self {
        Self::StrList(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dna/value.rs"]
mod tests;
