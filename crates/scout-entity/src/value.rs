//! Typed metadata values.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

/// A metadata value attached to an entity.
///
/// Metadata bags in the source records are open `key -> any` maps; here the
/// values are constrained to a closed set of variants so that scoring,
/// filtering, and sorting never have to interpret arbitrary JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
    /// A text value.
    Str(String),
    /// A list of text values.
    List(Vec<String>),
}

impl MetaValue {
    /// Returns the value rendered as searchable text.
    ///
    /// Lists join their elements with spaces so each element tokenizes
    /// independently.
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Str(s) => s.clone(),
            Self::List(items) => items.join(" "),
        }
    }

    /// Compares two values for sorting.
    ///
    /// Numbers compare numerically across `Int`/`Float`; everything else
    /// falls back to comparing the text rendering. Total, so sorting never
    /// panics on mixed-type metadata.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Int(a), Self::Float(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Self::Float(a), Self::Int(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            (a, b) => a.as_text().cmp(&b.as_text()),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_rendering() {
        assert_eq!(MetaValue::Bool(true).as_text(), "true");
        assert_eq!(MetaValue::Int(42).as_text(), "42");
        assert_eq!(MetaValue::Str("abc".to_string()).as_text(), "abc");
        assert_eq!(
            MetaValue::List(vec!["a".to_string(), "b".to_string()]).as_text(),
            "a b"
        );
    }

    #[test]
    fn numeric_comparison_crosses_variants() {
        assert_eq!(
            MetaValue::Int(2).sort_cmp(&MetaValue::Float(2.5)),
            Ordering::Less
        );
        assert_eq!(
            MetaValue::Float(3.0).sort_cmp(&MetaValue::Int(2)),
            Ordering::Greater
        );
    }

    #[test]
    fn untagged_serde_round_trip() {
        let values = vec![
            MetaValue::Bool(false),
            MetaValue::Int(7),
            MetaValue::Str("hello".to_string()),
            MetaValue::List(vec!["x".to_string()]),
        ];
        let json = serde_json::to_string(&values).unwrap();
        let back: Vec<MetaValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
