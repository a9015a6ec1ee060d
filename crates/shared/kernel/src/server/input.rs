//! Lenient readers for loosely typed JSON fields.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A JSON number, or a string holding one.
///
/// Forms often post `"2019"` where `2019` is meant; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumberLike {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberLike {
    /// Whole numbers in `i64` range only; `12.0` counts, `12.5` and `1e30` do not.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn as_i64(&self) -> Option<i64> {
        // 2^63 itself is out of range, hence the strict upper bound.
        const UPPER: f64 = i64::MAX as f64;
        const LOWER: f64 = i64::MIN as f64;
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) if value.fract() == 0.0 && (LOWER..UPPER).contains(value) => Some(*value as i64),
            Self::Float(_) => None,
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl From<i64> for NumberLike {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Trims `value`; blank strings count as absent.
#[must_use]
pub fn trimmed(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(ToOwned::to_owned)
}
/// `%term%` for `LIKE ?1 ESCAPE '\'`, with the wildcard characters escaped.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        let year: NumberLike = serde_json::from_str("\" 2019 \"").expect("text");
        assert_eq!(year.as_i64(), Some(2019));
        let price: NumberLike = serde_json::from_str("12.5").expect("float");
        assert_eq!(price.as_f64(), Some(12.5));
        assert_eq!(price.as_i64(), None);
        assert_eq!(NumberLike::from(7).as_f64(), Some(7.0));
    }

    #[test]
    fn floats_outside_i64_are_not_integers() {
        assert_eq!(NumberLike::Float(1e30).as_i64(), None);
        assert_eq!(NumberLike::Float(-1e30).as_i64(), None);
        assert_eq!(NumberLike::Float(9_223_372_036_854_775_808.0).as_i64(), None);
        assert_eq!(NumberLike::Float(f64::INFINITY).as_i64(), None);
        assert_eq!(NumberLike::Float(-9_223_372_036_854_775_808.0).as_i64(), Some(i64::MIN));
        assert_eq!(NumberLike::Float(40.0).as_i64(), Some(40));
    }

    #[test]
    fn garbage_is_not_a_number() {
        assert_eq!(NumberLike::Text("abc".into()).as_i64(), None);
        assert_eq!(NumberLike::Text("NaN".into()).as_f64(), None);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ABC"), "%ABC%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(trimmed(Some("  Ada ")), Some("Ada".to_owned()));
        assert_eq!(trimmed(Some("   ")), None);
        assert_eq!(trimmed(None), None);
    }
}
