//! The value model: everything that can live under a key.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A storable value. Mirrors what a JSON document can hold, minus `null`.
///
/// Integers and doubles are kept apart so a stored `3` reads back as an
/// integer and a stored `3.0` as a double.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// `true` / `false`.
    Bool(bool),
    /// Any JSON number without a fractional part that fits in 64 bits.
    Int(i64),
    /// Any other JSON number.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence, elements may be of mixed kinds.
    Array(Vec<Value>),
    /// String-keyed mapping. Ordering is not part of the contract.
    Map(BTreeMap<String, Value>),
}

/// Discriminant of a [`Value`], used in type-mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Double`]
    Double,
    /// [`Value::String`]
    String,
    /// [`Value::Array`]
    Array,
    /// [`Value::Map`]
    Map,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Which variant this is.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Borrow the string, if this is one. Numbers and booleans are not
    /// stringified.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean, if this is one. Strings like `"true"` don't count.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view. A double qualifies only when it is whole and in range
    /// (`4.0` yes, `4.5` no).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Double(d)
                if d.fract() == 0.0 && *d >= i64::MIN as f64 && *d < i64::MAX as f64 =>
            {
                Some(*d as i64)
            }
            _ => None,
        }
    }

    /// Floating-point view. Integers widen.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Borrow the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the entries, if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// `false` if this value, or anything nested in it, is a NaN or infinite
    /// double.
    pub(crate) fn is_representable(&self) -> bool {
        match self {
            Value::Double(d) => d.is_finite(),
            Value::Array(items) => items.iter().all(Value::is_representable),
            Value::Map(entries) => entries.values().all(Value::is_representable),
            _ => true,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::Array(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(v: HashMap<String, T>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Value::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_decode_as_int() {
        let v: Value = serde_json::from_str("42").unwrap();
        assert_eq!(v, Value::Int(42));
        let v: Value = serde_json::from_str("42.5").unwrap();
        assert_eq!(v, Value::Double(42.5));
    }

    #[test]
    fn double_survives_as_double() {
        let text = serde_json::to_string(&Value::Double(2.0)).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, Value::Double(2.0));
    }

    #[test]
    fn null_is_not_a_value() {
        assert!(serde_json::from_str::<Value>("null").is_err());
        assert!(serde_json::from_str::<Value>("[1, null]").is_err());
    }

    #[test]
    fn nested_mixed_structure_decodes() {
        let v: Value =
            serde_json::from_str(r#"{"list":[1,"two",true,{"deep":[2.5]}],"n":-7}"#).unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(map["n"], Value::Int(-7));
        let list = map["list"].as_array().unwrap();
        assert_eq!(list[1], Value::from("two"));
        assert_eq!(list[2], Value::Bool(true));
        let deep = list[3].as_map().unwrap()["deep"].as_array().unwrap();
        assert_eq!(deep, &[Value::Double(2.5)]);
    }

    #[test]
    fn integer_view_accepts_whole_doubles_only() {
        assert_eq!(Value::Double(4.0).as_i64(), Some(4));
        assert_eq!(Value::Double(4.5).as_i64(), None);
        assert_eq!(Value::Double(f64::MAX).as_i64(), None);
        assert_eq!(Value::from("4").as_i64(), None);
    }

    #[test]
    fn double_view_widens_ints() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Bool(true).as_f64(), None);
    }

    #[test]
    fn representable_checks_nested_doubles() {
        assert!(Value::from(vec![1.0, 2.0]).is_representable());
        assert!(!Value::from(vec![1.0, f64::NAN]).is_representable());
        let mut m = HashMap::new();
        m.insert("inf".to_string(), f64::INFINITY);
        assert!(!Value::from(m).is_representable());
    }

    #[test]
    fn conversions_from_rust_types() {
        assert_eq!(Value::from(7), Value::Int(7));
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(
            Value::from(vec![10, 20]),
            Value::Array(vec![Value::Int(10), Value::Int(20)])
        );
        let collected: Value = ["a", "b"].into_iter().collect();
        assert_eq!(collected.as_array().map(<[Value]>::len), Some(2));
    }
}
