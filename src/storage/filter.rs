use crate::core::Document;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Predicate over stored documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// `field == value`
    Eq(String, JsonValue),
    /// `field IN values`
    In(String, Vec<JsonValue>),
    /// `field > value`; documents missing the field never match.
    Gt(String, JsonValue),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn any_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<JsonValue>,
    {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::Gt(field.into(), value.into())
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq(field, value) => document
                .get(field)
                .is_some_and(|actual| values_equal(actual, value)),
            Self::In(field, values) => document
                .get(field)
                .is_some_and(|actual| values.iter().any(|v| values_equal(actual, v))),
            Self::Gt(field, bound) => document
                .get(field)
                .and_then(|actual| compare_values(actual, bound))
                .is_some_and(|ord| ord == Ordering::Greater),
            Self::And(filters) => filters.iter().all(|f| f.matches(document)),
        }
    }

    /// The primary-key value when the filter is an equality on `key_field`.
    pub(crate) fn key_equality(&self, key_field: &str) -> Option<&JsonValue> {
        match self {
            Self::Eq(field, value) if field == key_field => Some(value),
            _ => None,
        }
    }
}

/// Equality with integer/float coercion; other types compare structurally.
pub fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_f64(), y.as_f64()) {
                (Some(fx), Some(fy)) => fx == fy,
                _ => x == y,
            },
        },
        _ => a == b,
    }
}

/// Ordering between two scalar values of compatible types.
///
/// Null sorts before everything else. Returns `None` for incompatible types,
/// for lists and for objects.
pub fn compare_values(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Null, JsonValue::Null) => Some(Ordering::Equal),
        (JsonValue::Null, _) => Some(Ordering::Less),
        (_, JsonValue::Null) => Some(Ordering::Greater),

        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),

        (JsonValue::Number(x), JsonValue::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return Some(x.cmp(&y));
            }
            let (x, y) = (x.as_f64()?, y.as_f64()?);
            match (x.is_nan(), y.is_nan()) {
                (true, true) => Some(Ordering::Equal),
                (true, false) => Some(Ordering::Greater),
                (false, true) => Some(Ordering::Less),
                (false, false) => x.partial_cmp(&y),
            }
        }

        _ => None,
    }
}

/// Sort key comparison for documents; a missing field sorts like null.
pub(crate) fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    let null = JsonValue::Null;
    let left = a.get(field).unwrap_or(&null);
    let right = b.get(field).unwrap_or(&null);
    compare_values(left, right).unwrap_or(Ordering::Equal)
}
