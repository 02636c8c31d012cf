//! The dynamic value union exchanged with the host.

use crate::buffer::SharedBuffer;

/// A loosely-typed host value.
///
/// This is the closed union the bridge dispatches on: every host argument
/// and every result is one of these shapes, resolved once at the call
/// boundary.
///
/// `Undefined` is only ever a *result* ("no value present"); it is never a
/// valid input to `set`. `Array` is the host-object shape with no store
/// mapping: it appears in results (`getAllKeys`) but is rejected as a `set`
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum DynValue {
    /// No value present.
    Undefined,
    /// Boolean.
    Bool(bool),
    /// Double-precision number.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Binary payload with shared ownership.
    Buffer(SharedBuffer),
    /// Sequence of values.
    Array(Vec<DynValue>),
}

impl DynValue {
    /// Returns a short name for the value's shape, for diagnostics.
    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Buffer(_) => "buffer",
            Self::Array(_) => "array",
        }
    }

    /// Returns true if this is `Undefined`.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for DynValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for DynValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for DynValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DynValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<SharedBuffer> for DynValue {
    fn from(buffer: SharedBuffer) -> Self {
        Self::Buffer(buffer)
    }
}

impl From<Vec<u8>> for DynValue {
    fn from(data: Vec<u8>) -> Self {
        Self::Buffer(SharedBuffer::from_vec(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_names_cover_the_union() {
        assert_eq!(DynValue::Undefined.shape_name(), "undefined");
        assert_eq!(DynValue::Bool(true).shape_name(), "boolean");
        assert_eq!(DynValue::Number(1.0).shape_name(), "number");
        assert_eq!(DynValue::from("s").shape_name(), "string");
        assert_eq!(DynValue::from(vec![1u8]).shape_name(), "buffer");
        assert_eq!(DynValue::Array(Vec::new()).shape_name(), "array");
    }

    #[test]
    fn from_conversions() {
        assert_eq!(DynValue::from(true), DynValue::Bool(true));
        assert_eq!(DynValue::from(2.5), DynValue::Number(2.5));
        assert_eq!(DynValue::from("hi"), DynValue::String("hi".to_string()));
        assert_eq!(
            DynValue::from(vec![1u8, 2]),
            DynValue::Buffer(SharedBuffer::from_vec(vec![1, 2]))
        );
    }

    #[test]
    fn as_str_only_for_strings() {
        assert_eq!(DynValue::from("hi").as_str(), Some("hi"));
        assert_eq!(DynValue::Number(1.0).as_str(), None);
        assert_eq!(DynValue::Undefined.as_str(), None);
    }
}
