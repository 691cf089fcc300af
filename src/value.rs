//! Stored values and their conversions to and from Rust types
//!
//! The store is dynamically typed: every leaf holds a [`RegValue`]. Reading
//! a leaf into a static type goes through [`FromRegValue`], which either
//! accepts the stored representation or hands it back so the caller can
//! report a [`Error::TypeMismatch`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A value as held by the hierarchical store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RegValue {
    /// Typeless value; reads treat it like an absent leaf
    None,
    Dword(u32),
    Qword(u64),
    String(String),
    Binary(Vec<u8>),
    MultiString(Vec<String>),
}

impl RegValue {
    /// Stable name of the stored representation, used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RegValue::None => "none",
            RegValue::Dword(_) => "dword",
            RegValue::Qword(_) => "qword",
            RegValue::String(_) => "string",
            RegValue::Binary(_) => "binary",
            RegValue::MultiString(_) => "multi_string",
        }
    }

    /// Whether this value should be treated as "no value"
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, RegValue::None)
    }
}

/// Conversion from a stored value into a Rust type
pub trait FromRegValue: Sized {
    /// Representation name reported when the conversion fails
    const EXPECTED: &'static str;

    /// Convert, returning the untouched value when it is not compatible
    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue>;
}

/// Conversion from a Rust type into a stored value
pub trait IntoRegValue {
    fn into_reg_value(self) -> RegValue;
}

/// Coerce `value` (stored under `key`) into `T`
pub(crate) fn coerce<T: FromRegValue>(key: &str, value: RegValue) -> Result<T> {
    T::from_reg_value(value).map_err(|value| Error::TypeMismatch {
        key: key.to_string(),
        expected: T::EXPECTED.to_string(),
        actual: value.kind().to_string(),
    })
}

impl FromRegValue for RegValue {
    const EXPECTED: &'static str = "any";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        Ok(value)
    }
}

impl IntoRegValue for RegValue {
    fn into_reg_value(self) -> RegValue {
        self
    }
}

impl FromRegValue for u32 {
    const EXPECTED: &'static str = "dword";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        match value {
            RegValue::Dword(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FromRegValue for i32 {
    const EXPECTED: &'static str = "dword";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        // DWORDs are raw 32-bit words; signed reads reinterpret the bits
        match value {
            RegValue::Dword(v) => Ok(v as i32),
            other => Err(other),
        }
    }
}

impl FromRegValue for u64 {
    const EXPECTED: &'static str = "qword";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        match value {
            RegValue::Qword(v) => Ok(v),
            RegValue::Dword(v) => Ok(u64::from(v)),
            other => Err(other),
        }
    }
}

impl FromRegValue for i64 {
    const EXPECTED: &'static str = "qword";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        match value {
            RegValue::Qword(v) => Ok(v as i64),
            RegValue::Dword(v) => Ok(i64::from(v as i32)),
            other => Err(other),
        }
    }
}

impl FromRegValue for bool {
    const EXPECTED: &'static str = "dword (0 or 1)";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        match value {
            RegValue::Dword(0) => Ok(false),
            RegValue::Dword(1) => Ok(true),
            other => Err(other),
        }
    }
}

impl FromRegValue for String {
    const EXPECTED: &'static str = "string";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        match value {
            RegValue::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromRegValue for Vec<u8> {
    const EXPECTED: &'static str = "binary";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        match value {
            RegValue::Binary(bytes) => Ok(bytes),
            other => Err(other),
        }
    }
}

impl FromRegValue for Vec<String> {
    const EXPECTED: &'static str = "multi_string";

    fn from_reg_value(value: RegValue) -> std::result::Result<Self, RegValue> {
        match value {
            RegValue::MultiString(items) => Ok(items),
            other => Err(other),
        }
    }
}

impl IntoRegValue for u32 {
    fn into_reg_value(self) -> RegValue {
        RegValue::Dword(self)
    }
}

impl IntoRegValue for i32 {
    fn into_reg_value(self) -> RegValue {
        RegValue::Dword(self as u32)
    }
}

impl IntoRegValue for u64 {
    fn into_reg_value(self) -> RegValue {
        RegValue::Qword(self)
    }
}

impl IntoRegValue for i64 {
    fn into_reg_value(self) -> RegValue {
        RegValue::Qword(self as u64)
    }
}

impl IntoRegValue for bool {
    fn into_reg_value(self) -> RegValue {
        RegValue::Dword(u32::from(self))
    }
}

impl IntoRegValue for String {
    fn into_reg_value(self) -> RegValue {
        RegValue::String(self)
    }
}

impl IntoRegValue for &str {
    fn into_reg_value(self) -> RegValue {
        RegValue::String(self.to_string())
    }
}

impl IntoRegValue for Vec<u8> {
    fn into_reg_value(self) -> RegValue {
        RegValue::Binary(self)
    }
}

impl IntoRegValue for &[u8] {
    fn into_reg_value(self) -> RegValue {
        RegValue::Binary(self.to_vec())
    }
}

impl IntoRegValue for Vec<String> {
    fn into_reg_value(self) -> RegValue {
        RegValue::MultiString(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_dword_keeps_bits() {
        let stored = (-5i32).into_reg_value();
        assert_eq!(stored, RegValue::Dword(0xFFFF_FFFB));
        assert_eq!(coerce::<i32>("v", stored).unwrap(), -5);
    }

    #[test]
    fn test_dword_widens_to_qword_types() {
        assert_eq!(coerce::<u64>("v", RegValue::Dword(7)).unwrap(), 7);
        assert_eq!(coerce::<i64>("v", RegValue::Dword(0xFFFF_FFFF)).unwrap(), -1);
    }

    #[test]
    fn test_qword_does_not_narrow() {
        let err = coerce::<u32>("big", RegValue::Qword(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { ref key, ref actual, .. } if key == "big" && actual == "qword"
        ));
    }

    #[test]
    fn test_bool_accepts_only_zero_and_one() {
        assert!(coerce::<bool>("b", RegValue::Dword(1)).unwrap());
        assert!(!coerce::<bool>("b", RegValue::Dword(0)).unwrap());
        assert!(coerce::<bool>("b", RegValue::Dword(2)).is_err());
    }

    #[test]
    fn test_string_is_not_parsed_as_number() {
        let err = coerce::<i32>("n", RegValue::String("42".into())).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { ref expected, ref actual, .. }
                if expected == "dword" && actual == "string"
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(RegValue::MultiString(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(json, serde_json::json!({"type": "multi_string", "data": ["a", "b"]}));

        let none: RegValue = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert!(none.is_none());
    }
}
