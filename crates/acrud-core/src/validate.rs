use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::row::{Row, value_text};
use crate::schema::TableSchema;

/// Short symbolic reason a field failed validation.
///
/// Serialized as the bare code string; callback hooks may contribute codes
/// outside the built-in set, carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    /// The submitted key names no column of the table.
    Nonexistent,
    /// A supplied primary-key value matches no existing row.
    Missing,
    /// A required column was omitted or supplied empty.
    Empty,
    /// The referenced row does not exist in the foreign table.
    ForeignKey,
    /// The value is not a plain run of decimal digits.
    Integer,
    /// The value exceeds the column's character bound.
    Length,
    /// A code returned verbatim by a callback hook.
    Custom(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            ValidationCode::Nonexistent => "nonexistent",
            ValidationCode::Missing => "missing",
            ValidationCode::Empty => "empty",
            ValidationCode::ForeignKey => "foreign_key",
            ValidationCode::Integer => "integer",
            ValidationCode::Length => "length",
            ValidationCode::Custom(code) => code,
        }
    }

    /// Parse a code string, mapping known codes to their variants.
    pub fn from_code(code: &str) -> ValidationCode {
        match code {
            "nonexistent" => ValidationCode::Nonexistent,
            "missing" => ValidationCode::Missing,
            "empty" => ValidationCode::Empty,
            "foreign_key" => ValidationCode::ForeignKey,
            "integer" => ValidationCode::Integer,
            "length" => ValidationCode::Length,
            other => ValidationCode::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ValidationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValidationCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        if code.is_empty() {
            return Err(D::Error::custom("validation code must not be empty"));
        }
        Ok(ValidationCode::from_code(&code))
    }
}

/// Field-level validation outcome; an empty mapping means the row is valid.
pub type ValidationResult = BTreeMap<String, ValidationCode>;

/// Keys in `data` that name no column of the table, each mapped to
/// `nonexistent`.
///
/// A nonempty result is a fail-fast: unknown columns indicate a caller/schema
/// mismatch, so no other checks should run.
pub fn unknown_columns(table: &TableSchema, data: &Row) -> ValidationResult {
    data.keys()
        .filter(|key| !table.contains(key))
        .map(|key| (key.clone(), ValidationCode::Nonexistent))
        .collect()
}

/// Whether a value is a plain run of decimal digits.
///
/// No sign, no decimal point, no surrounding whitespace; this is what an
/// integer column will accept verbatim.
pub fn is_integer_text(value: &Value) -> bool {
    let text = value_text(value);
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

/// Whether a value's character count exceeds the given bound.
pub fn exceeds_length(value: &Value, bound: i64) -> bool {
    value_text(value).chars().count() as i64 > bound
}
