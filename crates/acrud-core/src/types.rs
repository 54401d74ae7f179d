use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Normalized type class for a column, engine-agnostic.
///
/// Every engine-native type name maps to exactly one of these classes during
/// normalization; a native name with no mapping is a fatal error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TypeClass {
    Integer,
    Decimal,
    Boolean,
    Text,
    Datetime,
}

impl TypeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeClass::Integer => "integer",
            TypeClass::Decimal => "decimal",
            TypeClass::Boolean => "boolean",
            TypeClass::Text => "text",
            TypeClass::Datetime => "datetime",
        }
    }
}
