//! Core contracts and helpers for acrud.
//!
//! This crate defines the engine-independent column model, the validation
//! codes and pure validation checks shared by the database adapters and the
//! CLI. Everything that talks to a live database lives in `acrud-db`.

pub mod error;
pub mod row;
pub mod schema;
pub mod types;
pub mod validate;

pub use error::{Error, Result};
pub use row::{Row, is_empty_value, value_text};
pub use schema::{ColumnDescriptor, ForeignRef, Schema, TableSchema};
pub use types::TypeClass;
pub use validate::{
    ValidationCode, ValidationResult, exceeds_length, is_integer_text, unknown_columns,
};

/// Current schema contract version for serialized `Schema` artifacts.
pub const SCHEMA_VERSION: &str = "0.1";
