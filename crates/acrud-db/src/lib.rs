//! Database adapters for acrud.
//!
//! One logical connection is represented by an [`Instance`], which owns a
//! driver pool, a lazily built normalized [`Schema`](acrud_core::Schema), and
//! a callback registry. Catalog readers turn engine metadata into
//! engine-agnostic records; the normalizer turns those into the schema the
//! validator and save orchestrator work against.

pub mod callbacks;
pub mod catalog;
pub mod engine;
pub mod executor;
pub mod instance;
pub mod normalize;
pub mod save;
pub mod validator;

pub use callbacks::{CallbackRegistry, FieldHook, TableHook};
pub use catalog::{CatalogReader, ColumnRecord, ForeignKeyRecord};
pub use engine::Engine;
pub use executor::{Executor, Pool, SqlValue};
pub use instance::Instance;
pub use normalize::normalize;
pub use save::{SaveOutcome, save_row};
pub use validator::validate_row;

pub use acrud_core::{Error, Result, Row, Schema, ValidationCode, ValidationResult};

/// Map a driver error into the shared error type, preserving the message.
pub(crate) fn db_err(err: sqlx::Error) -> acrud_core::Error {
    acrud_core::Error::Db(err.to_string())
}
