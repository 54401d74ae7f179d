//! Catalog readers, one per engine.
//!
//! Each reader issues the engine's metadata queries and converts the raw
//! catalog rows into the engine-agnostic records consumed by the normalizer.
//! Engine-native row shapes never leave this module.

pub mod mysql;
pub mod sqlite;

use async_trait::async_trait;

use acrud_core::Result;

use crate::engine::Engine;
use crate::executor::Pool;

pub use mysql::MySqlCatalog;
pub use sqlite::SqliteCatalog;

/// One raw column after engine-specific decoding.
///
/// `native_type` is the engine-reported type name the normalizer maps to a
/// type class; everything else is already engine-independent.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRecord {
    pub table: String,
    pub name: String,
    pub ordinal: i32,
    pub native_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub primary: bool,
    pub unique: bool,
    pub index: bool,
    pub comment: Option<String>,
}

/// One raw foreign-key constraint naming its target.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyRecord {
    pub table: String,
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

/// Trait implemented by engine-specific catalog readers.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    fn engine(&self) -> Engine;

    /// Names of user tables in the target database.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// All column records across user tables, in catalog ordinal order.
    async fn read_columns(&self) -> Result<Vec<ColumnRecord>>;

    /// All foreign-key constraints across user tables.
    async fn read_foreign_keys(&self) -> Result<Vec<ForeignKeyRecord>>;
}

/// Pick the catalog reader matching the pool's engine.
pub fn reader(pool: &Pool) -> Box<dyn CatalogReader> {
    match pool {
        Pool::MySql(pool) => Box::new(MySqlCatalog::new(pool.clone())),
        Pool::Sqlite(pool) => Box::new(SqliteCatalog::new(pool.clone())),
    }
}
