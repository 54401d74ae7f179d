use async_trait::async_trait;
use sqlx::SqlitePool;

use acrud_core::Result;

use crate::catalog::{CatalogReader, ColumnRecord, ForeignKeyRecord};
use crate::engine::Engine;

mod mapper;
mod queries;

/// Catalog reader for SQLite, driven by `sqlite_master` and pragmas.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for SqliteCatalog {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        queries::list_tables(&self.pool).await
    }

    async fn read_columns(&self) -> Result<Vec<ColumnRecord>> {
        let mut records = Vec::new();

        for table in queries::list_tables(&self.pool).await? {
            let fields = queries::table_info(&self.pool, &table).await?;
            records.extend(mapper::map_columns(&table, fields));

            // Index metadata lives in separate catalog entries and is merged
            // in a second pass. Only the first column of a multi-column index
            // is marked.
            for index in queries::index_list(&self.pool, &table).await? {
                if index.origin == "pk" {
                    continue;
                }
                if let Some(column) = queries::first_index_column(&self.pool, &index.name).await? {
                    mapper::mark_index(&mut records, &table, &column, index.unique);
                }
            }
        }

        Ok(records)
    }

    async fn read_foreign_keys(&self) -> Result<Vec<ForeignKeyRecord>> {
        let mut records = Vec::new();

        for table in queries::list_tables(&self.pool).await? {
            let keys = queries::foreign_key_list(&self.pool, &table).await?;
            records.extend(mapper::map_foreign_keys(&table, keys));
        }

        Ok(records)
    }
}
