use async_trait::async_trait;
use sqlx::MySqlPool;

use acrud_core::Result;

use crate::catalog::{CatalogReader, ColumnRecord, ForeignKeyRecord};
use crate::engine::Engine;

mod mapper;
mod queries;

/// Catalog reader for MySQL, driven by `information_schema`.
#[derive(Debug, Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for MySqlCatalog {
    fn engine(&self) -> Engine {
        Engine::MySql
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        queries::list_tables(&self.pool).await
    }

    async fn read_columns(&self) -> Result<Vec<ColumnRecord>> {
        let raw = queries::list_columns(&self.pool).await?;
        Ok(mapper::map_columns(raw))
    }

    async fn read_foreign_keys(&self) -> Result<Vec<ForeignKeyRecord>> {
        let raw = queries::list_foreign_keys(&self.pool).await?;
        Ok(mapper::map_foreign_keys(raw))
    }
}
