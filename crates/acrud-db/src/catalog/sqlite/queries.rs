use sqlx::{Row as _, SqlitePool};

use acrud_core::Result;

use crate::db_err;
use crate::engine::Engine;

pub struct RawSqliteColumn {
    pub cid: i64,
    pub name: String,
    pub declared_type: String,
    pub notnull: i64,
    pub default: Option<String>,
    pub pk: i64,
}

pub struct RawSqliteForeignKey {
    pub from: String,
    pub table: String,
    pub to: Option<String>,
}

pub struct RawSqliteIndex {
    pub name: String,
    pub unique: bool,
    pub origin: String,
}

pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    rows.into_iter()
        .map(|row| row.try_get::<String, _>("name").map_err(db_err))
        .collect()
}

pub async fn table_info(pool: &SqlitePool, table: &str) -> Result<Vec<RawSqliteColumn>> {
    // Pragmas take no bind parameters; the table name came from the catalog.
    let sql = format!("PRAGMA table_info({})", Engine::Sqlite.quote(table));
    let rows = sqlx::query(&sql).fetch_all(pool).await.map_err(db_err)?;

    rows.into_iter()
        .map(|row| {
            Ok(RawSqliteColumn {
                cid: row.try_get("cid").map_err(db_err)?,
                name: row.try_get("name").map_err(db_err)?,
                declared_type: row.try_get("type").map_err(db_err)?,
                notnull: row.try_get("notnull").map_err(db_err)?,
                default: row.try_get("dflt_value").map_err(db_err)?,
                pk: row.try_get("pk").map_err(db_err)?,
            })
        })
        .collect()
}

pub async fn foreign_key_list(
    pool: &SqlitePool,
    table: &str,
) -> Result<Vec<RawSqliteForeignKey>> {
    let sql = format!("PRAGMA foreign_key_list({})", Engine::Sqlite.quote(table));
    let rows = sqlx::query(&sql).fetch_all(pool).await.map_err(db_err)?;

    rows.into_iter()
        .map(|row| {
            Ok(RawSqliteForeignKey {
                from: row.try_get("from").map_err(db_err)?,
                table: row.try_get("table").map_err(db_err)?,
                to: row.try_get("to").map_err(db_err)?,
            })
        })
        .collect()
}

pub async fn index_list(pool: &SqlitePool, table: &str) -> Result<Vec<RawSqliteIndex>> {
    let sql = format!("PRAGMA index_list({})", Engine::Sqlite.quote(table));
    let rows = sqlx::query(&sql).fetch_all(pool).await.map_err(db_err)?;

    rows.into_iter()
        .map(|row| {
            Ok(RawSqliteIndex {
                name: row.try_get("name").map_err(db_err)?,
                unique: row.try_get::<i64, _>("unique").map_err(db_err)? != 0,
                origin: row.try_get("origin").map_err(db_err)?,
            })
        })
        .collect()
}

/// Name of the first column covered by an index, when it is a plain column.
pub async fn first_index_column(pool: &SqlitePool, index: &str) -> Result<Option<String>> {
    let sql = format!("PRAGMA index_info({})", Engine::Sqlite.quote(index));
    let rows = sqlx::query(&sql).fetch_all(pool).await.map_err(db_err)?;

    match rows.first() {
        Some(row) => row.try_get::<Option<String>, _>("name").map_err(db_err),
        None => Ok(None),
    }
}
