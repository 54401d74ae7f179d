use sqlx::{MySqlPool, Row as _};

use acrud_core::Result;

use crate::db_err;

pub struct RawMySqlColumn {
    pub table: String,
    pub name: String,
    pub ordinal: i64,
    pub data_type: String,
    pub column_type: String,
    pub is_nullable: String,
    pub default: Option<String>,
    pub character_max_length: Option<i64>,
    pub numeric_precision: Option<i64>,
    pub numeric_scale: Option<i64>,
    pub column_key: String,
    pub comment: String,
}

pub struct RawMySqlForeignKey {
    pub table: String,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

pub async fn list_tables(pool: &MySqlPool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT t.TABLE_NAME AS table_name \
         FROM information_schema.tables t \
         WHERE t.table_schema = DATABASE() AND t.table_type = 'BASE TABLE' \
         ORDER BY t.table_name",
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    rows.into_iter()
        .map(|row| row.try_get::<String, _>("table_name").map_err(db_err))
        .collect()
}

pub async fn list_columns(pool: &MySqlPool) -> Result<Vec<RawMySqlColumn>> {
    let rows = sqlx::query(
        "SELECT \
           c.TABLE_NAME AS table_name, \
           c.COLUMN_NAME AS column_name, \
           CAST(c.ORDINAL_POSITION AS SIGNED) AS ordinal_position, \
           LOWER(c.DATA_TYPE) AS data_type, \
           LOWER(c.COLUMN_TYPE) AS column_type, \
           c.IS_NULLABLE AS is_nullable, \
           c.COLUMN_DEFAULT AS column_default, \
           CAST(c.CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS character_max_length, \
           CAST(c.NUMERIC_PRECISION AS SIGNED) AS numeric_precision, \
           CAST(c.NUMERIC_SCALE AS SIGNED) AS numeric_scale, \
           c.COLUMN_KEY AS column_key, \
           c.COLUMN_COMMENT AS column_comment \
         FROM information_schema.columns c \
         WHERE c.table_schema = DATABASE() \
         ORDER BY c.table_name, c.ordinal_position",
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    rows.into_iter()
        .map(|row| {
            Ok(RawMySqlColumn {
                table: row.try_get("table_name").map_err(db_err)?,
                name: row.try_get("column_name").map_err(db_err)?,
                ordinal: row.try_get("ordinal_position").map_err(db_err)?,
                data_type: row.try_get("data_type").map_err(db_err)?,
                column_type: row.try_get("column_type").map_err(db_err)?,
                is_nullable: row.try_get("is_nullable").map_err(db_err)?,
                default: row.try_get("column_default").map_err(db_err)?,
                character_max_length: row.try_get("character_max_length").map_err(db_err)?,
                numeric_precision: row.try_get("numeric_precision").map_err(db_err)?,
                numeric_scale: row.try_get("numeric_scale").map_err(db_err)?,
                column_key: row.try_get("column_key").map_err(db_err)?,
                comment: row.try_get("column_comment").map_err(db_err)?,
            })
        })
        .collect()
}

pub async fn list_foreign_keys(pool: &MySqlPool) -> Result<Vec<RawMySqlForeignKey>> {
    let rows = sqlx::query(
        "SELECT \
           k.TABLE_NAME AS table_name, \
           k.COLUMN_NAME AS column_name, \
           k.REFERENCED_TABLE_NAME AS referenced_table, \
           k.REFERENCED_COLUMN_NAME AS referenced_column \
         FROM information_schema.key_column_usage k \
         WHERE k.table_schema = DATABASE() AND k.referenced_table_name IS NOT NULL \
         ORDER BY k.table_name, k.ordinal_position",
    )
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    rows.into_iter()
        .map(|row| {
            Ok(RawMySqlForeignKey {
                table: row.try_get("table_name").map_err(db_err)?,
                column: row.try_get("column_name").map_err(db_err)?,
                referenced_table: row.try_get("referenced_table").map_err(db_err)?,
                referenced_column: row.try_get("referenced_column").map_err(db_err)?,
            })
        })
        .collect()
}
