use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{MySqlPool, Row as _, SqlitePool};

use acrud_core::Result;

use crate::db_err;

/// A parameter or scalar result value for raw queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Convert a submitted JSON value into a bindable parameter.
    ///
    /// Arrays and objects are bound as their JSON text.
    pub fn from_json(value: &Value) -> SqlValue {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(flag) => SqlValue::Bool(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => SqlValue::Int(int),
                None => SqlValue::Float(number.as_f64().unwrap_or_default()),
            },
            Value::String(text) => SqlValue::Text(text.clone()),
            other => SqlValue::Text(other.to_string()),
        }
    }
}

/// Raw-query collaborator used for existence checks and writes.
///
/// The validator and save orchestrator depend on this trait rather than on a
/// concrete pool, so pure-validation callers can stub it out.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Fetch the first column of the first row, or `None` when no row matches.
    async fn fetch_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<Option<SqlValue>>;

    /// Run a statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64>;

    /// Run an insert and return the engine-assigned row identifier.
    async fn insert(&self, sql: &str, params: &[SqlValue]) -> Result<i64>;
}

/// Driver pool for one logical connection.
#[derive(Debug, Clone)]
pub enum Pool {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

fn bind_mysql<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &[SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Bool(flag) => query.bind(*flag),
            SqlValue::Int(int) => query.bind(*int),
            SqlValue::Float(float) => query.bind(*float),
            SqlValue::Text(text) => query.bind(text.clone()),
        };
    }
    query
}

fn bind_sqlite<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Bool(flag) => query.bind(*flag),
            SqlValue::Int(int) => query.bind(*int),
            SqlValue::Float(float) => query.bind(*float),
            SqlValue::Text(text) => query.bind(text.clone()),
        };
    }
    query
}

fn scalar_from_mysql(row: &MySqlRow) -> SqlValue {
    if let Ok(value) = row.try_get::<Option<i64>, _>(0) {
        return value.map(SqlValue::Int).unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(0) {
        return value.map(SqlValue::Float).unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(0) {
        return value.map(SqlValue::Bool).unwrap_or(SqlValue::Null);
    }
    match row.try_get::<Option<String>, _>(0) {
        Ok(value) => value.map(SqlValue::Text).unwrap_or(SqlValue::Null),
        Err(_) => SqlValue::Null,
    }
}

fn scalar_from_sqlite(row: &SqliteRow) -> SqlValue {
    if let Ok(value) = row.try_get::<Option<i64>, _>(0) {
        return value.map(SqlValue::Int).unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(0) {
        return value.map(SqlValue::Float).unwrap_or(SqlValue::Null);
    }
    match row.try_get::<Option<String>, _>(0) {
        Ok(value) => value.map(SqlValue::Text).unwrap_or(SqlValue::Null),
        Err(_) => SqlValue::Null,
    }
}

#[async_trait]
impl Executor for Pool {
    async fn fetch_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<Option<SqlValue>> {
        match self {
            Pool::MySql(pool) => {
                let row = bind_mysql(sqlx::query(sql), params)
                    .fetch_optional(pool)
                    .await
                    .map_err(db_err)?;
                Ok(row.as_ref().map(scalar_from_mysql))
            }
            Pool::Sqlite(pool) => {
                let row = bind_sqlite(sqlx::query(sql), params)
                    .fetch_optional(pool)
                    .await
                    .map_err(db_err)?;
                Ok(row.as_ref().map(scalar_from_sqlite))
            }
        }
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        match self {
            Pool::MySql(pool) => {
                let result = bind_mysql(sqlx::query(sql), params)
                    .execute(pool)
                    .await
                    .map_err(db_err)?;
                Ok(result.rows_affected())
            }
            Pool::Sqlite(pool) => {
                let result = bind_sqlite(sqlx::query(sql), params)
                    .execute(pool)
                    .await
                    .map_err(db_err)?;
                Ok(result.rows_affected())
            }
        }
    }

    async fn insert(&self, sql: &str, params: &[SqlValue]) -> Result<i64> {
        match self {
            Pool::MySql(pool) => {
                let result = bind_mysql(sqlx::query(sql), params)
                    .execute(pool)
                    .await
                    .map_err(db_err)?;
                Ok(result.last_insert_id() as i64)
            }
            Pool::Sqlite(pool) => {
                let result = bind_sqlite(sqlx::query(sql), params)
                    .execute(pool)
                    .await
                    .map_err(db_err)?;
                Ok(result.last_insert_rowid())
            }
        }
    }
}
