use serde::Serialize;

use acrud_core::{Error, Result, Row, Schema, is_empty_value};

use crate::engine::Engine;
use crate::executor::{Executor, SqlValue};

/// Outcome of a save: the new identifier on insert, the affected row count
/// on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Inserted(i64),
    Updated(u64),
}

/// Insert or update a row, deciding by the presence of a primary-key value.
///
/// A non-empty primary-key value is removed from the payload and keys an
/// update; otherwise the row is inserted and the engine-assigned identifier
/// returned. Assumes the caller has already validated: this is a mechanical
/// dispatch, not a second validation pass.
pub async fn save_row(
    executor: &dyn Executor,
    engine: Engine,
    schema: &Schema,
    table: &str,
    data: &Row,
) -> Result<SaveOutcome> {
    let table_schema = schema
        .table(table)
        .ok_or_else(|| Error::UnknownTable(table.to_string()))?;

    let primary = table_schema.primary_key();
    let id = primary
        .and_then(|pk| data.get(pk.name.as_str()))
        .filter(|value| !is_empty_value(Some(value)));

    match (primary, id) {
        (Some(pk), Some(id)) => {
            let fields: Vec<(&String, &serde_json::Value)> = data
                .iter()
                .filter(|(name, _)| *name != &pk.name)
                .collect();

            if fields.is_empty() {
                return Ok(SaveOutcome::Updated(0));
            }

            let assignments: Vec<String> = fields
                .iter()
                .map(|(name, _)| format!("{} = ?", engine.quote(name)))
                .collect();
            let sql = format!(
                "UPDATE {} SET {} WHERE {} = ?",
                engine.quote(table),
                assignments.join(", "),
                engine.quote(&pk.name)
            );

            let mut params: Vec<SqlValue> = fields
                .iter()
                .map(|(_, value)| SqlValue::from_json(value))
                .collect();
            params.push(SqlValue::from_json(id));

            Ok(SaveOutcome::Updated(executor.execute(&sql, &params).await?))
        }
        _ => {
            if data.is_empty() {
                let sql = match engine {
                    Engine::MySql => format!("INSERT INTO {} () VALUES ()", engine.quote(table)),
                    Engine::Sqlite => {
                        format!("INSERT INTO {} DEFAULT VALUES", engine.quote(table))
                    }
                };
                return Ok(SaveOutcome::Inserted(executor.insert(&sql, &[]).await?));
            }

            let columns: Vec<String> = data.keys().map(|name| engine.quote(name)).collect();
            let placeholders: Vec<&str> = data.keys().map(|_| "?").collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                engine.quote(table),
                columns.join(", "),
                placeholders.join(", ")
            );

            let params: Vec<SqlValue> = data.values().map(SqlValue::from_json).collect();

            Ok(SaveOutcome::Inserted(executor.insert(&sql, &params).await?))
        }
    }
}
