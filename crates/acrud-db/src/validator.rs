use acrud_core::{
    Error, Result, Row, Schema, TypeClass, ValidationCode, ValidationResult, exceeds_length,
    is_empty_value, is_integer_text, unknown_columns,
};

use crate::callbacks::CallbackRegistry;
use crate::engine::Engine;
use crate::executor::{Executor, SqlValue};

/// SQL for a single-row existence probe against one column.
pub(crate) fn exists_sql(engine: Engine, table: &str, column: &str) -> String {
    format!(
        "SELECT 1 FROM {} WHERE {} = ? LIMIT 1",
        engine.quote(table),
        engine.quote(column)
    )
}

async fn row_exists(
    executor: &dyn Executor,
    engine: Engine,
    table: &str,
    column: &str,
    value: &serde_json::Value,
) -> Result<bool> {
    let scalar = executor
        .fetch_scalar(
            &exists_sql(engine, table, column),
            &[SqlValue::from_json(value)],
        )
        .await?;
    Ok(scalar.is_some())
}

/// Check a candidate row against a table's normalized column model.
///
/// Returns field-level error codes as data; an empty result means the row is
/// valid. Database errors from the existence probes propagate unmodified —
/// masking a connectivity fault as a data error would be incorrect. Neither
/// `data` nor the schema is mutated.
pub async fn validate_row(
    executor: &dyn Executor,
    engine: Engine,
    schema: &Schema,
    callbacks: &CallbackRegistry,
    table: &str,
    data: &Row,
) -> Result<ValidationResult> {
    let table_schema = schema
        .table(table)
        .ok_or_else(|| Error::UnknownTable(table.to_string()))?;

    // Unknown columns mean a caller/schema mismatch; report only those.
    let unknown = unknown_columns(table_schema, data);
    if !unknown.is_empty() {
        return Ok(unknown);
    }

    let mut errors = ValidationResult::new();

    for column in &table_schema.columns {
        let supplied = data
            .get(column.name.as_str())
            .filter(|value| !is_empty_value(Some(value)));

        // A supplied primary-key value signals an update; the referenced row
        // must exist. Primary columns are exempt from all other checks.
        if column.primary {
            if let Some(value) = supplied
                && !row_exists(executor, engine, table, &column.name, value).await?
            {
                errors.insert(column.name.clone(), ValidationCode::Missing);
            }
            continue;
        }

        let Some(value) = supplied else {
            if column.default.is_none() && !column.nullable {
                errors.insert(column.name.clone(), ValidationCode::Empty);
            }
            continue;
        };

        if let Some(foreign) = &column.foreign
            && !row_exists(executor, engine, &foreign.table, &foreign.column, value).await?
        {
            errors.insert(column.name.clone(), ValidationCode::ForeignKey);
            continue;
        }

        if column.type_class == TypeClass::Integer && !is_integer_text(value) {
            errors.insert(column.name.clone(), ValidationCode::Integer);
            continue;
        }

        if column.type_class == TypeClass::Text
            && let Some(bound) = column.length
            && exceeds_length(value, bound)
        {
            errors.insert(column.name.clone(), ValidationCode::Length);
            continue;
        }

        if let Some(hook) = callbacks.field(&format!("{table}.{}", column.name))
            && let Some(code) = hook.check(value, data)
            && !code.is_empty()
        {
            errors.insert(column.name.clone(), ValidationCode::from_code(&code));
        }
    }

    if errors.is_empty()
        && let Some(hook) = callbacks.table(table)
    {
        return Ok(hook
            .check(data)
            .into_iter()
            .map(|(field, code)| (field, ValidationCode::from_code(&code)))
            .collect());
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap, HashSet};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use acrud_core::{ColumnDescriptor, ForeignRef, SCHEMA_VERSION, Schema, TableSchema};

    use super::*;

    /// Offline stand-in for the raw-query collaborator: answers existence
    /// probes from a canned set keyed by (sql, rendered params).
    #[derive(Default)]
    struct StubExecutor {
        rows: HashSet<(String, String)>,
    }

    impl StubExecutor {
        fn with_row(mut self, sql: String, params: &[SqlValue]) -> Self {
            self.rows.insert((sql, format!("{params:?}")));
            self
        }
    }

    #[async_trait]
    impl Executor for StubExecutor {
        async fn fetch_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<Option<SqlValue>> {
            let key = (sql.to_string(), format!("{params:?}"));
            Ok(self.rows.contains(&key).then_some(SqlValue::Int(1)))
        }

        async fn execute(&self, _sql: &str, _params: &[SqlValue]) -> Result<u64> {
            Ok(0)
        }

        async fn insert(&self, _sql: &str, _params: &[SqlValue]) -> Result<i64> {
            Ok(0)
        }
    }

    fn column(ordinal: i32, name: &str, type_class: TypeClass) -> ColumnDescriptor {
        ColumnDescriptor {
            ordinal,
            name: name.to_string(),
            type_class,
            nullable: false,
            default: None,
            length: None,
            precision: None,
            scale: None,
            primary: false,
            unique: false,
            index: false,
            foreign: None,
            comment: None,
        }
    }

    /// orders(id pk, customer_id -> customers.id, total decimal not null,
    /// qty nullable integer, note nullable text(10)) plus customers(id pk).
    fn fixture_schema() -> Schema {
        let mut orders = TableSchema::default();
        orders.columns.push(ColumnDescriptor {
            primary: true,
            ..column(1, "id", TypeClass::Integer)
        });
        orders.columns.push(ColumnDescriptor {
            foreign: Some(ForeignRef {
                table: "customers".to_string(),
                column: "id".to_string(),
            }),
            ..column(2, "customer_id", TypeClass::Integer)
        });
        orders.columns.push(column(3, "total", TypeClass::Decimal));
        orders.columns.push(ColumnDescriptor {
            nullable: true,
            ..column(4, "qty", TypeClass::Integer)
        });
        orders.columns.push(ColumnDescriptor {
            nullable: true,
            length: Some(10),
            ..column(5, "note", TypeClass::Text)
        });

        let mut customers = TableSchema::default();
        customers.columns.push(ColumnDescriptor {
            primary: true,
            ..column(1, "id", TypeClass::Integer)
        });

        let mut tables = BTreeMap::new();
        tables.insert("orders".to_string(), orders);
        tables.insert("customers".to_string(), customers);

        Schema {
            schema_version: SCHEMA_VERSION.to_string(),
            engine: "sqlite".to_string(),
            tables,
        }
    }

    fn row(value: Value) -> Row {
        value.as_object().cloned().expect("object literal")
    }

    fn customer_exists(id: i64) -> StubExecutor {
        StubExecutor::default().with_row(
            exists_sql(Engine::Sqlite, "customers", "id"),
            &[SqlValue::Int(id)],
        )
    }

    #[tokio::test]
    async fn unknown_columns_short_circuit_everything_else() {
        let schema = fixture_schema();
        let callbacks = CallbackRegistry::new();
        let executor = StubExecutor::default();

        // total is also empty, but unknown columns win exclusively.
        let data = row(json!({ "bogus": 1, "other": "x", "total": "" }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["bogus"], ValidationCode::Nonexistent);
        assert_eq!(result["other"], ValidationCode::Nonexistent);
    }

    #[tokio::test]
    async fn missing_foreign_row_and_empty_required_field() {
        let schema = fixture_schema();
        let callbacks = CallbackRegistry::new();
        // No customers row with id 5 exists.
        let executor = StubExecutor::default();

        let data = row(json!({ "customer_id": 5, "total": "" }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["customer_id"], ValidationCode::ForeignKey);
        assert_eq!(result["total"], ValidationCode::Empty);
    }

    #[tokio::test]
    async fn satisfied_foreign_key_passes() {
        let schema = fixture_schema();
        let callbacks = CallbackRegistry::new();
        let executor = customer_exists(5);

        let data = row(json!({ "customer_id": 5, "total": "20" }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();

        assert!(result.is_empty(), "unexpected errors: {result:?}");
    }

    #[tokio::test]
    async fn integer_columns_reject_non_digit_values() {
        let schema = fixture_schema();
        let callbacks = CallbackRegistry::new();
        let executor = customer_exists(5);

        for bad in [json!("-3"), json!("2.5"), json!("12x"), json!(" 7")] {
            let mut data = row(json!({ "customer_id": 5, "total": "20" }));
            data.insert("qty".to_string(), bad);
            let result = validate_row(
                &executor,
                Engine::Sqlite,
                &schema,
                &callbacks,
                "orders",
                &data,
            )
            .await
            .unwrap();
            assert_eq!(result.get("qty"), Some(&ValidationCode::Integer));
        }
    }

    #[tokio::test]
    async fn text_columns_respect_length_bound() {
        let schema = fixture_schema();
        let callbacks = CallbackRegistry::new();
        let executor = customer_exists(5);

        let data = row(json!({
            "customer_id": 5,
            "total": "20",
            "note": "this note is far too long",
        }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result["note"], ValidationCode::Length);
    }

    #[tokio::test]
    async fn supplied_primary_key_must_match_an_existing_row() {
        let schema = fixture_schema();
        let callbacks = CallbackRegistry::new();
        let executor = customer_exists(5).with_row(
            exists_sql(Engine::Sqlite, "orders", "id"),
            &[SqlValue::Int(7)],
        );

        let data = row(json!({ "id": 7, "customer_id": 5, "total": "20" }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();
        assert!(result.is_empty());

        let data = row(json!({ "id": 8, "customer_id": 5, "total": "20" }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["id"], ValidationCode::Missing);
    }

    #[tokio::test]
    async fn field_hook_code_is_recorded_verbatim() {
        let schema = fixture_schema();
        let executor = customer_exists(5);

        let mut callbacks = CallbackRegistry::new();
        callbacks.register_field("orders.total", |value: &Value, _: &Row| {
            let too_low = value.as_f64().is_some_and(|total| total < 10.0);
            too_low.then(|| "too_low".to_string())
        });

        // 5 passes every built-in check; the hook still rejects it.
        let data = row(json!({ "customer_id": 5, "total": 5 }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result["total"],
            ValidationCode::Custom("too_low".to_string())
        );

        let data = row(json!({ "customer_id": 5, "total": 20 }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn table_hook_runs_only_when_columns_are_clean() {
        let schema = fixture_schema();
        let executor = customer_exists(5);

        let mut callbacks = CallbackRegistry::new();
        callbacks.register_table("orders", |_: &Row| {
            HashMap::from([("total".to_string(), "rejected".to_string())])
        });

        let data = row(json!({ "customer_id": 5, "total": 20 }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();
        assert_eq!(
            result.get("total"),
            Some(&ValidationCode::Custom("rejected".to_string()))
        );

        // A per-column error suppresses the table hook.
        let data = row(json!({ "customer_id": 5, "total": "" }));
        let result = validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "orders",
            &data,
        )
        .await
        .unwrap();
        assert_eq!(result.get("total"), Some(&ValidationCode::Empty));
    }

    #[tokio::test]
    async fn unknown_table_is_an_error() {
        let schema = fixture_schema();
        let callbacks = CallbackRegistry::new();
        let executor = StubExecutor::default();

        let data = row(json!({ "x": 1 }));
        match validate_row(
            &executor,
            Engine::Sqlite,
            &schema,
            &callbacks,
            "missing_table",
            &data,
        )
        .await
        {
            Err(Error::UnknownTable(name)) => assert_eq!(name, "missing_table"),
            other => panic!("expected UnknownTable, got {other:?}"),
        }
    }
}
