use std::collections::BTreeMap;

use acrud_core::{
    ColumnDescriptor, Error, ForeignRef, Result, SCHEMA_VERSION, Schema, TableSchema, TypeClass,
};

use crate::catalog::{ColumnRecord, ForeignKeyRecord};
use crate::engine::Engine;

/// Build a normalized schema from raw catalog records.
///
/// Groups columns by table preserving catalog ordinal order, maps native type
/// names through the engine's fixed lookup table, and merges foreign-key
/// records into the matching descriptors. A foreign key naming a nonexistent
/// column is dropped: the two metadata fetches are not atomic, so drift
/// between them is expected under concurrent schema changes.
///
/// Idempotent and side-effect-free; caching is the caller's concern.
pub fn normalize(
    engine: Engine,
    columns: Vec<ColumnRecord>,
    foreign_keys: Vec<ForeignKeyRecord>,
) -> Result<Schema> {
    let mut fk_map: BTreeMap<(String, String), ForeignRef> = foreign_keys
        .into_iter()
        .map(|fk| {
            (
                (fk.table, fk.column),
                ForeignRef {
                    table: fk.ref_table,
                    column: fk.ref_column,
                },
            )
        })
        .collect();

    let mut tables: BTreeMap<String, TableSchema> = BTreeMap::new();

    for record in columns {
        let Some(type_class) = type_class(engine, &record.native_type) else {
            return Err(Error::UnsupportedType {
                table: record.table,
                column: record.name,
                native: record.native_type,
            });
        };

        let foreign = fk_map.remove(&(record.table.clone(), record.name.clone()));

        tables
            .entry(record.table)
            .or_default()
            .columns
            .push(ColumnDescriptor {
                ordinal: record.ordinal,
                name: record.name,
                type_class,
                nullable: record.nullable,
                default: record.default,
                length: record.length,
                precision: record.precision,
                scale: record.scale,
                primary: record.primary,
                unique: record.unique,
                index: record.index,
                foreign,
                comment: record.comment,
            });
    }

    for table in tables.values_mut() {
        table.columns.sort_by_key(|column| column.ordinal);
    }

    Ok(Schema {
        schema_version: SCHEMA_VERSION.to_string(),
        engine: engine.as_str().to_string(),
        tables,
    })
}

/// Fixed per-engine lookup from native type name to normalized class.
pub fn type_class(engine: Engine, native: &str) -> Option<TypeClass> {
    match engine {
        Engine::MySql => mysql_type_class(native),
        Engine::Sqlite => sqlite_type_class(native),
    }
}

fn mysql_type_class(native: &str) -> Option<TypeClass> {
    Some(match native {
        // tinyint(1) is boolean-by-convention; plain tinyint stays integer.
        "tinyint(1)" | "boolean" | "bool" => TypeClass::Boolean,
        "int" | "tinyint" | "smallint" | "mediumint" | "bigint" | "bit" => TypeClass::Integer,
        "double" | "float" | "decimal" | "numeric" => TypeClass::Decimal,
        "date" | "time" | "datetime" | "timestamp" | "year" => TypeClass::Datetime,
        "tinytext" | "text" | "mediumtext" | "longtext" | "varchar" | "char" | "tinyblob"
        | "blob" | "mediumblob" | "longblob" | "varbinary" | "binary" => TypeClass::Text,
        _ => return None,
    })
}

fn sqlite_type_class(native: &str) -> Option<TypeClass> {
    Some(match native {
        // An omitted declared type gets blob affinity; treat it as text.
        "" | "text" | "blob" | "clob" | "varchar" | "char" | "nvarchar" | "nchar"
        | "character" => TypeClass::Text,
        "null" | "integer" | "int" | "tinyint" | "smallint" | "mediumint" | "bigint" => {
            TypeClass::Integer
        }
        "real" | "double" | "float" | "numeric" | "decimal" => TypeClass::Decimal,
        "boolean" | "bool" => TypeClass::Boolean,
        "date" | "datetime" | "timestamp" | "time" => TypeClass::Datetime,
        _ => return None,
    })
}
