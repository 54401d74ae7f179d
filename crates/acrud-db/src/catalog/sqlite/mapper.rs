use crate::catalog::{ColumnRecord, ForeignKeyRecord};

use super::queries::{RawSqliteColumn, RawSqliteForeignKey};

/// Base type name and numeric arguments of a declared SQLite type.
///
/// SQLite stores declarations verbatim, so `VARCHAR(255)` and
/// `NUMERIC(10,2)` need splitting before the type map can apply.
pub(super) fn parse_declared(declared: &str) -> (String, Vec<i64>) {
    let declared = declared.trim().to_ascii_lowercase();

    let Some(open) = declared.find('(') else {
        return (declared, Vec::new());
    };

    let base = declared[..open].trim().to_string();
    let args = declared[open + 1..]
        .trim_end_matches(')')
        .split(',')
        .filter_map(|arg| arg.trim().parse::<i64>().ok())
        .collect();

    (base, args)
}

pub(super) fn map_columns(table: &str, raw: Vec<RawSqliteColumn>) -> Vec<ColumnRecord> {
    raw.into_iter()
        .map(|col| {
            let (base, args) = parse_declared(&col.declared_type);
            let (length, precision, scale) = match args.as_slice() {
                [single] => (Some(*single), Some(*single), None),
                [first, second, ..] => (None, Some(*first), Some(*second)),
                [] => (None, None, None),
            };

            ColumnRecord {
                table: table.to_string(),
                name: col.name,
                ordinal: col.cid as i32 + 1,
                native_type: base,
                nullable: col.notnull == 0,
                default: col.default.filter(|text| !text.is_empty()),
                length,
                precision,
                scale,
                primary: col.pk != 0,
                unique: false,
                index: false,
                comment: None,
            }
        })
        .collect()
}

pub(super) fn map_foreign_keys(
    table: &str,
    raw: Vec<RawSqliteForeignKey>,
) -> Vec<ForeignKeyRecord> {
    raw.into_iter()
        .filter_map(|fk| {
            // `to` is null when the constraint references the target's
            // implicit primary key; such constraints are not representable.
            let to = fk.to?;
            Some(ForeignKeyRecord {
                table: table.to_string(),
                column: fk.from,
                ref_table: fk.table,
                ref_column: to,
            })
        })
        .collect()
}

/// Second-pass merge of index metadata onto a column record.
pub(super) fn mark_index(records: &mut [ColumnRecord], table: &str, column: &str, unique: bool) {
    if let Some(record) = records
        .iter_mut()
        .find(|record| record.table == table && record.name == column)
    {
        if unique {
            record.unique = true;
        } else {
            record.index = true;
        }
    }
}
