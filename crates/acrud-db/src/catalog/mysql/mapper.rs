use crate::catalog::{ColumnRecord, ForeignKeyRecord};

use super::queries::{RawMySqlColumn, RawMySqlForeignKey};

pub fn map_columns(raw: Vec<RawMySqlColumn>) -> Vec<ColumnRecord> {
    raw.into_iter()
        .map(|col| {
            // MySQL has no real boolean type; tinyint(1) is the convention.
            // Keep the display type so the type map can treat it as boolean.
            let native_type = if col.column_type.starts_with("tinyint(1)") {
                "tinyint(1)".to_string()
            } else {
                col.data_type
            };

            ColumnRecord {
                table: col.table,
                name: col.name,
                ordinal: col.ordinal as i32,
                native_type,
                nullable: col.is_nullable.eq_ignore_ascii_case("yes"),
                default: col.default.filter(|text| !text.is_empty()),
                length: col.character_max_length,
                precision: col.numeric_precision,
                scale: col.numeric_scale,
                primary: col.column_key == "PRI",
                unique: col.column_key == "UNI",
                index: !col.column_key.is_empty(),
                comment: Some(col.comment).filter(|text| !text.is_empty()),
            }
        })
        .collect()
}

pub fn map_foreign_keys(raw: Vec<RawMySqlForeignKey>) -> Vec<ForeignKeyRecord> {
    raw.into_iter()
        .map(|fk| ForeignKeyRecord {
            table: fk.table,
            column: fk.column,
            ref_table: fk.referenced_table,
            ref_column: fk.referenced_column,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_column(column_type: &str, data_type: &str, column_key: &str) -> RawMySqlColumn {
        RawMySqlColumn {
            table: "orders".to_string(),
            name: "flag".to_string(),
            ordinal: 1,
            data_type: data_type.to_string(),
            column_type: column_type.to_string(),
            is_nullable: "NO".to_string(),
            default: None,
            character_max_length: None,
            numeric_precision: None,
            numeric_scale: None,
            column_key: column_key.to_string(),
            comment: String::new(),
        }
    }

    #[test]
    fn keeps_tinyint_1_display_type() {
        let records = map_columns(vec![raw_column("tinyint(1)", "tinyint", "")]);
        assert_eq!(records[0].native_type, "tinyint(1)");

        let records = map_columns(vec![raw_column("tinyint(4)", "tinyint", "")]);
        assert_eq!(records[0].native_type, "tinyint");
    }

    #[test]
    fn maps_column_key_to_flags() {
        let records = map_columns(vec![
            raw_column("int", "int", "PRI"),
            raw_column("int", "int", "UNI"),
            raw_column("int", "int", "MUL"),
            raw_column("int", "int", ""),
        ]);

        assert!(records[0].primary && records[0].index);
        assert!(records[1].unique && !records[1].primary);
        assert!(records[2].index && !records[2].unique);
        assert!(!records[3].index);
    }
}
