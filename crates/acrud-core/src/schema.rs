use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::TypeClass;

/// Target of a foreign-key constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct ForeignRef {
    pub table: String,
    pub column: String,
}

/// Normalized, engine-independent description of one column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ColumnDescriptor {
    /// Catalog ordinal position, drives iteration order within a table.
    pub ordinal: i32,
    pub name: String,
    pub type_class: TypeClass,
    pub nullable: bool,
    /// Literal default; presence implies the field may be omitted.
    pub default: Option<String>,
    /// Character bound, applies to text types.
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub primary: bool,
    pub unique: bool,
    pub index: bool,
    pub foreign: Option<ForeignRef>,
    /// Free text from the catalog, not used in validation.
    pub comment: Option<String>,
}

/// Columns of one table in catalog ordinal order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TableSchema {
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Look up a column descriptor by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The single-column primary key, when one is modeled.
    ///
    /// Composite primary keys are unsupported; only the first primary column
    /// is returned.
    pub fn primary_key(&self) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.primary)
    }
}

/// Normalized schema snapshot for one database.
///
/// Built once per connection lifetime and cached by the owning instance;
/// invalidated only by an explicit re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Schema {
    /// Contract version for this schema format.
    pub schema_version: String,
    /// Database engine identifier (e.g. `mysql`, `sqlite`).
    pub engine: String,
    /// Tables keyed by name.
    pub tables: BTreeMap<String, TableSchema>,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &String> {
        self.tables.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(ordinal: i32, name: &str, primary: bool) -> ColumnDescriptor {
        ColumnDescriptor {
            ordinal,
            name: name.to_string(),
            type_class: TypeClass::Integer,
            nullable: false,
            default: None,
            length: None,
            precision: None,
            scale: None,
            primary,
            unique: false,
            index: false,
            foreign: None,
            comment: None,
        }
    }

    #[test]
    fn preserves_column_order_and_lookup() {
        let table = TableSchema {
            columns: vec![
                descriptor(1, "id", true),
                descriptor(2, "customer_id", false),
                descriptor(3, "total", false),
            ],
        };

        let names: Vec<&str> = table
            .columns
            .iter()
            .map(|column| column.name.as_str())
            .collect();
        assert_eq!(names, ["id", "customer_id", "total"]);
        assert!(table.contains("total"));
        assert!(!table.contains("bogus"));
        assert_eq!(table.primary_key().map(|c| c.name.as_str()), Some("id"));
    }
}
