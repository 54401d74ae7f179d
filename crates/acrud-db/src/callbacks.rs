use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use acrud_core::Row;

/// Per-field validation hook, keyed `"table.column"`.
///
/// Receives the submitted value and the full row; a returned code is recorded
/// verbatim as the field's error.
pub trait FieldHook: Send + Sync {
    fn check(&self, value: &Value, row: &Row) -> Option<String>;
}

impl<F> FieldHook for F
where
    F: Fn(&Value, &Row) -> Option<String> + Send + Sync,
{
    fn check(&self, value: &Value, row: &Row) -> Option<String> {
        self(value, row)
    }
}

/// Per-table validation hook, keyed by the bare table name.
///
/// Consulted only when no column produced an error; its returned mapping of
/// field to code becomes the final result.
pub trait TableHook: Send + Sync {
    fn check(&self, row: &Row) -> HashMap<String, String>;
}

impl<F> TableHook for F
where
    F: Fn(&Row) -> HashMap<String, String> + Send + Sync,
{
    fn check(&self, row: &Row) -> HashMap<String, String> {
        self(row)
    }
}

/// User-supplied hooks consulted during validation.
///
/// Entries are added at setup and never removed; the last registration for a
/// key wins.
#[derive(Default, Clone)]
pub struct CallbackRegistry {
    fields: HashMap<String, Arc<dyn FieldHook>>,
    tables: HashMap<String, Arc<dyn TableHook>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_field(&mut self, key: impl Into<String>, hook: impl FieldHook + 'static) {
        self.fields.insert(key.into(), Arc::new(hook));
    }

    pub fn register_table(&mut self, key: impl Into<String>, hook: impl TableHook + 'static) {
        self.tables.insert(key.into(), Arc::new(hook));
    }

    pub fn field(&self, key: &str) -> Option<&dyn FieldHook> {
        self.fields.get(key).map(Arc::as_ref)
    }

    pub fn table(&self, key: &str) -> Option<&dyn TableHook> {
        self.tables.get(key).map(Arc::as_ref)
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("fields", &self.fields.keys())
            .field("tables", &self.tables.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_registration_wins() {
        let mut registry = CallbackRegistry::new();
        registry.register_field("orders.total", |_: &Value, _: &Row| {
            Some("first".to_string())
        });
        registry.register_field("orders.total", |_: &Value, _: &Row| {
            Some("second".to_string())
        });

        let hook = registry.field("orders.total").expect("hook registered");
        assert_eq!(
            hook.check(&json!(1), &Row::new()),
            Some("second".to_string())
        );
        assert!(registry.field("orders.note").is_none());
    }
}
