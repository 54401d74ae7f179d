use serde_json::Value;

/// A candidate row submitted for validation or save.
///
/// Keys are column names; values are whatever the caller decoded from its
/// input surface (JSON body, form data).
pub type Row = serde_json::Map<String, Value>;

/// Whether a submitted value counts as empty for required-field purposes.
///
/// An absent key, JSON null, and the empty string are empty. Zero and false
/// are real values.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// Render a submitted value as the text the engine would receive.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
