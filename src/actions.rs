use serde_json::Value;

/// Specifies the action to perform on a record field during processing.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Overwrite the `latitude` and `longitude` of a location object with generated coordinates.
    ///
    /// Skipped when the field is falsy (`null`, `{}`, ...).
    Coordinates,

    /// Replace the whole field value, but only when the current value is truthy.
    ReplaceIfPresent(Value),

    /// Replace the field value whenever the key exists, whatever its value.
    Replace(Value),

    /// Preserve the original field value without modification.
    Keep,
}

/// Returns whether a JSON value counts as "set" for the purpose of anonymization.
///
/// `null`, `false`, zero, the empty string, the empty array and the empty object are all
/// considered not set.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
