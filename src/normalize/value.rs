use serde_json::Value;

static NULL: Value = Value::Null;

/// Lenient accessors over untrusted JSON.
///
/// Missing keys, nulls and type mismatches all read as "absent"; nothing here
/// panics or allocates unless it returns an owned string.
pub trait ValueExt {
    /// Child value, `Null` when absent.
    fn field(&self, key: &str) -> &Value;

    /// Array child, empty when absent or not an array.
    fn items(&self, key: &str) -> &[Value];

    /// Non-negative counter, 0 when absent or unparsable.
    fn count(&self, key: &str) -> u64;

    fn int(&self, key: &str) -> Option<i64>;

    /// String child; numbers are rendered in decimal.
    fn text(&self, key: &str) -> Option<String>;

    /// Booleans as-is, numbers as `!= 0`.
    fn flag(&self, key: &str) -> bool;

    /// First entry of this object's `url_list`.
    fn first_url(&self) -> Option<String>;

    /// Python-style truthiness: null, empty containers, empty strings,
    /// `false` and zero are falsy.
    fn is_truthy(&self) -> bool;
}

impl ValueExt for Value {
    fn field(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }

    fn items(&self, key: &str) -> &[Value] {
        self.field(key).as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    fn count(&self, key: &str) -> u64 {
        match self.field(key) {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn int(&self, key: &str) -> Option<i64> {
        match self.field(key) {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.field(key) {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn flag(&self, key: &str) -> bool {
        match self.field(key) {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            _ => false,
        }
    }

    fn first_url(&self) -> Option<String> {
        self.items("url_list")
            .first()
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }
}
