use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use super::ValidationIssue;

/// Inclusive integer range.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: i64) -> Self {
        Self { min, max: u32::MAX as i64 }
    }
}

/// Inclusive string length range, counted in characters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Length {
    pub min: usize,
    pub max: Option<usize>,
}

impl Length {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_most(max: usize) -> Self {
        Self { min: 0, max: Some(max) }
    }

    pub const fn any() -> Self {
        Self { min: 0, max: None }
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Collects issues while walking one record. Every check records at most one issue
/// for its field and returns `None` when the field is absent or invalid.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    pub issues: Vec<ValidationIssue>,
}

impl Checker {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        if let Value::Object(map) = value {
            Some(map)
        } else {
            self.push(path, format!("expected object, received {}", type_name(value)));
            None
        }
    }

    fn lookup<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        prefix: &str,
        key: &str,
        required: bool,
    ) -> Option<&'a Value> {
        let value = obj.get(key);
        if value.is_none() && required {
            self.push(join_path(prefix, key), "required");
        }
        value
    }

    pub fn int(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        bounds: Bounds,
        required: bool,
    ) -> Option<i64> {
        let value = self.lookup(obj, prefix, key, required)?;
        let path = join_path(prefix, key);
        let Value::Number(number) = value else {
            self.push(path, format!("expected integer, received {}", type_name(value)));
            return None;
        };

        let parsed = if let Some(i) = number.as_i64() {
            i
        } else if number.as_u64().is_some() {
            // above i64::MAX, so above every upper bound we use
            self.push(path, format!("must be less than or equal to {}", bounds.max));
            return None;
        } else {
            match number.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
                _ => {
                    self.push(path, "expected integer, received float");
                    return None;
                }
            }
        };

        if parsed < bounds.min {
            self.push(path, format!("must be greater than or equal to {}", bounds.min));
            None
        } else if parsed > bounds.max {
            self.push(path, format!("must be less than or equal to {}", bounds.max));
            None
        } else {
            Some(parsed)
        }
    }

    pub fn string(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        length: Length,
        required: bool,
    ) -> Option<String> {
        let value = self.lookup(obj, prefix, key, required)?;
        let path = join_path(prefix, key);
        let Value::String(s) = value else {
            self.push(path, format!("expected string, received {}", type_name(value)));
            return None;
        };

        let count = s.chars().count();
        if count < length.min {
            self.push(path, format!("must contain at least {} character(s)", length.min));
            return None;
        }
        if let Some(max) = length.max {
            if count > max {
                self.push(path, format!("must contain at most {max} character(s)"));
                return None;
            }
        }
        Some(s.clone())
    }

    pub fn boolean(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        required: bool,
    ) -> Option<bool> {
        let value = self.lookup(obj, prefix, key, required)?;
        if let Value::Bool(b) = value {
            Some(*b)
        } else {
            self.push(
                join_path(prefix, key),
                format!("expected boolean, received {}", type_name(value)),
            );
            None
        }
    }

    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping the timestamp's local date.
    pub fn date(
        &mut self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
        required: bool,
    ) -> Option<NaiveDate> {
        let value = self.lookup(obj, prefix, key, required)?;
        let path = join_path(prefix, key);
        let Value::String(s) = value else {
            self.push(path, format!("expected date, received {}", type_name(value)));
            return None;
        };

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Some(ts.date_naive());
        }
        self.push(path, "invalid date");
        None
    }

    pub fn array<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        prefix: &str,
        key: &str,
        required: bool,
    ) -> Option<&'a Vec<Value>> {
        let value = self.lookup(obj, prefix, key, required)?;
        if let Value::Array(items) = value {
            Some(items)
        } else {
            self.push(
                join_path(prefix, key),
                format!("expected array, received {}", type_name(value)),
            );
            None
        }
    }
}

/// Narrows an already range-checked integer.
pub(crate) fn narrow<T: TryFrom<i64>>(value: Option<i64>) -> Option<T> {
    value.and_then(|v| T::try_from(v).ok())
}
