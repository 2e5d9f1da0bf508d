use crate::error::{MissingReason, RecordError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single row as returned by the record source, keyed by source column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

/// A custom column parser, used instead of the field type's own `FromColumn` impl.
pub type ColumnParser<T> = fn(&Value) -> Result<T, String>;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for assembling rows by hand.
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.0.insert(column.to_string(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Reads `column` into the field type `T`.
    ///
    /// Absent and NULL columns are only accepted when `T` is nullable (an `Option`).
    pub fn read<T: FromColumn>(
        &self,
        table: &'static str,
        field: &'static str,
        column: &'static str,
    ) -> Result<T, RecordError> {
        let missing = |reason| {
            T::missing().ok_or(RecordError::ColumnMissing {
                table,
                field,
                column,
                reason,
            })
        };
        match self.0.get(column) {
            None => missing(MissingReason::Absent),
            Some(Value::Null) => missing(MissingReason::Null),
            Some(value) => T::parse(value).map_err(|message| RecordError::ParsingFailed {
                table,
                field,
                column,
                value: value.to_string(),
                message,
            }),
        }
    }

    /// Reads a non-nullable `column` through a custom parser.
    pub fn read_with<T>(
        &self,
        table: &'static str,
        field: &'static str,
        column: &'static str,
        parser: ColumnParser<T>,
    ) -> Result<T, RecordError> {
        let value = match self.0.get(column) {
            None => {
                return Err(RecordError::ColumnMissing {
                    table,
                    field,
                    column,
                    reason: MissingReason::Absent,
                });
            }
            Some(Value::Null) => {
                return Err(RecordError::ColumnMissing {
                    table,
                    field,
                    column,
                    reason: MissingReason::Null,
                });
            }
            Some(value) => value,
        };
        parser(value).map_err(|message| RecordError::ParsingFailed {
            table,
            field,
            column,
            value: value.to_string(),
            message,
        })
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Converts a single column value into a typed field.
pub trait FromColumn: Sized {
    /// Parses a present, non-null value.
    fn parse(value: &Value) -> Result<Self, String>;

    /// The value to use when the column is absent or NULL. `None` means the column is required.
    fn missing() -> Option<Self> {
        None
    }
}

impl FromColumn for i64 {
    fn parse(value: &Value) -> Result<Self, String> {
        value
            .as_i64()
            .ok_or_else(|| "expected an integer".to_string())
    }
}

impl FromColumn for f64 {
    fn parse(value: &Value) -> Result<Self, String> {
        value.as_f64().ok_or_else(|| "expected a number".to_string())
    }
}

// SQL Server bit columns arrive as either booleans or 0/1 depending on the driver.
impl FromColumn for bool {
    fn parse(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err("expected a bit value of 0 or 1".to_string()),
            },
            _ => Err("expected a boolean".to_string()),
        }
    }
}

impl FromColumn for String {
    fn parse(value: &Value) -> Result<Self, String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "expected a string".to_string())
    }
}

impl<T: FromColumn> FromColumn for Option<T> {
    fn parse(value: &Value) -> Result<Self, String> {
        T::parse(value).map(Some)
    }

    fn missing() -> Option<Self> {
        Some(None)
    }
}
