use thiserror::Error;

/// Errors raised at the record source boundary while mapping rows into typed records.
///
/// Any of these aborts the current build; no partial graph is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("{table} field {field} expected a column named {column} in the row but {reason}")]
    ColumnMissing {
        table: &'static str,
        field: &'static str,
        column: &'static str,
        reason: MissingReason,
    },

    #[error("{table} field {field} could not parse column {column} value '{value}': {message}")]
    ParsingFailed {
        table: &'static str,
        field: &'static str,
        column: &'static str,
        value: String,
        message: String,
    },

    #[error("Was expecting a single {table} row for key {key} but found more than one")]
    DuplicateKey { table: &'static str, key: String },

    #[error("Record source failed: {0}")]
    Source(String),

    #[error("Snapshot failed: {0}")]
    Snapshot(String),
}

/// Why a required column could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    Absent,
    Null,
}

impl std::fmt::Display for MissingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingReason::Absent => write!(f, "the column was absent"),
            MissingReason::Null => write!(f, "got NULL from the db"),
        }
    }
}

/// Errors from constructing a typed affect out of a row that is not that variant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AffectError {
    #[error("Mark-done affect requires its auto-complete flag to be true, found {0:?}")]
    NotMarkDone(Option<bool>),
}

/// Errors that can occur while building an action list graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Action list {0} does not exist")]
    UnknownActionList(i64),

    #[error("Invalid record: {0}")]
    Record(#[from] RecordError),
}
