//! Error types for pgtable

use std::time::Duration;
use thiserror::Error;

/// Result type alias for pgtable operations
pub type TableResult<T> = Result<T, TableError>;

/// Error types for table operations
#[derive(Debug, Error)]
pub enum TableError {
    /// A terminal operation that needs a filter ran before `filter()`
    #[error("No filter bound on table '{table}': call filter() first")]
    UnboundFilter { table: String },

    /// The filter is empty, so the statement would be unconditional
    #[error("Empty filter on table '{table}' would match every row")]
    EmptyFilter { table: String },

    /// `set()` / `remove()` while a join is active
    #[error("Cannot mutate table '{table}' while joined with '{joined}'")]
    JoinedMutationNotAllowed { table: String, joined: String },

    /// A value cannot be rendered as a quoted literal
    #[error("Value for column '{column}' contains a quote and cannot be inlined: {value}")]
    MalformedLiteral { column: String, value: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl TableError {
    pub fn unbound_filter(table: impl Into<String>) -> Self {
        Self::UnboundFilter {
            table: table.into(),
        }
    }

    pub fn empty_filter(table: impl Into<String>) -> Self {
        Self::EmptyFilter {
            table: table.into(),
        }
    }

    pub fn joined_mutation(table: impl Into<String>, joined: impl Into<String>) -> Self {
        Self::JoinedMutationNotAllowed {
            table: table.into(),
            joined: joined.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// True for the errors raised while composing, before anything is sent
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnboundFilter { .. }
                | Self::EmptyFilter { .. }
                | Self::JoinedMutationNotAllowed { .. }
        )
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Parse a tokio_postgres error into a more specific TableError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            if db_err.code().code() == "23505" {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return Self::UniqueViolation(format!("{}: {}", constraint, db_err.message()));
            }
        }
        Self::Query(err)
    }
}
