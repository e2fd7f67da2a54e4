//! Error types for the MySQL MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Every failure a call can hit collapses into one of two user-facing categories:
//! configuration problems (caught before any connection attempt) and database
//! failures (anything the connector reports, wrapped with its original message).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a database error carrying the engine's original message.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create an internal error (transport startup/shutdown, not per-call).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// Connect failures, syntax errors, and constraint violations all degrade to
/// `Database` with the original message; callers never retry.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::database(db_err.message()),
            other => DbError::database(other.to_string()),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Convert DbError to MCP ErrorData for protocol-level error reporting.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::Config { .. } => rmcp::ErrorData::invalid_params(err.to_string(), None),
            DbError::Database { .. } | DbError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display_prefix() {
        let err = DbError::database("Unknown table 'users'");
        assert!(err.to_string().starts_with("Database error:"));
        assert!(err.to_string().contains("Unknown table 'users'"));
    }

    #[test]
    fn test_config_error_display_prefix() {
        let err = DbError::config("MYSQL_USER is not set");
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_config_maps_to_invalid_params() {
        let err = DbError::config("missing settings");
        let mcp_err: rmcp::ErrorData = err.into();
        // invalid_params uses -32602
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_database_maps_to_internal_error() {
        let err = DbError::database("connect failed");
        let mcp_err: rmcp::ErrorData = err.into();
        // internal_error uses -32603
        assert_eq!(mcp_err.code.0, -32603);
    }

    #[test]
    fn test_sqlx_error_converts_to_database() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::Database { .. }));
        assert!(err.to_string().starts_with("Database error:"));
    }
}
