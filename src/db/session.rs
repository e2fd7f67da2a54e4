//! Per-call database sessions.
//!
//! Every call opens exactly one connection, runs exactly one statement, and
//! closes the connection on every exit path. Statements go over the text
//! protocol (no prepared statements), so SHOW, SET, and DDL all work through
//! the same path. There is no retry and no timeout beyond the driver's own.

use crate::config::ConnectionSettings;
use crate::db::types::{self, CellValue};
use crate::error::{DbError, DbResult};
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Executor};
use tracing::debug;

/// Classification of a SQL statement for output purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Case-insensitive `SELECT` prefix after leading whitespace.
    Read,
    /// Everything else, including SHOW and DDL.
    Write,
}

/// Classify a statement by its trimmed, case-insensitive prefix.
pub fn classify_statement(sql: &str) -> StatementKind {
    let trimmed = sql.trim_start();
    if trimmed
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SELECT"))
    {
        StatementKind::Read
    } else {
        StatementKind::Write
    }
}

/// One query's tabular result: column names plus decoded rows.
///
/// Every row has the same length as `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Outcome of executing one statement through the gateway.
#[derive(Debug)]
pub enum StatementOutcome {
    /// Read statement: the full materialized result set.
    Rows(ResultSet),
    /// Write statement: the engine-reported affected-row count.
    Affected(u64),
}

/// Open one connection and apply session setup (sql_mode, autocommit).
async fn connect(settings: &ConnectionSettings) -> DbResult<MySqlConnection> {
    debug!(
        host = %settings.host,
        database = %settings.database,
        charset = %settings.charset,
        collation = %settings.collation,
        "Connecting to MySQL"
    );
    let mut conn = settings.connect_options().connect().await?;
    let setup = settings.session_setup();
    (&mut conn).execute(setup.as_str()).await?;
    Ok(conn)
}

/// Run one statement and fetch all rows eagerly, regardless of statement kind.
///
/// Used by the resource bridge, where SHOW TABLES and SELECT both need rows.
pub async fn fetch_statement(settings: &ConnectionSettings, sql: &str) -> DbResult<ResultSet> {
    let mut conn = connect(settings).await?;
    let result = fetch_on(&mut conn, sql).await;
    // Close on every exit path; a close failure does not mask the result.
    let _ = conn.close().await;
    result
}

/// Run one statement, branching on its classification.
pub async fn execute_statement(
    settings: &ConnectionSettings,
    sql: &str,
) -> DbResult<StatementOutcome> {
    match classify_statement(sql) {
        StatementKind::Read => fetch_statement(settings, sql)
            .await
            .map(StatementOutcome::Rows),
        StatementKind::Write => {
            let mut conn = connect(settings).await?;
            let result = write_on(&mut conn, sql).await;
            let _ = conn.close().await;
            result
        }
    }
}

async fn fetch_on(conn: &mut MySqlConnection, sql: &str) -> DbResult<ResultSet> {
    let rows: Vec<MySqlRow> = (&mut *conn).fetch_all(sql).await.map_err(DbError::from)?;
    let columns = match rows.first() {
        Some(row) => types::column_names(row),
        // Zero rows carry no metadata; describe the statement to keep the header.
        None => described_columns(conn, sql).await?,
    };
    let rows = rows.iter().map(types::decode_row).collect();
    Ok(ResultSet { columns, rows })
}

async fn described_columns(conn: &mut MySqlConnection, sql: &str) -> DbResult<Vec<String>> {
    let description = (&mut *conn).describe(sql).await.map_err(DbError::from)?;
    Ok(description
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect())
}

async fn write_on(conn: &mut MySqlConnection, sql: &str) -> DbResult<StatementOutcome> {
    let done = (&mut *conn).execute(sql).await.map_err(DbError::from)?;
    let affected = done.rows_affected();
    // Explicit commit even though autocommit is on; observable if autocommit
    // is ever disabled.
    (&mut *conn).execute("COMMIT").await.map_err(DbError::from)?;
    debug!(rows_affected = affected, "Write statement committed");
    Ok(StatementOutcome::Affected(affected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_select_is_read() {
        assert_eq!(classify_statement("SELECT 1"), StatementKind::Read);
        assert_eq!(
            classify_statement("SELECT id, name FROM users"),
            StatementKind::Read
        );
    }

    #[test]
    fn test_classify_trims_leading_whitespace() {
        assert_eq!(
            classify_statement("   \n\t select * from t"),
            StatementKind::Read
        );
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify_statement("sElEcT 1"), StatementKind::Read);
    }

    #[test]
    fn test_classify_writes() {
        assert_eq!(
            classify_statement("UPDATE users SET name='x'"),
            StatementKind::Write
        );
        assert_eq!(
            classify_statement("INSERT INTO t VALUES (1)"),
            StatementKind::Write
        );
        assert_eq!(classify_statement("DELETE FROM t"), StatementKind::Write);
        assert_eq!(classify_statement("CREATE TABLE t (id INT)"), StatementKind::Write);
    }

    #[test]
    fn test_classify_show_is_write() {
        // Prefix classification only: SHOW goes down the write path,
        // matching the tool's documented behavior.
        assert_eq!(classify_statement("SHOW TABLES"), StatementKind::Write);
    }

    #[test]
    fn test_classify_empty_and_short_statements() {
        assert_eq!(classify_statement(""), StatementKind::Write);
        assert_eq!(classify_statement("SEL"), StatementKind::Write);
    }
}
