//! Output-contract tests for the request-handling bridge.
//!
//! These exercise the pure pieces of the pipeline end to end: settings
//! resolution, statement classification, and result formatting. Anything
//! needing a live MySQL server is covered by unit tests against the
//! decoding layer instead.

use mysql_mcp_server::config::ConnectionSettings;
use mysql_mcp_server::db::{CellValue, ResultSet, StatementKind, classify_statement};
use mysql_mcp_server::error::DbError;
use mysql_mcp_server::format::{NO_ROWS_MESSAGE, NULL_TOKEN, format_result_set, write_ack};

fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn missing_required_settings_fail_before_any_connection() {
    for omitted in ["MYSQL_USER", "MYSQL_PASSWORD", "MYSQL_DATABASE"] {
        let pairs: Vec<(&str, &str)> = [
            ("MYSQL_USER", "app"),
            ("MYSQL_PASSWORD", "secret"),
            ("MYSQL_DATABASE", "shop"),
        ]
        .into_iter()
        .filter(|(k, _)| *k != omitted)
        .collect();

        let err = ConnectionSettings::resolve_with(env(&pairs)).unwrap_err();
        assert!(matches!(err, DbError::Config { .. }), "omitting {omitted}");
        assert!(err.to_string().contains(omitted), "omitting {omitted}");
    }
}

#[test]
fn select_prefix_classifies_as_read_everything_else_as_write() {
    assert_eq!(classify_statement("SELECT 1"), StatementKind::Read);
    assert_eq!(classify_statement("  select 1"), StatementKind::Read);
    assert_eq!(
        classify_statement("UPDATE users SET name='x' WHERE id=1"),
        StatementKind::Write
    );
    assert_eq!(classify_statement("SHOW TABLES"), StatementKind::Write);
    assert_eq!(classify_statement("EXPLAIN SELECT 1"), StatementKind::Write);
}

#[test]
fn tool_output_for_select_with_null_row() {
    // SELECT id,name FROM users with rows (1,'a'), (2,NULL)
    let result = ResultSet {
        columns: vec!["id".to_string(), "name".to_string()],
        rows: vec![
            vec![CellValue::Int(1), CellValue::Text("a".to_string())],
            vec![CellValue::Int(2), CellValue::Null],
        ],
    };
    assert_eq!(format_result_set(&result, NULL_TOKEN), "id,name\n1,a\n2,NULL");
}

#[test]
fn tool_output_shape_is_rows_plus_header() {
    let result = ResultSet {
        columns: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        rows: (0..7)
            .map(|i| {
                vec![
                    CellValue::Int(i),
                    CellValue::UInt(i as u64),
                    CellValue::Text(format!("r{i}")),
                ]
            })
            .collect(),
    };
    let text = format_result_set(&result, NULL_TOKEN);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("a,b,c"));
    assert_eq!(text.lines().count(), 8);
}

#[test]
fn write_output_matches_fixed_template() {
    assert_eq!(write_ack(1), "Query executed successfully. 1 rows affected.");
    assert_eq!(
        write_ack(37),
        "Query executed successfully. 37 rows affected."
    );
}

#[test]
fn zero_row_read_messages() {
    // Tool path returns a fixed literal; resource path returns header only.
    assert_eq!(NO_ROWS_MESSAGE, "Query executed successfully. No rows returned.");
    let empty = ResultSet {
        columns: vec!["id".to_string(), "name".to_string()],
        rows: vec![],
    };
    assert_eq!(format_result_set(&empty, ""), "id,name");
}
