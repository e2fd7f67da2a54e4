//! Flat text rendering of query results.
//!
//! Results come back as comma-joined lines: one header line of column names,
//! then one line per row. Values are not quoted or escaped; a value containing
//! the delimiter or a newline passes through verbatim. This is a known
//! output-ambiguity limitation of the format, kept as is.

use crate::db::session::ResultSet;

/// Null token used by the execute_sql tool path.
pub const NULL_TOKEN: &str = "NULL";

/// Null token used by the resource-read path.
///
/// The two paths deliberately render null differently; do not unify them.
pub const RESOURCE_NULL_TOKEN: &str = "";

/// Fixed reply for a read statement that returned no rows via the tool path.
pub const NO_ROWS_MESSAGE: &str = "Query executed successfully. No rows returned.";

/// Render a result set as header + rows, with `null_token` standing in for
/// null values. Zero rows yield just the header line.
pub fn format_result_set(result: &ResultSet, null_token: &str) -> String {
    let mut lines = Vec::with_capacity(result.rows.len() + 1);
    lines.push(result.columns.join(","));
    for row in &result.rows {
        let line = row
            .iter()
            .map(|value| {
                if value.is_null() {
                    null_token.to_string()
                } else {
                    value.render()
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

/// Fixed-template acknowledgement for write statements.
pub fn write_ack(rows_affected: u64) -> String {
    format!("Query executed successfully. {rows_affected} rows affected.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CellValue;

    fn result_set(columns: &[&str], rows: Vec<Vec<CellValue>>) -> ResultSet {
        ResultSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let rs = result_set(
            &["id", "name"],
            vec![
                vec![CellValue::Int(1), CellValue::Text("a".into())],
                vec![CellValue::Int(2), CellValue::Null],
            ],
        );
        assert_eq!(format_result_set(&rs, NULL_TOKEN), "id,name\n1,a\n2,NULL");
    }

    #[test]
    fn test_line_count_matches_rows_plus_header() {
        let rows: Vec<Vec<CellValue>> = (0..5).map(|i| vec![CellValue::Int(i)]).collect();
        let rs = result_set(&["n"], rows);
        assert_eq!(format_result_set(&rs, NULL_TOKEN).lines().count(), 6);
    }

    #[test]
    fn test_resource_path_renders_null_empty() {
        let rs = result_set(
            &["id", "name"],
            vec![vec![CellValue::Int(2), CellValue::Null]],
        );
        assert_eq!(format_result_set(&rs, RESOURCE_NULL_TOKEN), "id,name\n2,");
    }

    #[test]
    fn test_zero_rows_yields_header_only() {
        let rs = result_set(&["id", "name"], vec![]);
        assert_eq!(format_result_set(&rs, NULL_TOKEN), "id,name");
    }

    #[test]
    fn test_no_escaping_of_delimiters() {
        let rs = result_set(
            &["note"],
            vec![vec![CellValue::Text("a,b \"quoted\"".into())]],
        );
        assert_eq!(format_result_set(&rs, NULL_TOKEN), "note\na,b \"quoted\"");
    }

    #[test]
    fn test_write_ack_template() {
        assert_eq!(
            write_ack(1),
            "Query executed successfully. 1 rows affected."
        );
        assert_eq!(
            write_ack(0),
            "Query executed successfully. 0 rows affected."
        );
    }

    #[test]
    fn test_no_rows_message() {
        assert_eq!(NO_ROWS_MESSAGE, "Query executed successfully. No rows returned.");
    }
}
