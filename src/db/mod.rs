//! Database access: per-call sessions and value decoding.

pub mod session;
pub mod types;

pub use session::{
    ResultSet, StatementKind, StatementOutcome, classify_statement, execute_statement,
    fetch_statement,
};
pub use types::CellValue;
