//! MySQL MCP Server Library
//!
//! This library exposes a MySQL database over the MCP (Model Context
//! Protocol): tables as readable resources and arbitrary SQL execution
//! as a tool. Every call opens its own short-lived connection configured
//! from `MYSQL_*` environment variables.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod mcp;
pub mod transport;

pub use config::{Config, ConnectionSettings};
pub use error::DbError;
pub use mcp::MySqlService;
