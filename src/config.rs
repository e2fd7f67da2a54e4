//! Configuration handling for the MySQL MCP Server.
//!
//! Process-level options (logging) come from CLI arguments and environment
//! variables via clap. Connection settings are resolved fresh on every call
//! from `MYSQL_*` environment variables by a pure resolver that takes an
//! environment-lookup closure, so validation is testable without touching
//! the real process environment.

use crate::error::{DbError, DbResult};
use clap::Parser;
use sqlx::mysql::MySqlConnectOptions;
use std::env;
use tracing::error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_CHARSET: &str = "utf8mb4";
pub const DEFAULT_COLLATION: &str = "utf8mb4_unicode_ci";
pub const DEFAULT_SQL_MODE: &str = "TRADITIONAL";

/// Process configuration parsed from command line and environment.
#[derive(Debug, Parser)]
#[command(
    name = "mysql-mcp-server",
    about = "MCP server exposing a MySQL database over stdio",
    version
)]
pub struct Config {
    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Output logs in JSON format
    #[arg(long, env = "LOG_JSON")]
    pub json_logs: bool,
}

/// Connection settings for one database session.
///
/// Built fresh per call from the environment; never cached, never mutated.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Sensitive - not logged.
    pub password: String,
    pub database: String,
    pub charset: String,
    pub collation: String,
    pub sql_mode: String,
    /// Always true; the write path still commits explicitly.
    pub autocommit: bool,
}

impl ConnectionSettings {
    /// Resolve settings from the process environment.
    pub fn resolve() -> DbResult<Self> {
        Self::resolve_with(|key| env::var(key).ok())
    }

    /// Resolve settings from an arbitrary lookup.
    ///
    /// Empty values count as unset. Fails closed when `MYSQL_USER`,
    /// `MYSQL_PASSWORD`, or `MYSQL_DATABASE` is missing, or when
    /// `MYSQL_PORT` is not a valid port number.
    pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match get("MYSQL_PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(p) if p > 0 => p,
                _ => {
                    error!(value = %raw, "MYSQL_PORT must be an integer between 1 and 65535");
                    return Err(DbError::config(format!(
                        "MYSQL_PORT is not a valid port number: {raw}"
                    )));
                }
            },
            None => DEFAULT_PORT,
        };

        let user = get("MYSQL_USER");
        let password = get("MYSQL_PASSWORD");
        let database = get("MYSQL_DATABASE");

        let missing: Vec<&str> = [
            ("MYSQL_USER", user.is_none()),
            ("MYSQL_PASSWORD", password.is_none()),
            ("MYSQL_DATABASE", database.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            error!(
                missing = %missing.join(", "),
                "Missing required database configuration. \
                 MYSQL_USER, MYSQL_PASSWORD, and MYSQL_DATABASE are required"
            );
            return Err(DbError::config(format!(
                "missing required settings: {}. \
                 MYSQL_USER, MYSQL_PASSWORD, and MYSQL_DATABASE must be set",
                missing.join(", ")
            )));
        }

        Ok(Self {
            host: get("MYSQL_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            user: user.unwrap_or_default(),
            password: password.unwrap_or_default(),
            database: database.unwrap_or_default(),
            charset: get("MYSQL_CHARSET").unwrap_or_else(|| DEFAULT_CHARSET.to_string()),
            collation: get("MYSQL_COLLATION").unwrap_or_else(|| DEFAULT_COLLATION.to_string()),
            sql_mode: get("MYSQL_SQL_MODE").unwrap_or_else(|| DEFAULT_SQL_MODE.to_string()),
            autocommit: true,
        })
    }

    /// Build sqlx connect options from these settings.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .charset(&self.charset)
            .collation(&self.collation)
    }

    /// Session-setup statement applied right after connecting.
    pub fn session_setup(&self) -> String {
        format!(
            "SET SESSION sql_mode = '{}', SESSION autocommit = {}",
            self.sql_mode,
            if self.autocommit { 1 } else { 0 }
        )
    }
}
