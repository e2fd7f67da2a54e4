//! MCP service implementation using rmcp.
//!
//! `MySqlService` exposes one tool (`execute_sql`) via the rmcp tool-router
//! macros, and the database's tables as resources through the `ServerHandler`
//! resource methods: `mysql://tables` reads as the table list, and
//! `mysql://{table}` reads as that table's first rows.

use crate::config::ConnectionSettings;
use crate::db::{StatementOutcome, execute_statement, fetch_statement};
use crate::error::DbError;
use crate::format::{
    NO_ROWS_MESSAGE, NULL_TOKEN, RESOURCE_NULL_TOKEN, format_result_set, write_ack,
};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourceTemplatesResult,
        ListResourcesResult, PaginatedRequestParam, ProtocolVersion, RawResource,
        RawResourceTemplate, ReadResourceRequestParam, ReadResourceResult, ResourceContents,
        ServerCapabilities, ServerInfo,
    },
    schemars::JsonSchema,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

/// Fixed ceiling on rows returned by a table resource read.
pub const TABLE_ROW_LIMIT: u32 = 100;

/// URI of the table-list catalog resource.
pub const TABLES_URI: &str = "mysql://tables";

const URI_SCHEME: &str = "mysql://";

/// Input for the execute_sql tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteSqlInput {
    /// The SQL query to execute
    pub query: String,
}

/// Extract the table name from a `mysql://{table}` URI.
///
/// Returns None for the catalog URI, foreign schemes, and empty names.
pub fn table_from_uri(uri: &str) -> Option<&str> {
    let table = uri.strip_prefix(URI_SCHEME)?;
    if table.is_empty() || uri == TABLES_URI {
        return None;
    }
    Some(table)
}

#[derive(Clone)]
pub struct MySqlService {
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl Default for MySqlService {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlService {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// List table names in the order the engine reports them.
    ///
    /// Opens a fresh session per call; nothing is cached.
    async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        let settings = ConnectionSettings::resolve()?;
        let result = fetch_statement(&settings, "SHOW TABLES").await?;
        Ok(result
            .rows
            .iter()
            .filter_map(|row| row.first())
            .map(|value| value.render())
            .collect())
    }

    /// Read the first rows of a table as flat text.
    async fn read_table(&self, table: &str) -> Result<String, DbError> {
        let settings = ConnectionSettings::resolve()?;
        info!(table, "Reading table resource");
        // The table name is interpolated verbatim; an invalid name surfaces
        // as a database error from the engine.
        let sql = format!("SELECT * FROM {table} LIMIT {TABLE_ROW_LIMIT}");
        let result = fetch_statement(&settings, &sql).await?;
        Ok(format_result_set(&result, RESOURCE_NULL_TOKEN))
    }
}

#[tool_router]
impl MySqlService {
    #[tool(
        description = "Execute an SQL query on the MySQL server.\nSELECT results are returned as comma-separated text with a header line.\nOther statements report the affected row count."
    )]
    async fn execute_sql(
        &self,
        Parameters(input): Parameters<ExecuteSqlInput>,
    ) -> Result<CallToolResult, McpError> {
        info!(query = %input.query, "Executing SQL query");

        let outcome = match ConnectionSettings::resolve() {
            Ok(settings) => execute_statement(&settings, &input.query).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(StatementOutcome::Rows(result)) if result.rows.is_empty() => {
                Ok(CallToolResult::success(vec![Content::text(NO_ROWS_MESSAGE)]))
            }
            Ok(StatementOutcome::Rows(result)) => Ok(CallToolResult::success(vec![Content::text(
                format_result_set(&result, NULL_TOKEN),
            )])),
            Ok(StatementOutcome::Affected(rows_affected)) => Ok(CallToolResult::success(vec![
                Content::text(write_ack(rows_affected)),
            ])),
            Err(e) => {
                error!(error = %e, query = %input.query, "Failed to execute query");
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for MySqlService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "mysql-mcp-server".to_owned(),
                title: Some("MySQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MySQL database access.\n\
                \n\
                ## Resources\n\
                - `mysql://tables` lists the table names, one per line\n\
                - `mysql://{table}` reads the first 100 rows of a table as \
                comma-separated text with a header line\n\
                \n\
                ## Tool\n\
                - `execute_sql` runs one SQL statement. SELECT statements \
                return comma-separated text; other statements report the \
                affected row count.\n\
                \n\
                Connection settings come from MYSQL_HOST, MYSQL_PORT, \
                MYSQL_USER, MYSQL_PASSWORD, and MYSQL_DATABASE environment \
                variables; a fresh connection is opened per request."
                    .to_string(),
            ),
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            let mut resources = vec![
                RawResource {
                    uri: TABLES_URI.to_string(),
                    name: "tables".to_string(),
                    title: Some("Table list".to_string()),
                    description: Some("Names of all tables in the database".to_string()),
                    mime_type: Some("text/plain".to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                }
                .no_annotation(),
            ];

            // A listing failure degrades to just the catalog entry instead of
            // failing the whole resources/list call.
            match self.list_tables().await {
                Ok(tables) => {
                    resources.extend(tables.into_iter().map(|table| {
                        RawResource {
                            uri: format!("{URI_SCHEME}{table}"),
                            name: table.clone(),
                            title: Some(format!("Table: {table}")),
                            description: None,
                            mime_type: Some("text/plain".to_string()),
                            size: None,
                            icons: None,
                            meta: None,
                        }
                        .no_annotation()
                    }));
                }
                Err(e) => {
                    warn!(error = %e, "Failed to list tables for resources");
                }
            }

            Ok(ListResourcesResult {
                meta: None,
                resources,
                next_cursor: None,
            })
        }
    }

    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        async move {
            let templates = vec![
                RawResourceTemplate {
                    uri_template: "mysql://{table}".to_string(),
                    name: "MySQL Table".to_string(),
                    title: Some("MySQL table contents".to_string()),
                    description: Some(format!(
                        "First {TABLE_ROW_LIMIT} rows of a table as comma-separated text"
                    )),
                    mime_type: Some("text/plain".to_string()),
                }
                .no_annotation(),
            ];
            Ok(ListResourceTemplatesResult {
                meta: None,
                resource_templates: templates,
                next_cursor: None,
            })
        }
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = request.uri.clone();

            let text = if uri == TABLES_URI {
                self.list_tables()
                    .await
                    .map(|tables| tables.join("\n"))
                    .map_err(|e| {
                        error!(error = %e, "Failed to list tables");
                        McpError::from(e)
                    })?
            } else if let Some(table) = table_from_uri(&uri) {
                self.read_table(table).await.map_err(|e| {
                    error!(error = %e, table, "Failed to read table resource");
                    McpError::from(e)
                })?
            } else {
                return Err(McpError::invalid_params(
                    format!("Unknown resource URI: {uri}"),
                    None,
                ));
            };

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::TextResourceContents {
                    uri,
                    mime_type: Some("text/plain".to_string()),
                    text,
                    meta: None,
                }],
            })
        }
    }
}
