#![deny(missing_docs)]

//! # rmcp Strategy
//!
//! Implementation of `ServerStrategy` for the `rmcp` Model Context Protocol SDK.
//! Tools are routed through `#[tool_router]`; resources are listed and
//! dispatched by hand in the `ServerHandler` impl.

use crate::config::{EmitConfig, Transport};
use crate::oas::models::ApiInfo;
use crate::strategies::traits::{HandlerSpec, ServerStrategy};

/// Strategy for generating `rmcp` servers.
pub struct RmcpStrategy;

impl ServerStrategy for RmcpStrategy {
    fn dependencies(&self, config: &EmitConfig) -> Vec<&'static str> {
        let mut deps = vec![
            "anyhow",
            "rmcp",
            "schemars",
            "serde",
            "serde_json",
            "tokio",
            "tracing-subscriber",
        ];
        if config.transport == Transport::Http {
            deps.push("axum");
        }
        deps
    }

    fn imports(&self, config: &EmitConfig) -> String {
        let mut imports = String::new();
        imports.push_str("use rmcp::handler::server::router::tool::ToolRouter;\n");
        imports.push_str("use rmcp::handler::server::wrapper::Parameters;\n");
        imports.push_str("use rmcp::model as mcp;\n");
        imports.push_str("use rmcp::service::RequestContext;\n");
        imports.push_str(
            "use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};\n",
        );
        if config.transport == Transport::Http {
            imports.push_str("use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;\n");
            imports.push_str("use rmcp::transport::streamable_http_server::StreamableHttpService;\n");
        }
        imports
    }

    fn model_derives(&self) -> &'static str {
        "Debug, Clone, serde::Serialize, serde::Deserialize, schemars::JsonSchema"
    }

    fn server_struct(&self, server: &str, has_tools: bool) -> String {
        let mut code = String::new();
        code.push_str("/// MCP server exposing the API operations.\n");
        code.push_str("#[derive(Clone)]\n");
        if has_tools {
            code.push_str(&format!(
                "pub struct {} {{\n    tool_router: ToolRouter<Self>,\n}}\n\n",
                server
            ));
        } else {
            code.push_str(&format!("pub struct {} {{}}\n\n", server));
        }

        code.push_str(&format!("impl Default for {} {{\n", server));
        code.push_str("    fn default() -> Self {\n        Self::new()\n    }\n}\n\n");

        code.push_str(&format!("impl {} {{\n", server));
        code.push_str("    /// Creates the server.\n");
        code.push_str("    pub fn new() -> Self {\n");
        if has_tools {
            code.push_str("        Self {\n            tool_router: Self::tool_router(),\n        }\n");
        } else {
            code.push_str("        Self {}\n");
        }
        code.push_str("    }\n}\n");
        code
    }

    fn tool_method(&self, handler: &HandlerSpec) -> String {
        let mut code = String::new();
        code.push_str(&method_docs(handler, None));
        code.push_str(&format!(
            "    #[tool(name = {:?}, description = {:?})]\n",
            handler.name, handler.description
        ));
        match &handler.args_type {
            Some(args) => code.push_str(&format!(
                "    async fn {}(&self, Parameters(args): Parameters<{}>) -> Result<mcp::CallToolResult, McpError> {{\n        let _ = args;\n",
                handler.name, args
            )),
            None => code.push_str(&format!(
                "    async fn {}(&self) -> Result<mcp::CallToolResult, McpError> {{\n",
                handler.name
            )),
        }
        code.push_str(&format!(
            "        Err(not_implemented({:?}))\n    }}\n",
            handler.name
        ));
        code
    }

    fn resource_method(&self, handler: &HandlerSpec) -> String {
        let mut code = String::new();
        code.push_str(&method_docs(handler, handler.uri.as_deref()));
        if handler.deprecated {
            code.push_str("    #[deprecated]\n");
        }
        let args = handler
            .args_type
            .as_ref()
            .map(|ty| format!(", args: {}", ty))
            .unwrap_or_default();
        code.push_str(&format!(
            "    pub async fn {}(&self{}) -> Result<{}, McpError> {{\n",
            handler.name, args, handler.response_type
        ));
        if handler.args_type.is_some() {
            code.push_str("        let _ = args;\n");
        }
        code.push_str(&format!(
            "        Err(not_implemented({:?}))\n    }}\n",
            handler.name
        ));
        code
    }

    fn tool_block(&self, server: &str, methods: &str) -> String {
        format!("#[tool_router]\nimpl {} {{\n{}}}\n", server, methods)
    }

    fn resource_block(&self, server: &str, methods: &str) -> String {
        format!("impl {} {{\n{}}}\n", server, methods)
    }

    fn handler_impl(
        &self,
        server: &str,
        info: &ApiInfo,
        resources: &[HandlerSpec],
        has_tools: bool,
    ) -> String {
        let mut code = String::new();

        // 1. Attribute and server info
        if has_tools {
            code.push_str("#[tool_handler]\n");
        }
        code.push_str(&format!("impl ServerHandler for {} {{\n", server));
        let mut instructions = format!("{} {}", info.title, info.version);
        if let Some(desc) = &info.description {
            instructions.push_str(": ");
            instructions.push_str(desc);
        }
        let capabilities = if has_tools {
            "mcp::ServerCapabilities::builder().enable_tools().enable_resources().build()"
        } else {
            "mcp::ServerCapabilities::builder().enable_resources().build()"
        };
        code.push_str("    fn get_info(&self) -> mcp::ServerInfo {\n");
        code.push_str("        mcp::ServerInfo {\n");
        code.push_str(&format!(
            "            instructions: Some({:?}.into()),\n",
            instructions
        ));
        code.push_str(&format!("            capabilities: {},\n", capabilities));
        code.push_str("            ..Default::default()\n        }\n    }\n\n");

        // 2. Resource listing
        code.push_str("    async fn list_resources(\n        &self,\n        _request: Option<mcp::PaginatedRequestParam>,\n        _context: RequestContext<RoleServer>,\n    ) -> Result<mcp::ListResourcesResult, McpError> {\n");
        code.push_str("        Ok(mcp::ListResourcesResult {\n            resources: vec![\n");
        for res in resources {
            code.push_str(&format!(
                "                resource({:?}, {:?}, {:?}),\n",
                res.uri.as_deref().unwrap_or(&res.name),
                res.name,
                res.description
            ));
        }
        code.push_str("            ],\n            next_cursor: None,\n        })\n    }\n\n");

        // 3. Resource dispatch
        code.push_str("    async fn read_resource(\n        &self,\n        request: mcp::ReadResourceRequestParam,\n        _context: RequestContext<RoleServer>,\n    ) -> Result<mcp::ReadResourceResult, McpError> {\n");
        code.push_str("        let (path, query) = split_uri(&request.uri);\n");
        code.push_str("        let _ = query;\n");
        code.push_str("        match path {\n");
        for res in resources {
            let uri = res.uri.as_deref().unwrap_or(&res.name);
            code.push_str(&format!("            {:?} => {{\n", uri));
            if res.args_type.is_some() {
                code.push_str("                let args = query_args(query)?;\n");
                code.push_str(&format!(
                    "                let result = self.{}(args).await?;\n",
                    res.name
                ));
            } else {
                code.push_str(&format!(
                    "                let result = self.{}().await?;\n",
                    res.name
                ));
            }
            code.push_str("                json_contents(&request.uri, &result)\n            }\n");
        }
        code.push_str("            _ => Err(McpError::resource_not_found(\n                format!(\"unknown resource: {}\", request.uri),\n                None,\n            )),\n");
        code.push_str("        }\n    }\n}\n\n");

        // 4. Helpers
        code.push_str(HANDLER_HELPERS);
        code
    }

    fn main_fn(&self, server: &str, config: &EmitConfig) -> String {
        let mut code = String::new();
        if matches!(config.transport, Transport::Http | Transport::Sse) {
            code.push_str(&format!(
                "const BIND_ADDRESS: &str = {:?};\n\n",
                config.bind_address
            ));
        }

        code.push_str("#[tokio::main]\nasync fn main() -> anyhow::Result<()> {\n");
        code.push_str("    tracing_subscriber::fmt()\n        .with_writer(std::io::stderr)\n        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())\n        .init();\n\n");

        match config.transport {
            Transport::Stdio => {
                code.push_str(&format!(
                    "    let service = {}::new().serve(rmcp::transport::stdio()).await?;\n",
                    server
                ));
                code.push_str("    service.waiting().await?;\n");
            }
            Transport::Http => {
                code.push_str(&format!(
                    "    let service = StreamableHttpService::new(\n        || Ok({}::new()),\n        LocalSessionManager::default().into(),\n        Default::default(),\n    );\n",
                    server
                ));
                code.push_str(&format!(
                    "    let router = axum::Router::new().nest_service({:?}, service);\n",
                    config.http_endpoint()
                ));
                code.push_str("    let listener = tokio::net::TcpListener::bind(BIND_ADDRESS).await?;\n");
                code.push_str("    axum::serve(listener, router)\n        .with_graceful_shutdown(async {\n            let _ = tokio::signal::ctrl_c().await;\n        })\n        .await?;\n");
            }
            Transport::Sse => {
                code.push_str("    let ct = rmcp::transport::sse_server::SseServer::serve(BIND_ADDRESS.parse()?)\n        .await?\n");
                code.push_str(&format!("        .with_service({}::new);\n", server));
                code.push_str("    tokio::signal::ctrl_c().await?;\n    ct.cancel();\n");
            }
            Transport::CustomQueue => {
                code.push_str("    let (reader, writer) = connect_queue().await?;\n");
                code.push_str(&format!(
                    "    let service = {}::new().serve((reader, writer)).await?;\n",
                    server
                ));
                code.push_str("    service.waiting().await?;\n");
            }
        }
        code.push_str("    Ok(())\n}\n");

        if config.transport == Transport::CustomQueue {
            code.push_str(QUEUE_BRIDGE);
        }
        code
    }

    fn check_patterns(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("model definition", r"#\[derive\([^)]*serde::Serialize"),
            ("server struct", r"pub struct \w+Server\d*\b"),
            ("resource definition", r"async fn read_resource\("),
            ("tool definition", r"#\[tool\(name = "),
            ("main function", r"async fn main\(\)"),
            ("serve call", r"\.serve\(|axum::serve\(|SseServer::serve\("),
        ]
    }
}

/// Doc block shared by tool and resource methods.
fn method_docs(handler: &HandlerSpec, uri: Option<&str>) -> String {
    let mut code = String::new();
    for line in handler.description.lines() {
        if line.trim().is_empty() {
            code.push_str("    ///\n");
        } else {
            code.push_str(&format!("    /// {}\n", line.trim_end()));
        }
    }
    code.push_str("    ///\n");
    code.push_str(&format!("    /// `{}`", handler.route));
    if let Some(uri) = uri {
        code.push_str(&format!(", published as `{}`", uri));
    }
    code.push_str(&format!(". Returns `{}`.\n", handler.response_type));
    if handler.deprecated {
        code.push_str("    ///\n    /// Deprecated upstream.\n");
    }
    code
}

const HANDLER_HELPERS: &str = r#"fn not_implemented(name: &str) -> McpError {
    McpError::internal_error(format!("{name} is not implemented"), None)
}

fn resource(uri: &str, name: &str, description: &str) -> mcp::Resource {
    let mut raw = mcp::RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());
    mcp::Annotated::new(raw, None)
}

fn split_uri(uri: &str) -> (&str, &str) {
    uri.split_once('?').unwrap_or((uri, ""))
}

fn query_args<T: serde::de::DeserializeOwned>(query: &str) -> Result<T, McpError> {
    let mut object = serde_json::Map::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        object.insert(key.to_string(), value);
    }
    serde_json::from_value(serde_json::Value::Object(object))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

fn json_contents<T: serde::Serialize>(uri: &str, value: &T) -> Result<mcp::ReadResourceResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(mcp::ReadResourceResult {
        contents: vec![mcp::ResourceContents::text(text, uri)],
    })
}

"#;

const QUEUE_BRIDGE: &str = r#"
/// Connects the server to its message queue.
///
/// Replace the in-memory pipe with a real queue client. Any
/// `AsyncRead + AsyncWrite` pair can carry the protocol.
async fn connect_queue() -> anyhow::Result<(
    tokio::io::ReadHalf<tokio::io::DuplexStream>,
    tokio::io::WriteHalf<tokio::io::DuplexStream>,
)> {
    let (_client, server) = tokio::io::duplex(64 * 1024);
    Ok(tokio::io::split(server))
}
"#;
