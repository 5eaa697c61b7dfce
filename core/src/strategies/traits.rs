#![deny(missing_docs)]

//! # Server Strategy Trait
//!
//! Defines the interface required to render an MCP server for a specific
//! framework. The emitter prepares framework-neutral descriptors and asks the
//! strategy for each fragment.

use crate::config::EmitConfig;
use crate::oas::models::ApiInfo;

/// Framework-neutral view of one operation, prepared by the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSpec {
    /// Operation identifier; used as the method and tool name.
    pub name: String,
    /// `GET /pets/{petId}`
    pub route: String,
    /// Resource URI (resources only).
    pub uri: Option<String>,
    /// One-line description for listings.
    pub description: String,
    /// Rust type of the argument struct, when the operation takes any input.
    pub args_type: Option<String>,
    /// Rust type of the successful response; `()` when the response has no body.
    pub response_type: String,
    /// Operation is marked deprecated.
    pub deprecated: bool,
}

/// A strategy trait for decoupling framework-specific server generation.
///
/// Implementors define imports, the server struct, per-operation methods,
/// the protocol handler and the transport bootstrap.
pub trait ServerStrategy {
    /// Crates the generated file depends on for the given config.
    fn dependencies(&self, config: &EmitConfig) -> Vec<&'static str>;

    /// `use` lines for the generated file.
    fn imports(&self, config: &EmitConfig) -> String;

    /// Derive list applied to models and argument structs.
    fn model_derives(&self) -> &'static str;

    /// Declares the server struct and its constructor.
    ///
    /// # Arguments
    ///
    /// * `server` - Type name of the server.
    /// * `has_tools` - Whether any tool methods follow.
    fn server_struct(&self, server: &str, has_tools: bool) -> String;

    /// Renders one tool method (non-GET operation).
    fn tool_method(&self, handler: &HandlerSpec) -> String;

    /// Renders one resource reader (GET operation).
    fn resource_method(&self, handler: &HandlerSpec) -> String;

    /// Wraps the rendered tool methods in their impl block.
    fn tool_block(&self, server: &str, methods: &str) -> String;

    /// Wraps the rendered resource readers in their impl block.
    fn resource_block(&self, server: &str, methods: &str) -> String;

    /// Implements the protocol handler: server info, resource listing and dispatch.
    ///
    /// # Arguments
    ///
    /// * `server` - Type name of the server.
    /// * `info` - Document metadata for the server instructions.
    /// * `resources` - Every GET operation, in document order.
    /// * `has_tools` - Whether tool routing must be wired in.
    fn handler_impl(
        &self,
        server: &str,
        info: &ApiInfo,
        resources: &[HandlerSpec],
        has_tools: bool,
    ) -> String;

    /// Returns the `main` function for the selected transport.
    fn main_fn(&self, server: &str, config: &EmitConfig) -> String;

    /// Named regex patterns a well-formed generated file is expected to match.
    fn check_patterns(&self) -> Vec<(&'static str, &'static str)>;
}
