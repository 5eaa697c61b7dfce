#![deny(missing_docs)]

//! # Emitter Configuration
//!
//! The small set of knobs the code emitter and the llms.txt listing take
//! besides the IR itself.

use derive_more::Display;

/// Default listen address for network transports.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// How the generated server talks to its clients.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout.
    #[default]
    #[display("stdio")]
    Stdio,
    /// Streamable HTTP.
    #[display("http")]
    Http,
    /// Server-sent events.
    #[display("sse")]
    Sse,
    /// A user-supplied message queue bridged into a byte stream.
    #[display("custom-queue")]
    CustomQueue,
}

/// Emitter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Selected transport.
    pub transport: Transport,
    /// Prefix for resource URIs and the HTTP endpoint, without surrounding slashes.
    pub mount_path: String,
    /// Listen address for `http` and `sse`.
    pub bind_address: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self::new(Transport::default())
    }
}

impl EmitConfig {
    /// Creates a config with no mount prefix and the default bind address.
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            mount_path: String::new(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }

    /// Sets the mount prefix; leading and trailing `/` are stripped.
    pub fn with_mount_path(mut self, mount: &str) -> Self {
        self.mount_path = mount.trim_matches('/').to_string();
        self
    }

    /// Sets the listen address.
    pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    /// URI a resource is published under: `{mount}/{operation_id}` or the bare id.
    pub fn resource_uri(&self, operation_id: &str) -> String {
        if self.mount_path.is_empty() {
            operation_id.to_string()
        } else {
            format!("{}/{}", self.mount_path, operation_id)
        }
    }

    /// HTTP route the MCP endpoint is nested under.
    pub fn http_endpoint(&self) -> String {
        if self.mount_path.is_empty() {
            "/mcp".to_string()
        } else {
            format!("/{}/mcp", self.mount_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display() {
        assert_eq!(Transport::Stdio.to_string(), "stdio");
        assert_eq!(Transport::CustomQueue.to_string(), "custom-queue");
        assert_eq!(Transport::default(), Transport::Stdio);
    }

    #[test]
    fn test_mount_path_normalization() {
        let config = EmitConfig::new(Transport::Http).with_mount_path("/myapi/v1/");
        assert_eq!(config.mount_path, "myapi/v1");
        assert_eq!(config.resource_uri("get_pet"), "myapi/v1/get_pet");
        assert_eq!(config.http_endpoint(), "/myapi/v1/mcp");
    }

    #[test]
    fn test_defaults() {
        let config = EmitConfig::default();
        assert_eq!(config.resource_uri("get_pet"), "get_pet");
        assert_eq!(config.http_endpoint(), "/mcp");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    }
}
