#![deny(missing_docs)]

//! # Strategies
//!
//! This module defines the architecture for pluggable server generation.
//!
//! - **traits**: Defines `ServerStrategy` for implementing new MCP frameworks.
//! - **rmcp**: The default implementation for the `rmcp` SDK.

pub mod rmcp;
pub mod traits;

pub use self::rmcp::RmcpStrategy;
pub use traits::{HandlerSpec, ServerStrategy};
