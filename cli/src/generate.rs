#![deny(missing_docs)]

//! # Generate Command
//!
//! Parses an OpenAPI document and writes the MCP server source plus its
//! llms.txt listing.

use std::fs;
use std::path::{Path, PathBuf};

use oas2mcp_core::strategies::ServerStrategy;
use oas2mcp_core::{
    generate_llms_txt, generate_server, load_spec, EmitConfig, ParsedSpec, Transport,
    DEFAULT_BIND_ADDRESS,
};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

/// File name of the capability listing.
const LLMS_TXT: &str = "llms.txt";

/// Transport choices on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportArg {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP.
    Http,
    /// Server-sent events.
    Sse,
    /// User-supplied message queue.
    CustomQueue,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => Transport::Stdio,
            TransportArg::Http => Transport::Http,
            TransportArg::Sse => Transport::Sse,
            TransportArg::CustomQueue => Transport::CustomQueue,
        }
    }
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI document (.json, .yaml or .yml).
    #[clap(short, long)]
    pub input: PathBuf,

    /// Output path for the generated server source.
    #[clap(short, long)]
    pub output: PathBuf,

    /// Transport the generated server listens on.
    #[clap(short, long, value_enum, default_value_t = TransportArg::Stdio, env = "OAS2MCP_TRANSPORT")]
    pub transport: TransportArg,

    /// llms.txt is written next to this path (defaults to the output directory).
    #[clap(long)]
    pub llms_txt_file: Option<PathBuf>,

    /// URI prefix for resources and the HTTP endpoint.
    #[clap(long, default_value = "", env = "OAS2MCP_MOUNT")]
    pub mount: String,

    /// Listen address for the http and sse transports.
    #[clap(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    /// Also write the parsed intermediate representation as JSON.
    #[clap(long)]
    pub dump_ir: Option<PathBuf>,
}

impl GenerateArgs {
    /// Emitter settings derived from the flags.
    pub fn emit_config(&self) -> EmitConfig {
        EmitConfig::new(self.transport.into())
            .with_mount_path(&self.mount)
            .with_bind_address(self.bind.clone())
    }

    /// Where llms.txt goes: beside `--llms-txt-file`, else beside the output file.
    pub fn llms_txt_path(&self) -> PathBuf {
        let anchor = self.llms_txt_file.as_ref().unwrap_or(&self.output);
        anchor
            .parent()
            .map(|dir| dir.join(LLMS_TXT))
            .unwrap_or_else(|| PathBuf::from(LLMS_TXT))
    }
}

fn write_file(path: &Path, content: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::General(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(path, content)
        .map_err(|e| CliError::General(format!("Failed to write {}: {}", path.display(), e)))
}

fn dump_ir(spec: &ParsedSpec, path: &Path) -> CliResult<()> {
    let json = serde_json::to_string_pretty(spec)
        .map_err(|e| CliError::General(format!("Failed to serialize IR: {}", e)))?;
    write_file(path, &json)
}

/// Executes the generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `strategy` - The server strategy (e.g. rmcp) used to render code.
pub fn execute(args: &GenerateArgs, strategy: &impl ServerStrategy) -> CliResult<ParsedSpec> {
    // 1. Load and parse
    let spec = load_spec(&args.input)?;
    info!(
        title = %spec.info.title,
        models = spec.models.len(),
        operations = spec.operations.len(),
        "Parsed OpenAPI document"
    );

    // 2. Optional IR dump
    if let Some(path) = &args.dump_ir {
        dump_ir(&spec, path)?;
        info!(path = %path.display(), "Wrote intermediate representation");
    }

    // 3. Server source
    let config = args.emit_config();
    let code = generate_server(&spec, &config, strategy);
    write_file(&args.output, &code)?;
    info!(path = %args.output.display(), transport = %config.transport, "Wrote server source");

    // 4. llms.txt (best effort)
    let llms_path = args.llms_txt_path();
    match write_file(&llms_path, &generate_llms_txt(&spec, &config)) {
        Ok(()) => info!(path = %llms_path.display(), "Wrote llms.txt"),
        Err(e) => warn!(path = %llms_path.display(), "Skipping llms.txt: {}", e),
    }

    // 5. Summary
    let degraded = spec.diagnostics.degraded_count();
    if degraded > 0 {
        warn!(degraded, "Some constructs could not be resolved and were typed as Any");
    } else {
        info!("All constructs resolved");
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oas2mcp_core::RmcpStrategy;
    use tempfile::tempdir;

    fn args(input: PathBuf, output: PathBuf) -> GenerateArgs {
        GenerateArgs {
            input,
            output,
            transport: TransportArg::Stdio,
            llms_txt_file: None,
            mount: String::new(),
            bind: DEFAULT_BIND_ADDRESS.to_string(),
            dump_ir: None,
        }
    }

    const PETSTORE: &str = r#"
openapi: 3.0.0
info: {title: Petstore, version: 1.0.0}
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Pet'}
components:
  schemas:
    Pet:
      type: object
      properties:
        owner: {$ref: '#/components/schemas/Missing'}
"#;

    #[test]
    fn test_execute_writes_server_and_llms_txt() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, PETSTORE).unwrap();
        let output = dir.path().join("gen/server.rs");

        let spec = execute(&args(input, output.clone()), &RmcpStrategy).unwrap();

        assert_eq!(spec.diagnostics.degraded_count(), 1);
        let code = fs::read_to_string(&output).unwrap();
        assert!(code.contains("pub struct PetstoreServer"));
        let llms = fs::read_to_string(dir.path().join("gen/llms.txt")).unwrap();
        assert!(llms.contains("- `list_pets`"));
    }

    #[test]
    fn test_llms_txt_location_and_ir_dump() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, PETSTORE).unwrap();

        let mut a = args(input, dir.path().join("server.rs"));
        a.llms_txt_file = Some(dir.path().join("docs/anything.txt"));
        a.dump_ir = Some(dir.path().join("ir.json"));
        a.mount = "/api/".into();
        assert_eq!(a.emit_config().mount_path, "api");

        execute(&a, &RmcpStrategy).unwrap();

        let llms = fs::read_to_string(dir.path().join("docs/llms.txt")).unwrap();
        assert!(llms.contains("- `api/list_pets`"));
        let ir: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("ir.json")).unwrap()).unwrap();
        assert_eq!(ir["operations"][0]["identifier"], "list_pets");
    }

    #[test]
    fn test_execute_rejects_invalid_document() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, "openapi: 2.0\ninfo: {title: T, version: '1'}\npaths: {}\n").unwrap();
        let output = dir.path().join("server.rs");

        let err = execute(&args(input, output.clone()), &RmcpStrategy).unwrap_err();
        assert!(err.to_string().contains("Only OpenAPI 3.x is supported"));
        assert!(!output.exists());
    }

    #[test]
    fn test_llms_txt_path_for_bare_file_name() {
        let a = args(PathBuf::from("api.yaml"), PathBuf::from("server.rs"));
        assert_eq!(a.llms_txt_path(), PathBuf::from("llms.txt"));
    }
}
