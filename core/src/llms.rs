#![deny(missing_docs)]

//! # llms.txt Listing
//!
//! A Markdown capability listing of the generated server, written for
//! language models and humans. It walks the same IR as the code emitter.

use crate::codegen::args_type_names;
use crate::config::EmitConfig;
use crate::oas::models::{Operation, Parameter, ParsedSpec};

fn parameter_line(param: &Parameter, with_location: bool) -> String {
    let requirement = if param.required { "required" } else { "optional" };
    let mut line = if with_location {
        format!(
            "    - `{}` ({}, {}, {})",
            param.original_name,
            param.location.as_str(),
            param.ty,
            requirement
        )
    } else {
        format!("    - `{}` ({}, {})", param.original_name, param.ty, requirement)
    };
    if let Some(desc) = &param.description {
        line.push_str(": ");
        line.push_str(&one_line(desc));
    }
    line.push('\n');
    line
}

/// Collapses a multi-line description into one line.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn returns(op: &Operation) -> String {
    op.response_body
        .as_ref()
        .map(|ty| format!("`{}`", ty))
        .unwrap_or_else(|| "nothing".to_string())
}

fn common_lines(op: &Operation, out: &mut String) {
    out.push_str(&format!("  - OpenAPI: `{} {}`\n", op.method, op.path));
    if let Some(desc) = &op.description {
        out.push_str(&format!("  - Description: {}\n", one_line(desc)));
    }
    if op.deprecated {
        out.push_str("  - Deprecated\n");
    }
}

/// Generates the llms.txt document.
///
/// # Arguments
///
/// * `spec` - The parsed document.
/// * `config` - Used for resource URIs and the transport line.
pub fn generate_llms_txt(spec: &ParsedSpec, config: &EmitConfig) -> String {
    let args_names = args_type_names(spec);
    let mut out = String::new();

    // 1. Title block
    out.push_str(&format!("# {}\n\n", spec.info.title));
    let summary = spec
        .info
        .description
        .as_deref()
        .map(one_line)
        .unwrap_or_else(|| "MCP server generated from an OpenAPI document.".to_string());
    out.push_str(&format!("> {}\n\n", summary));
    out.push_str(&format!("- Version: {}\n", spec.info.version));
    out.push_str(&format!("- Transport: {}\n\n", config.transport));

    // 2. Resources
    out.push_str("## Resources\n\n");
    let resources: Vec<&Operation> = spec.operations.iter().filter(|op| op.is_resource()).collect();
    if resources.is_empty() {
        out.push_str("No resources defined.\n");
    }
    for op in &resources {
        out.push_str(&format!(
            "- `{}`: {}\n",
            config.resource_uri(&op.identifier),
            op.summary.as_deref().map(one_line).unwrap_or_default()
        ));
        common_lines(op, &mut out);
        out.push_str(&format!("  - Returns: {}\n", returns(op)));
        if !op.parameters.is_empty() {
            out.push_str("  - Query parameters:\n");
            for param in &op.parameters {
                out.push_str(&parameter_line(param, false));
            }
        }
    }
    out.push('\n');

    // 3. Tools
    out.push_str("## Tools\n\n");
    let tools: Vec<&Operation> = spec.operations.iter().filter(|op| !op.is_resource()).collect();
    if tools.is_empty() {
        out.push_str("No tools defined.\n");
    }
    for op in &tools {
        out.push_str(&format!(
            "- `{}`: {}\n",
            op.identifier,
            op.summary.as_deref().map(one_line).unwrap_or_default()
        ));
        common_lines(op, &mut out);
        if let Some(args) = args_names.get(&op.identifier) {
            out.push_str(&format!("  - Input: `{}`\n", args));
        }
        if let Some(body) = &op.request_body {
            out.push_str(&format!("  - Request body: `{}`\n", body));
        }
        if !op.parameters.is_empty() {
            out.push_str("  - Parameters:\n");
            for param in &op.parameters {
                out.push_str(&parameter_line(param, true));
            }
        }
        out.push_str(&format!("  - Returns: {}\n", returns(op)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Transport;
    use crate::oas::document::{parse_document_str, DocumentFormat};
    use crate::oas::context::parse_document;

    fn parse(yaml: &str) -> ParsedSpec {
        let doc = parse_document_str(yaml, DocumentFormat::Yaml).unwrap();
        parse_document(&doc).unwrap()
    }

    #[test]
    fn test_llms_txt_sections() {
        let spec = parse(
            r#"
openapi: 3.0.0
info:
  title: Petstore
  version: '1.0'
  description: Sells pets.
paths:
  /pets/{petId}:
    get:
      operationId: showPetById
      summary: Info for a specific pet
      parameters:
        - name: petId
          in: path
          schema: {type: integer}
          description: The id
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Pet'}
    delete:
      summary: Remove a pet
      deprecated: true
      parameters:
        - name: petId
          in: path
          schema: {type: integer}
      responses:
        '204': {description: gone}
components:
  schemas:
    Pet:
      type: object
      properties:
        id: {type: integer}
"#,
        );
        let config = EmitConfig::new(Transport::Http).with_mount_path("petstore");
        let text = generate_llms_txt(&spec, &config);

        assert!(text.starts_with("# Petstore\n\n> Sells pets.\n\n- Version: 1.0\n- Transport: http\n"));
        assert!(text.contains(
            "- `petstore/show_pet_by_id`: Info for a specific pet\n  - OpenAPI: `GET /pets/{petId}`\n  - Returns: `Pet`\n  - Query parameters:\n    - `petId` (integer, required): The id\n"
        ));
        assert!(text.contains("- `delete_pets_by_pet_id`: Remove a pet\n"));
        assert!(text.contains("  - Deprecated\n"));
        assert!(text.contains("  - Input: `DeletePetsByPetIdArgs`\n"));
        assert!(text.contains("    - `petId` (path, integer, required)\n"));
        assert!(text.contains("  - Returns: nothing\n"));
    }

    #[test]
    fn test_llms_txt_empty_sections() {
        let spec = parse("openapi: 3.1.0\ninfo: {title: Empty, version: '0'}\npaths: {}\n");
        let text = generate_llms_txt(&spec, &EmitConfig::default());
        assert!(text.contains("## Resources\n\nNo resources defined.\n"));
        assert!(text.contains("## Tools\n\nNo tools defined.\n"));
        assert!(text.contains("> MCP server generated from an OpenAPI document."));
    }
}
