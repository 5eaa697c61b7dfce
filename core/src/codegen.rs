#![deny(missing_docs)]

//! # Code Generation
//!
//! Renders a parsed document into the source of a single-file MCP server.
//!
//! The framework-neutral parts live here:
//! - Type rendering (`TypeRef` to Rust type text, `Option`/`Box` wrapping).
//! - Model structs and aliases, one argument struct per operation.
//! - Mapping operations to resources (GET) and tools (everything else).
//!
//! Framework fragments come from a `ServerStrategy`.

use crate::config::EmitConfig;
use crate::oas::models::{Model, ModelField, Operation, ParsedSpec, PrimitiveKind, TypeRef};
use crate::oas::naming::{disambiguate, sanitize_type};
use crate::strategies::{HandlerSpec, ServerStrategy};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Module the generated models live in.
const MODELS_MODULE: &str = "models";
/// Module the generated argument structs live in.
const ARGS_MODULE: &str = "args";

/// Renders a type descriptor as Rust type text.
///
/// # Arguments
///
/// * `ty` - The descriptor.
/// * `model_path` - Path prefix for model names (e.g. `models::`), empty inside the models module.
pub fn rust_type(ty: &TypeRef, model_path: &str) -> String {
    match ty {
        TypeRef::Primitive(kind) => primitive_type(*kind).to_string(),
        TypeRef::NamedModel(id) | TypeRef::CircularRef(id) => format!("{}{}", model_path, id),
        TypeRef::List(inner) => format!("Vec<{}>", rust_type(inner, model_path)),
        TypeRef::Map(inner) => format!(
            "std::collections::HashMap<String, {}>",
            rust_type(inner, model_path)
        ),
        TypeRef::Any => "serde_json::Value".to_string(),
    }
}

fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "String",
        PrimitiveKind::Integer => "i64",
        PrimitiveKind::Number => "f64",
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Bytes => "Vec<u8>",
        PrimitiveKind::Date => "chrono::NaiveDate",
        PrimitiveKind::DateTime => "chrono::DateTime<chrono::Utc>",
    }
}

/// Type name of the generated server, derived from the API title.
pub fn server_type_name(spec: &ParsedSpec) -> String {
    let base = sanitize_type(&format!("{}_Server", spec.info.title));
    disambiguate(&base, "", |candidate| spec.models.contains_key(candidate))
}

/// Argument struct names per operation identifier.
///
/// Only operations with parameters or a request body get one.
pub fn args_type_names(spec: &ParsedSpec) -> HashMap<String, String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = HashMap::new();
    for op in &spec.operations {
        if op.parameters.is_empty() && op.request_body.is_none() {
            continue;
        }
        let base = sanitize_type(&format!("{}_Args", op.identifier));
        let name = disambiguate(&base, "", |c| taken.contains(c));
        taken.insert(name.clone());
        names.insert(op.identifier.clone(), name);
    }
    names
}

/// Models a model points at without an indirection (`Vec`, `HashMap`) in between.
fn direct_edges(model: &Model) -> Vec<&str> {
    match &model.alias {
        Some(TypeRef::NamedModel(id)) => vec![id.as_str()],
        Some(_) => Vec::new(),
        None => model
            .fields
            .iter()
            .filter_map(|f| f.ty.model_identifier())
            .collect(),
    }
}

/// Returns true when embedding `target` by value inside `owner` would give
/// `owner` an infinite size.
pub fn is_directly_recursive(spec: &ParsedSpec, owner: &str, target: &str) -> bool {
    let mut stack = vec![target];
    let mut seen: HashSet<&str> = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == owner {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(model) = spec.model(current) {
            stack.extend(direct_edges(model));
        }
    }
    false
}

/// Returns true when following alias targets from `model` leads back to it.
///
/// Rust rejects cyclic type aliases (`type Json = Vec<Json>`), so such a
/// model is emitted as a transparent newtype instead.
fn alias_reaches_itself(spec: &ParsedSpec, model: &Model) -> bool {
    let mut stack = Vec::new();
    if let Some(alias) = &model.alias {
        alias.referenced_models(&mut stack);
    }
    let mut seen: HashSet<&str> = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == model.identifier {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(alias) = spec.model(current).and_then(|m| m.alias.as_ref()) {
            alias.referenced_models(&mut stack);
        }
    }
    false
}

/// Rust type of a model field: boxed when recursive, optional when not required or nullable.
pub fn field_type(spec: &ParsedSpec, owner: &str, field: &ModelField) -> String {
    let mut ty = rust_type(&field.ty, "");
    if let Some(target) = field.ty.model_identifier() {
        if is_directly_recursive(spec, owner, target) {
            ty = format!("Box<{}>", ty);
        }
    }
    if !field.required || field.nullable {
        ty = format!("Option<{}>", ty);
    }
    ty
}

fn doc_comment(text: Option<&str>, indent: &str) -> String {
    let mut code = String::new();
    if let Some(text) = text {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                code.push_str(&format!("{}///\n", indent));
            } else {
                code.push_str(&format!("{}/// {}\n", indent, line));
            }
        }
    }
    code
}

/// `#[serde(...)]` attributes for a field or parameter.
fn serde_attrs(original: &str, identifier: &str, optional: bool) -> Vec<String> {
    let mut attrs = Vec::new();
    if original != identifier {
        attrs.push(format!("rename = {:?}", original));
    }
    if optional {
        attrs.push("default".to_string());
        attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
    }
    attrs
}

/// Renders one registry entry as a struct or a type alias.
fn generate_model(spec: &ParsedSpec, model: &Model, derives: &str) -> String {
    let mut code = String::new();
    code.push_str(&doc_comment(model.description.as_deref(), ""));

    match &model.alias {
        Some(TypeRef::CircularRef(target)) => {
            code.push_str(&format!(
                "// `{}` only refers back to itself through `{}`.\n",
                model.identifier, target
            ));
            code.push_str(&format!(
                "pub type {} = serde_json::Value;\n",
                model.identifier
            ));
        }
        Some(alias) if alias_reaches_itself(spec, model) => {
            code.push_str(&format!("#[derive({})]\n", derives));
            code.push_str("#[serde(transparent)]\n");
            code.push_str(&format!(
                "pub struct {}(pub {});\n",
                model.identifier,
                rust_type(alias, "")
            ));
        }
        Some(alias) => {
            code.push_str(&format!(
                "pub type {} = {};\n",
                model.identifier,
                rust_type(alias, "")
            ));
        }
        None => {
            code.push_str(&format!("#[derive({})]\n", derives));
            code.push_str(&format!("pub struct {} {{\n", model.identifier));
            for field in &model.fields {
                code.push_str(&doc_comment(field.description.as_deref(), "    "));
                let optional = !field.required || field.nullable;
                let attrs = serde_attrs(&field.original_name, &field.identifier, optional);
                if !attrs.is_empty() {
                    code.push_str(&format!("    #[serde({})]\n", attrs.join(", ")));
                }
                code.push_str(&format!(
                    "    pub {}: {},\n",
                    field.identifier,
                    field_type(spec, &model.identifier, field)
                ));
            }
            code.push_str("}\n");
        }
    }
    code
}

/// Renders the input struct of one operation: its parameters plus the request body.
fn generate_args_struct(op: &Operation, name: &str, derives: &str) -> String {
    let model_path = format!("super::{}::", MODELS_MODULE);
    let mut code = String::new();
    code.push_str(&format!(
        "/// Input of `{}` (`{} {}`).\n",
        op.identifier, op.method, op.path
    ));
    code.push_str(&format!("#[derive({})]\n", derives));
    code.push_str(&format!("pub struct {} {{\n", name));

    let mut taken: HashSet<&str> = HashSet::new();
    for param in &op.parameters {
        taken.insert(&param.identifier);
        let location_note = format!("`{}` parameter.", param.location.as_str());
        let doc = match &param.description {
            Some(desc) => format!("{}\n\n{}", desc, location_note),
            None => location_note,
        };
        code.push_str(&doc_comment(Some(&doc), "    "));
        let attrs = serde_attrs(&param.original_name, &param.identifier, !param.required);
        if !attrs.is_empty() {
            code.push_str(&format!("    #[serde({})]\n", attrs.join(", ")));
        }
        let ty = rust_type(&param.ty, &model_path);
        let ty = if param.required {
            ty
        } else {
            format!("Option<{}>", ty)
        };
        code.push_str(&format!("    pub {}: {},\n", param.identifier, ty));
    }

    if let Some(body) = &op.request_body {
        let field = disambiguate("body", "_", |c| taken.contains(c));
        code.push_str("    /// Request body.\n");
        code.push_str(&format!(
            "    pub {}: {},\n",
            field,
            rust_type(body, &model_path)
        ));
    }
    code.push_str("}\n");
    code
}

/// Builds the framework-neutral descriptor of one operation.
fn handler_spec(op: &Operation, config: &EmitConfig, args: Option<&String>) -> HandlerSpec {
    let description = op
        .summary
        .clone()
        .or_else(|| op.description.clone())
        .unwrap_or_else(|| format!("{} {}", op.method, op.path));
    HandlerSpec {
        name: op.identifier.clone(),
        route: format!("{} {}", op.method, op.path),
        uri: op
            .is_resource()
            .then(|| config.resource_uri(&op.identifier)),
        description,
        args_type: args.map(|name| format!("{}::{}", ARGS_MODULE, name)),
        response_type: op
            .response_body
            .as_ref()
            .map(|ty| rust_type(ty, &format!("{}::", MODELS_MODULE)))
            .unwrap_or_else(|| "()".to_string()),
        deprecated: op.deprecated,
    }
}

/// Indents every non-empty line by four spaces.
fn indent(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str("    ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Crates the generated file needs beyond the strategy's own.
fn collect_dependencies(spec: &ParsedSpec, deps: &mut BTreeSet<&'static str>) {
    fn visit(ty: &TypeRef, deps: &mut BTreeSet<&'static str>) {
        match ty {
            TypeRef::Primitive(PrimitiveKind::Date | PrimitiveKind::DateTime) => {
                deps.insert("chrono");
            }
            TypeRef::List(inner) | TypeRef::Map(inner) => visit(inner, deps),
            _ => {}
        }
    }

    for model in spec.models.values() {
        if let Some(alias) = &model.alias {
            visit(alias, deps);
        }
        for field in &model.fields {
            visit(&field.ty, deps);
        }
    }
    for op in &spec.operations {
        for param in &op.parameters {
            visit(&param.ty, deps);
        }
        for ty in op.request_body.iter().chain(op.response_body.iter()) {
            visit(ty, deps);
        }
    }
}

/// Generates the complete server source.
///
/// # Arguments
///
/// * `spec` - The parsed document.
/// * `config` - Transport, mount path and bind address.
/// * `strategy` - Framework-specific renderer.
pub fn generate_server(
    spec: &ParsedSpec,
    config: &EmitConfig,
    strategy: &impl ServerStrategy,
) -> String {
    let server = server_type_name(spec);
    let args_names = args_type_names(spec);
    let derives = strategy.model_derives();
    let mut code = String::new();

    // 1. Header
    let mut deps: BTreeSet<&'static str> = strategy.dependencies(config).into_iter().collect();
    collect_dependencies(spec, &mut deps);
    code.push_str(&format!("//! {} MCP server.\n//!\n", spec.info.title));
    code.push_str(&format!(
        "//! API version {}. Generated from an OpenAPI document; operation\n//! bodies are stubs to fill in.\n//!\n",
        spec.info.version
    ));
    code.push_str(&format!(
        "//! Transport: {}\n//! Dependencies: {}\n\n",
        config.transport,
        deps.into_iter().collect::<Vec<_>>().join(", ")
    ));
    code.push_str(
        "#![allow(dead_code, unused_imports, non_camel_case_types, clippy::all)]\n\n",
    );

    // 2. Imports
    code.push_str(&strategy.imports(config));
    code.push('\n');

    // 3. Models
    code.push_str(&format!("pub mod {} {{\n", MODELS_MODULE));
    let models: Vec<String> = spec
        .sorted_models()
        .into_iter()
        .map(|model| generate_model(spec, model, derives))
        .collect();
    code.push_str(&indent(&models.join("\n")));
    code.push_str("}\n\n");

    // 4. Argument structs
    if !args_names.is_empty() {
        code.push_str(&format!("pub mod {} {{\n", ARGS_MODULE));
        let structs: Vec<String> = spec
            .operations
            .iter()
            .filter_map(|op| {
                args_names
                    .get(&op.identifier)
                    .map(|name| generate_args_struct(op, name, derives))
            })
            .collect();
        code.push_str(&indent(&structs.join("\n")));
        code.push_str("}\n\n");
    }

    // 5. Server, tools and resources
    let handlers: Vec<(bool, HandlerSpec)> = spec
        .operations
        .iter()
        .map(|op| {
            (
                op.is_resource(),
                handler_spec(op, config, args_names.get(&op.identifier)),
            )
        })
        .collect();
    let tools: Vec<&HandlerSpec> = handlers.iter().filter(|(r, _)| !r).map(|(_, h)| h).collect();
    let resources: Vec<HandlerSpec> = handlers
        .iter()
        .filter(|(r, _)| *r)
        .map(|(_, h)| h.clone())
        .collect();

    code.push_str(&strategy.server_struct(&server, !tools.is_empty()));
    code.push('\n');
    if !tools.is_empty() {
        let methods: Vec<String> = tools.iter().map(|h| strategy.tool_method(h)).collect();
        code.push_str(&strategy.tool_block(&server, &methods.join("\n")));
        code.push('\n');
    }
    if !resources.is_empty() {
        let methods: Vec<String> = resources
            .iter()
            .map(|h| strategy.resource_method(h))
            .collect();
        code.push_str(&strategy.resource_block(&server, &methods.join("\n")));
        code.push('\n');
    }

    // 6. Protocol handler and entry point
    code.push_str(&strategy.handler_impl(&server, &spec.info, &resources, !tools.is_empty()));
    code.push_str(&strategy.main_fn(&server, config));

    debug!(
        models = spec.models.len(),
        tools = tools.len(),
        resources = resources.len(),
        transport = %config.transport,
        "Rendered server source"
    );
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Transport;
    use crate::oas::context::parse_document;
    use crate::strategies::RmcpStrategy;
    use serde_json::{json, Value};

    fn parse(doc: Value) -> ParsedSpec {
        parse_document(&doc).unwrap()
    }

    fn base(paths: Value, schemas: Value) -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Pet Store", "version": "1.0.0"},
            "paths": paths,
            "components": {"schemas": schemas}
        })
    }

    #[test]
    fn test_rust_type_rendering() {
        let ty = TypeRef::map(TypeRef::list(TypeRef::named("Pet")));
        assert_eq!(
            rust_type(&ty, "models::"),
            "std::collections::HashMap<String, Vec<models::Pet>>"
        );
        assert_eq!(rust_type(&TypeRef::Any, ""), "serde_json::Value");
        assert_eq!(
            rust_type(&TypeRef::Primitive(PrimitiveKind::DateTime), ""),
            "chrono::DateTime<chrono::Utc>"
        );
        assert_eq!(rust_type(&TypeRef::Primitive(PrimitiveKind::Bytes), ""), "Vec<u8>");
    }

    #[test]
    fn test_model_struct_with_renames_and_options() {
        let spec = parse(base(
            json!({}),
            json!({"Pet": {
                "type": "object",
                "description": "A pet",
                "required": ["id", "petName"],
                "properties": {
                    "id": {"type": "integer"},
                    "petName": {"type": "string"},
                    "tag": {"type": "string", "nullable": true}
                }
            }}),
        ));
        let code = generate_model(&spec, spec.model("Pet").unwrap(), "Debug");
        assert_eq!(
            code,
            "/// A pet\n#[derive(Debug)]\npub struct Pet {\n    pub id: i64,\n    #[serde(rename = \"petName\")]\n    pub pet_name: String,\n    #[serde(default, skip_serializing_if = \"Option::is_none\")]\n    pub tag: Option<String>,\n}\n"
        );
    }

    #[test]
    fn test_recursive_fields_are_boxed() {
        let spec = parse(base(
            json!({}),
            json!({
                "Node": {
                    "type": "object",
                    "required": ["parent"],
                    "properties": {
                        "parent": {"$ref": "#/components/schemas/Node"},
                        "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
                    }
                },
                "A": {"type": "object", "properties": {"b": {"$ref": "#/components/schemas/B"}}},
                "B": {"type": "object", "properties": {"a": {"$ref": "#/components/schemas/A"}}}
            }),
        ));
        let node = spec.model("Node").unwrap();
        assert_eq!(field_type(&spec, "Node", node.field("parent").unwrap()), "Box<Node>");
        assert_eq!(field_type(&spec, "Node", node.field("children").unwrap()), "Option<Vec<Node>>");
        let a = spec.model("A").unwrap();
        assert_eq!(field_type(&spec, "A", a.field("b").unwrap()), "Option<Box<B>>");
        assert!(!is_directly_recursive(&spec, "Node", "A"));
    }

    #[test]
    fn test_alias_models() {
        let spec = parse(base(
            json!({}),
            json!({
                "Pet": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "Pets": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}},
                "Loop1": {"$ref": "#/components/schemas/Loop2"},
                "Loop2": {"$ref": "#/components/schemas/Loop1"}
            }),
        ));
        let pets = generate_model(&spec, spec.model("Pets").unwrap(), "Debug");
        assert_eq!(pets, "pub type Pets = Vec<Pet>;\n");
        let loop1 = generate_model(&spec, spec.model("Loop1").unwrap(), "Debug");
        assert!(loop1.ends_with("pub type Loop1 = serde_json::Value;\n"));
    }

    #[test]
    fn test_self_referencing_aliases_become_newtypes() {
        let spec = parse(base(
            json!({}),
            json!({
                "Json": {"type": "array", "items": {"$ref": "#/components/schemas/Json"}},
                "Tree": {"type": "object", "additionalProperties": {"$ref": "#/components/schemas/Tree"}},
                "Forest": {"type": "array", "items": {"$ref": "#/components/schemas/Tree"}}
            }),
        ));
        let json_model = generate_model(&spec, spec.model("Json").unwrap(), "Debug");
        assert_eq!(
            json_model,
            "#[derive(Debug)]\n#[serde(transparent)]\npub struct Json(pub Vec<Json>);\n"
        );
        let tree = generate_model(&spec, spec.model("Tree").unwrap(), "Debug");
        assert_eq!(
            tree,
            "#[derive(Debug)]\n#[serde(transparent)]\npub struct Tree(pub std::collections::HashMap<String, Tree>);\n"
        );
        let forest = generate_model(&spec, spec.model("Forest").unwrap(), "Debug");
        assert_eq!(forest, "pub type Forest = Vec<Tree>;\n");
    }

    #[test]
    fn test_args_struct_names_and_fields() {
        let spec = parse(base(
            json!({"/pets/{petId}": {"put": {
                "operationId": "updatePet",
                "parameters": [
                    {"name": "petId", "in": "path", "schema": {"type": "integer"}},
                    {"name": "body", "in": "query", "schema": {"type": "string"}}
                ],
                "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}},
                "responses": {"200": {"description": "ok"}}
            }}}),
            json!({"Pet": {"type": "object", "properties": {"id": {"type": "integer"}}}}),
        ));
        let names = args_type_names(&spec);
        assert_eq!(names.get("update_pet").map(String::as_str), Some("UpdatePetArgs"));

        let code = generate_args_struct(&spec.operations[0], "UpdatePetArgs", "Debug");
        assert!(code.contains("    #[serde(rename = \"petId\")]\n    pub pet_id: i64,\n"));
        assert!(code.contains("    pub body: Option<String>,\n"));
        assert!(code.contains("    pub body_2: super::models::Pet,\n"));
    }

    #[test]
    fn test_operations_without_input_have_no_args() {
        let spec = parse(base(
            json!({"/health": {"get": {"responses": {"204": {"description": "ok"}}}}}),
            json!({}),
        ));
        assert!(args_type_names(&spec).is_empty());
        let handler = handler_spec(&spec.operations[0], &EmitConfig::default(), None);
        assert_eq!(handler.response_type, "()");
        assert_eq!(handler.uri.as_deref(), Some("get_health"));
        assert_eq!(handler.description, "GET /health");
    }

    #[test]
    fn test_server_name_avoids_models() {
        let spec = parse(base(
            json!({}),
            json!({"PetStoreServer": {"type": "object", "properties": {}}}),
        ));
        assert_eq!(server_type_name(&spec), "PetStoreServer2");
    }

    #[test]
    fn test_generate_server_layout() {
        let spec = parse(base(
            json!({
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "summary": "List all pets",
                        "responses": {"200": {"description": "ok", "content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}}}}}
                    },
                    "post": {
                        "operationId": "createPet",
                        "requestBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}},
                        "responses": {"201": {"description": "created"}}
                    }
                }
            }),
            json!({"Pet": {"type": "object", "properties": {"born": {"type": "string", "format": "date"}}}}),
        ));
        let config = EmitConfig::new(Transport::Stdio).with_mount_path("/api/");
        let code = generate_server(&spec, &config, &RmcpStrategy);

        assert!(code.starts_with("//! Pet Store MCP server.\n"));
        assert!(code.contains("//! Transport: stdio\n"));
        assert!(code.contains("chrono"));
        assert!(code.contains("pub mod models {\n    #[derive("));
        assert!(code.contains("    pub struct Pet {\n"));
        assert!(code.contains("pub struct CreatePetArgs {"));
        assert!(!code.contains("ListPetsArgs"));
        assert!(code.contains("#[tool(name = \"create_pet\""));
        assert!(code.contains(
            "pub async fn list_pets(&self) -> Result<Vec<models::Pet>, McpError> {"
        ));
        assert!(code.contains("resource(\"api/list_pets\", \"list_pets\", \"List all pets\")"));

        let models_at = code.find("pub mod models").unwrap();
        let server_at = code.find("pub struct PetStoreServer").unwrap();
        let main_at = code.find("async fn main()").unwrap();
        assert!(models_at < server_at && server_at < main_at);
    }

    #[test]
    fn test_generate_server_is_deterministic() {
        let doc = base(
            json!({"/b": {"get": {"responses": {}}}, "/a": {"post": {"responses": {}}}}),
            json!({"Zeta": {"type": "object", "properties": {}}, "Alpha": {"type": "object", "properties": {}}}),
        );
        let config = EmitConfig::default();
        let first = generate_server(&parse(doc.clone()), &config, &RmcpStrategy);
        let second = generate_server(&parse(doc), &config, &RmcpStrategy);
        assert_eq!(first, second);
        assert!(first.find("pub struct Alpha").unwrap() < first.find("pub struct Zeta").unwrap());
    }
}
