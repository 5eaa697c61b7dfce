use oas2mcp_core::oas::ParamLocation;
use oas2mcp_core::{load_spec, parse_document, parse_document_str, DocumentFormat, ParsedSpec, PrimitiveKind, TypeRef};
use pretty_assertions::assert_eq;
use std::fs;

fn parse_yaml(yaml: &str) -> ParsedSpec {
    let doc = parse_document_str(yaml, DocumentFormat::Yaml).unwrap();
    parse_document(&doc).unwrap()
}

#[test]
fn test_pet_lookup_by_path_parameter() {
    let spec = parse_yaml(
        r#"
openapi: 3.0.0
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets/{petId}:
    get:
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: string
      responses:
        '200':
          description: A pet
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
        name:
          type: string
        tag:
          type: string
"#,
    );

    let pet = spec.model("Pet").unwrap();
    let fields: Vec<(&str, bool)> = pet
        .fields
        .iter()
        .map(|f| (f.identifier.as_str(), f.required))
        .collect();
    assert_eq!(fields, vec![("id", true), ("name", true), ("tag", false)]);

    let op = spec.operation("get_pets_by_pet_id").unwrap();
    assert_eq!(op.parameters.len(), 1);
    let param = &op.parameters[0];
    assert_eq!(param.identifier, "pet_id");
    assert_eq!(param.location, ParamLocation::Path);
    assert!(param.required);
    assert_eq!(param.ty, TypeRef::Primitive(PrimitiveKind::String));
    assert_eq!(op.response_body, Some(TypeRef::named("Pet")));
}

#[test]
fn test_delete_without_operation_id_or_body() {
    let spec = parse_yaml(
        r#"
openapi: 3.1.0
info: {title: Items, version: '2'}
paths:
  /items/{item-id}:
    delete:
      parameters:
        - name: item-id
          in: path
          schema: {type: string}
      responses:
        '204':
          description: Deleted
"#,
    );

    assert_eq!(spec.operations.len(), 1);
    let op = &spec.operations[0];
    assert_eq!(op.identifier, "delete_items_by_item_id");
    assert_eq!(op.response_body, None);
    assert_eq!(op.parameters.len(), 1);
    assert_eq!(op.parameters[0].identifier, "item_id");
    assert!(op.parameters[0].required);
}

#[test]
fn test_mutually_recursive_models() {
    let spec = parse_yaml(
        r#"
openapi: 3.0.1
info: {title: Org, version: '1'}
paths: {}
components:
  schemas:
    Company:
      type: object
      properties:
        departments:
          type: array
          items:
            $ref: '#/components/schemas/Department'
    Department:
      type: object
      properties:
        company:
          $ref: '#/components/schemas/Company'
"#,
    );

    assert_eq!(spec.models.len(), 2);
    let company = spec.model("Company").unwrap();
    assert_eq!(
        company.field("departments").unwrap().ty,
        TypeRef::list(TypeRef::named("Department"))
    );
    let department = spec.model("Department").unwrap();
    assert_eq!(
        department.field("company").unwrap().ty,
        TypeRef::named("Company")
    );
    assert!(spec.models.values().all(|m| m.is_complete()));
    assert_eq!(spec.diagnostics.degraded_count(), 0);
}

#[test]
fn test_path_level_parameters_and_shared_components() {
    let spec = parse_yaml(
        r#"
openapi: 3.0.0
info: {title: Shared, version: '1'}
paths:
  /users/{userId}/orders:
    parameters:
      - $ref: '#/components/parameters/UserId'
      - name: limit
        in: query
        schema: {type: integer}
    get:
      operationId: listOrders
      parameters:
        - name: limit
          in: query
          required: true
          schema: {type: integer}
      responses:
        '200':
          $ref: '#/components/responses/Orders'
    post:
      operationId: createOrder
      requestBody:
        $ref: '#/components/requestBodies/NewOrder'
      responses:
        default:
          description: Created
          content:
            application/problem+json:
              schema: {$ref: '#/components/schemas/Order'}
components:
  parameters:
    UserId:
      name: userId
      in: path
      schema: {type: string}
  requestBodies:
    NewOrder:
      content:
        application/json:
          schema: {$ref: '#/components/schemas/Order'}
  responses:
    Orders:
      description: Orders
      content:
        application/json:
          schema:
            type: array
            items: {$ref: '#/components/schemas/Order'}
  schemas:
    Order:
      type: object
      properties:
        total: {type: number}
"#,
    );

    let list = spec.operation("list_orders").unwrap();
    let params: Vec<(&str, bool)> = list
        .parameters
        .iter()
        .map(|p| (p.identifier.as_str(), p.required))
        .collect();
    assert_eq!(params, vec![("user_id", true), ("limit", true)]);
    assert_eq!(list.response_body, Some(TypeRef::list(TypeRef::named("Order"))));

    let create = spec.operation("create_order").unwrap();
    assert_eq!(create.request_body, Some(TypeRef::named("Order")));
    assert_eq!(create.response_body, Some(TypeRef::named("Order")));
    assert_eq!(create.parameters.len(), 2);
}

#[test]
fn test_load_spec_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.json");
    fs::write(
        &path,
        r#"{
  "openapi": "3.0.0",
  "info": {"title": "Files", "version": "1"},
  "paths": {
    "/upload": {
      "post": {
        "operationId": "upload-file",
        "requestBody": {"content": {"application/octet-stream": {"schema": {"type": "string", "format": "binary"}}}},
        "responses": {"201": {"description": "stored"}}
      }
    }
  }
}"#,
    )
    .unwrap();

    let spec = load_spec(&path).unwrap();
    let op = spec.operation("upload_file").unwrap();
    assert_eq!(op.request_body, Some(TypeRef::Primitive(PrimitiveKind::Bytes)));
}

#[test]
fn test_fatal_validation_errors() {
    let doc = parse_document_str("openapi: 3.0.0\ninfo: {title: T, version: '1'}\n", DocumentFormat::Yaml).unwrap();
    let err = parse_document(&doc).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("Missing 'paths' section"));
}
