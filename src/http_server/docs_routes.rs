//! API Documentation Routes
//!
//! - `GET /openapi.json` - OpenAPI 3 description of the HTTP surface
//! - `GET /docs` - Swagger UI rendering of that document

use axum::{response::Html, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::inventory::crud::{DEFAULT_LIMIT, DEFAULT_SKIP};

const DOCS_HTML: &str = include_str!("../../static/docs.html");

/// Documentation routes
pub fn docs_routes() -> Router {
    Router::new()
        .route("/docs", get(docs_handler))
        .route("/openapi.json", get(openapi_handler))
}

async fn docs_handler() -> Html<&'static str> {
    Html(DOCS_HTML)
}

async fn openapi_handler() -> Json<Value> {
    Json(openapi_document())
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(schema_ref("ErrorResponse")),
    })
}

fn product_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(schema_ref("Product")),
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn product_fields() -> Value {
    json!({
        "name": { "type": "string" },
        "sku": { "type": "string" },
        "price": { "type": "number", "format": "double" },
        "quantity": { "type": "integer", "format": "int64" }
    })
}

/// Builds the OpenAPI document for the product API.
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Retail Inventory Manager",
            "description": "Simple inventory management API for a retail store.",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths(),
        "components": components(),
    })
}

fn paths() -> Value {
    json!({
        "/products": {
            "get": {
                "summary": "List products in creation order",
                "parameters": [
                    {
                        "name": "skip",
                        "in": "query",
                        "schema": { "type": "integer", "minimum": 0, "default": DEFAULT_SKIP }
                    },
                    {
                        "name": "limit",
                        "in": "query",
                        "schema": { "type": "integer", "minimum": 0, "default": DEFAULT_LIMIT }
                    }
                ],
                "responses": {
                    "200": {
                        "description": "Products",
                        "content": json_content(json!({
                            "type": "array",
                            "items": schema_ref("Product"),
                        })),
                    },
                    "422": error_response("Invalid skip or limit"),
                }
            },
            "post": {
                "summary": "Create a product",
                "requestBody": {
                    "required": true,
                    "content": json_content(schema_ref("ProductCreate")),
                },
                "responses": {
                    "201": product_response("Created product"),
                    "400": error_response("SKU already exists"),
                    "422": error_response("Validation failed"),
                }
            }
        },
        "/products/{id}": {
            "get": {
                "summary": "Get a product",
                "parameters": [id_parameter()],
                "responses": {
                    "200": product_response("Product"),
                    "404": error_response("Product not found"),
                    "422": error_response("Invalid id"),
                }
            },
            "put": {
                "summary": "Update the given fields of a product",
                "parameters": [id_parameter()],
                "requestBody": {
                    "required": true,
                    "content": json_content(schema_ref("ProductUpdate")),
                },
                "responses": {
                    "200": product_response("Updated product"),
                    "400": error_response("SKU already exists"),
                    "404": error_response("Product not found"),
                    "422": error_response("Validation failed"),
                }
            },
            "delete": {
                "summary": "Delete a product",
                "parameters": [id_parameter()],
                "responses": {
                    "204": { "description": "Deleted" },
                    "404": error_response("Product not found"),
                }
            }
        },
        "/health": {
            "get": {
                "summary": "Service health",
                "responses": {
                    "200": {
                        "description": "Service is up",
                        "content": json_content(json!({
                            "type": "object",
                            "properties": {
                                "status": { "type": "string" },
                                "version": { "type": "string" }
                            }
                        })),
                    }
                }
            }
        }
    })
}

fn components() -> Value {
    let mut product_properties = product_fields();
    product_properties["id"] = json!({ "type": "integer", "format": "int64" });

    json!({
        "schemas": {
            "Product": {
                "type": "object",
                "required": ["id", "name", "sku", "price", "quantity"],
                "properties": product_properties,
            },
            "ProductCreate": {
                "type": "object",
                "required": ["name", "sku", "price", "quantity"],
                "properties": product_fields(),
            },
            "ProductUpdate": {
                "type": "object",
                "description": "Absent fields are left unchanged",
                "properties": product_fields(),
            },
            "ValidationDetails": {
                "type": "object",
                "properties": {
                    "field": { "type": "string" },
                    "expected": { "type": "string" },
                    "actual": { "type": "string" }
                }
            },
            "ErrorResponse": {
                "type": "object",
                "required": ["detail", "code"],
                "properties": {
                    "detail": { "type": "string" },
                    "code": { "type": "integer" },
                    "errors": {
                        "type": "array",
                        "items": schema_ref("ValidationDetails"),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_operation() {
        let doc = openapi_document();
        let paths = &doc["paths"];

        assert!(paths["/products"]["get"].is_object());
        assert!(paths["/products"]["post"].is_object());
        for method in ["get", "put", "delete"] {
            assert!(paths["/products/{id}"][method].is_object(), "{method}");
        }
        assert_eq!(doc["info"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_list_defaults_match_record_access() {
        let doc = openapi_document();
        let params = &doc["paths"]["/products"]["get"]["parameters"];
        assert_eq!(params[0]["schema"]["default"], DEFAULT_SKIP);
        assert_eq!(params[1]["schema"]["default"], DEFAULT_LIMIT);
    }

    #[test]
    fn test_product_schema_has_id() {
        let doc = openapi_document();
        let product = &doc["components"]["schemas"]["Product"]["properties"];
        assert!(product["id"].is_object());
        assert!(doc["components"]["schemas"]["ProductCreate"]["properties"]["id"].is_null());
    }
}
