//! # HTTP Server Module
//!
//! Axum server exposing the product API and the management page.
//!
//! # Endpoints
//!
//! - `/` - Management page
//! - `/health` - Health check
//! - `/docs`, `/openapi.json` - API documentation
//! - `/products`, `/products/:id` - Product CRUD

pub mod config;
pub mod docs_routes;
pub mod errors;
pub mod observability_routes;
pub mod page_routes;
pub mod product_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::ErrorResponse;
pub use server::HttpServer;
