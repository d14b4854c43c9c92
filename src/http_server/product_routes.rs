//! Product HTTP Routes
//!
//! Endpoints for the product resource.
//!
//! - `GET    /products?skip=&limit=`
//! - `POST   /products`
//! - `GET    /products/:id`
//! - `PUT    /products/:id`
//! - `DELETE /products/:id`
//!
//! Each handler runs its unit of work in one session on tokio's blocking
//! pool; the async workers never touch SQLite.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;

use crate::inventory::crud::{self, DEFAULT_LIMIT, DEFAULT_SKIP};
use crate::inventory::{
    validate_create, validate_update, Database, InventoryError, InventoryResult, Product,
};
use crate::observability::{log_event_with_fields, Event};

// ==================
// Shared State
// ==================

/// Product state shared across handlers
pub struct ProductState {
    pub db: Database,
}

impl ProductState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Runs `work` in a fresh session on the blocking pool.
    async fn run<T, F>(self: &Arc<Self>, work: F) -> InventoryResult<T>
    where
        F: FnOnce(&Connection) -> InventoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let session = state.db.session()?;
            work(&session)
        })
        .await?
    }
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

type ProductId = Result<Path<i64>, PathRejection>;
type JsonBody = Result<Json<Value>, JsonRejection>;

// ==================
// Product Routes
// ==================

/// Create product routes
pub fn product_routes(state: Arc<ProductState>) -> Router {
    Router::new()
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/:id",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_products_handler(
    State(state): State<Arc<ProductState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> InventoryResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let skip = query.skip.unwrap_or(DEFAULT_SKIP);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let products = state.run(move |conn| crud::list(conn, skip, limit)).await?;
    Ok(Json(products))
}

async fn get_product_handler(
    State(state): State<Arc<ProductState>>,
    id: ProductId,
) -> InventoryResult<Json<Product>> {
    let Path(id) = id?;

    let product = state
        .run(move |conn| crud::get_by_id(conn, id))
        .await?
        .ok_or(InventoryError::NotFound)?;
    Ok(Json(product))
}

async fn create_product_handler(
    State(state): State<Arc<ProductState>>,
    body: JsonBody,
) -> InventoryResult<(StatusCode, Json<Product>)> {
    let Json(body) = body?;
    let input = validate_create(&body)?;

    let product = state
        .run(move |conn| {
            if crud::get_by_sku(conn, &input.sku)?.is_some() {
                return Err(InventoryError::DuplicateSku);
            }
            crud::create(conn, input)
        })
        .await?;

    log_event_with_fields(
        Event::ProductCreated,
        &[("id", &product.id.to_string()), ("sku", &product.sku)],
    );
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product_handler(
    State(state): State<Arc<ProductState>>,
    id: ProductId,
    body: JsonBody,
) -> InventoryResult<Json<Product>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let patch = validate_update(&body)?;

    let product = state
        .run(move |conn| crud::update(conn, id, patch))
        .await?
        .ok_or(InventoryError::NotFound)?;

    log_event_with_fields(Event::ProductUpdated, &[("id", &product.id.to_string())]);
    Ok(Json(product))
}

async fn delete_product_handler(
    State(state): State<Arc<ProductState>>,
    id: ProductId,
) -> InventoryResult<StatusCode> {
    let Path(id) = id?;

    if !state.run(move |conn| crud::delete(conn, id)).await? {
        return Err(InventoryError::NotFound);
    }

    log_event_with_fields(Event::ProductDeleted, &[("id", &id.to_string())]);
    Ok(StatusCode::NO_CONTENT)
}
