//! # Inventory core
//!
//! Product model, input contracts and record access over the `products`
//! table.
//!
//! - `validation` turns raw JSON bodies into `NewProduct` / `ProductPatch`
//! - `crud` is the sole reader/writer of the table and takes the session
//!   explicitly
//! - `Database` is the injected storage handle that hands out sessions

pub mod crud;
mod database;
mod errors;
mod model;
pub mod validation;

pub use database::{Database, Session, IN_MEMORY};
pub use errors::{InventoryError, InventoryResult, ValidationDetails};
pub use model::{NewProduct, Patch, Product, ProductPatch};
pub use validation::{validate_create, validate_update};
