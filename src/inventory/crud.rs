//! Record access for the product table
//!
//! The only writer of `products`. Every function takes the session it runs
//! in; absence is reported as `None`/`false`, never as an error.

use rusqlite::{
    params, Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior,
};

use super::errors::{InventoryError, InventoryResult};
use super::model::{NewProduct, Product, ProductPatch};

/// Default page offset for `list`
pub const DEFAULT_SKIP: u64 = 0;
/// Default page size for `list`
pub const DEFAULT_LIMIT: u64 = 100;

const SELECT_PRODUCT: &str = "SELECT id, name, sku, price, quantity FROM products";

fn map_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        sku: row.get(2)?,
        price: row.get(3)?,
        quantity: row.get(4)?,
    })
}

/// The sku UNIQUE constraint is the only one a valid write can trip.
fn map_write_error(err: rusqlite::Error) -> InventoryError {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            InventoryError::DuplicateSku
        }
        other => InventoryError::Storage(other),
    }
}

/// SQLite takes signed 64-bit limits; anything larger is "everything".
fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Lists products in creation order, skipping `skip` and returning at most
/// `limit`. Out-of-range values yield fewer or no rows.
pub fn list(conn: &Connection, skip: u64, limit: u64) -> InventoryResult<Vec<Product>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{SELECT_PRODUCT} ORDER BY id ASC LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![clamp(limit), clamp(skip)], map_product_row)?;
    let products = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(products)
}

/// Fetches a product by id.
pub fn get_by_id(conn: &Connection, id: i64) -> InventoryResult<Option<Product>> {
    let product = conn
        .query_row(
            &format!("{SELECT_PRODUCT} WHERE id = ?1"),
            params![id],
            map_product_row,
        )
        .optional()?;
    Ok(product)
}

/// Fetches a product by sku, for the create-time uniqueness check.
pub fn get_by_sku(conn: &Connection, sku: &str) -> InventoryResult<Option<Product>> {
    let product = conn
        .query_row(
            &format!("{SELECT_PRODUCT} WHERE sku = ?1"),
            params![sku],
            map_product_row,
        )
        .optional()?;
    Ok(product)
}

/// Inserts a product and returns it with its assigned id.
///
/// Callers pre-check sku uniqueness with `get_by_sku`; a collision that
/// slips past the check still surfaces as `DuplicateSku`.
pub fn create(conn: &Connection, input: NewProduct) -> InventoryResult<Product> {
    conn.execute(
        "INSERT INTO products (name, sku, price, quantity) VALUES (?1, ?2, ?3, ?4)",
        params![input.name, input.sku, input.price, input.quantity],
    )
    .map_err(map_write_error)?;

    Ok(Product {
        id: conn.last_insert_rowid(),
        name: input.name,
        sku: input.sku,
        price: input.price,
        quantity: input.quantity,
    })
}

/// Applies the set fields of `patch` to product `id`.
///
/// Returns `None`, without writing, when no such product exists. The read
/// and the write share one immediate transaction, so a concurrent writer
/// cannot slip in between them.
pub fn update(
    conn: &Connection,
    id: i64,
    patch: ProductPatch,
) -> InventoryResult<Option<Product>> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let Some(mut product) = get_by_id(&tx, id)? else {
        return Ok(None);
    };

    if patch.is_empty() {
        return Ok(Some(product));
    }

    patch.apply_to(&mut product);

    tx.execute(
        "UPDATE products SET name = ?1, sku = ?2, price = ?3, quantity = ?4 WHERE id = ?5",
        params![
            product.name,
            product.sku,
            product.price,
            product.quantity,
            product.id
        ],
    )
    .map_err(map_write_error)?;
    tx.commit()?;

    Ok(Some(product))
}

/// Removes product `id`. Returns false, without writing, if it was absent.
pub fn delete(conn: &Connection, id: i64) -> InventoryResult<bool> {
    let removed = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}
