//! Product data model
//!
//! `Product` is the persisted row. `NewProduct` is a validated create
//! request. `ProductPatch` is a validated partial update, where every field
//! is a `Patch<T>` so that "leave alone" and "set to zero/empty" stay
//! distinct.

use serde::{Deserialize, Serialize};

/// A persisted product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by storage on insert, never reused
    pub id: i64,
    pub name: String,
    /// Unique across all extant products
    pub sku: String,
    pub price: f64,
    pub quantity: i64,
}

/// A fully validated create request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub quantity: i64,
}

/// A single field of a partial update.
///
/// `Unset` means the field was absent from the request and must not be
/// touched. `Set` carries the new value, even when it is falsy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> Patch<T> {
    /// Returns true if the field was present in the request
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// Overwrite `target` if set, leave it alone otherwise.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }
}

impl<T> From<Patch<T>> for Option<T> {
    fn from(patch: Patch<T>) -> Self {
        match patch {
            Patch::Unset => None,
            Patch::Set(value) => Some(value),
        }
    }
}

/// A validated partial update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductPatch {
    pub name: Patch<String>,
    pub sku: Patch<String>,
    pub price: Patch<f64>,
    pub quantity: Patch<i64>,
}

impl ProductPatch {
    /// True when no field was present in the request
    pub fn is_empty(&self) -> bool {
        !(self.name.is_set() || self.sku.is_set() || self.price.is_set() || self.quantity.is_set())
    }

    /// Apply every set field to `product`; `id` is never changed.
    pub fn apply_to(self, product: &mut Product) {
        self.name.apply_to(&mut product.name);
        self.sku.apply_to(&mut product.sku);
        self.price.apply_to(&mut product.price);
        self.quantity.apply_to(&mut product.quantity);
    }
}
