//! Input contracts for create and update requests
//!
//! Validation semantics:
//! - Body must be a JSON object; unknown keys are ignored
//! - Create: `name`, `sku`, `price`, `quantity` all required
//! - Update: all four optional, present ones are type-checked
//! - Numbers are read leniently: numeric strings parse (`"9.99"`, `"10"`),
//!   whole floats count as integers (`10.0`); fractions and words do not
//! - `null` is never accepted, no field is nullable
//! - Every offending field is reported, not just the first

use serde_json::{Map, Value};

use super::errors::{InventoryError, InventoryResult, ValidationDetails};
use super::model::{NewProduct, Patch, ProductPatch};

/// Validates a create request body.
///
/// # Errors
///
/// Returns `InventoryError::Validation` listing every missing, null or
/// mistyped field.
pub fn validate_create(body: &Value) -> InventoryResult<NewProduct> {
    let mut reader = FieldReader::new(body)?;

    let name = reader.required::<String>("name");
    let sku = reader.required::<String>("sku");
    let price = reader.required::<f64>("price");
    let quantity = reader.required::<i64>("quantity");

    match (name, sku, price, quantity) {
        (Some(name), Some(sku), Some(price), Some(quantity)) => Ok(NewProduct {
            name,
            sku,
            price,
            quantity,
        }),
        _ => Err(reader.into_error()),
    }
}

/// Validates an update request body into a partial patch.
///
/// Absent fields become `Patch::Unset`; present fields, including `0`, `0.0`
/// and `""`, become `Patch::Set`.
pub fn validate_update(body: &Value) -> InventoryResult<ProductPatch> {
    let mut reader = FieldReader::new(body)?;

    let patch = ProductPatch {
        name: reader.optional("name"),
        sku: reader.optional("sku"),
        price: reader.optional("price"),
        quantity: reader.optional("quantity"),
    };

    if reader.errors.is_empty() {
        Ok(patch)
    } else {
        Err(reader.into_error())
    }
}

/// A field type accepted by the contracts.
trait FieldType: Sized {
    const EXPECTED: &'static str;

    fn extract(value: &Value) -> Option<Self>;
}

impl FieldType for String {
    const EXPECTED: &'static str = "string";

    fn extract(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FieldType for f64 {
    const EXPECTED: &'static str = "number";

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }
}

impl FieldType for i64 {
    const EXPECTED: &'static str = "integer";

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_to_i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_to_i64))
            }
            _ => None,
        }
    }
}

/// `10.0` -> 10; None for fractions, non-finite values and out-of-range.
fn whole_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Reads typed fields out of a JSON object, collecting every failure.
struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    errors: Vec<ValidationDetails>,
}

impl<'a> FieldReader<'a> {
    fn new(body: &'a Value) -> InventoryResult<Self> {
        let obj = body.as_object().ok_or_else(|| {
            InventoryError::invalid(ValidationDetails::type_mismatch(
                "$root",
                "object",
                json_type_name(body),
            ))
        })?;
        Ok(Self {
            obj,
            errors: Vec::new(),
        })
    }

    fn required<T: FieldType>(&mut self, field: &str) -> Option<T> {
        if !self.obj.contains_key(field) {
            self.errors.push(ValidationDetails::missing_field(field));
            return None;
        }
        self.optional(field).into()
    }

    /// Unset when absent; also Unset (with an error recorded) when invalid.
    fn optional<T: FieldType>(&mut self, field: &str) -> Patch<T> {
        let Some(value) = self.obj.get(field) else {
            return Patch::Unset;
        };

        if value.is_null() {
            self.errors.push(ValidationDetails::null_value(field));
            return Patch::Unset;
        }

        match T::extract(value) {
            Some(extracted) => Patch::Set(extracted),
            None => {
                self.errors.push(ValidationDetails::type_mismatch(
                    field,
                    T::EXPECTED,
                    json_type_name(value),
                ));
                Patch::Unset
            }
        }
    }

    fn into_error(self) -> InventoryError {
        InventoryError::Validation(self.errors)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
