//! # Wire Types
//!
//! Request bodies the register sends, and lenient decoders for what comes
//! back.
//!
//! ## Decoding Rules
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ Domain field         │ Accepted wire keys (first non-null wins)     │
//! ├──────────────────────┼──────────────────────────────────────────────┤
//! │ sale id              │ id, saleId, sale_id, _id                     │
//! │ total amount         │ totalAmount, total_amount, total             │
//! │ payment status       │ paymentStatus, payment_status, status        │
//! │ payment method       │ paymentMethod, payment_method, method        │
//! │ paid at              │ paidAt, paid_at, createdAt, created_at       │
//! └──────────────────────┴──────────────────────────────────────────────┘
//!
//! ids      : 77 | "77"
//! amounts  : 1000 | 1000.5 | "1000.50"
//! ```
//!
//! Lookups go through a key list instead of serde aliases because the
//! backend sometimes sends both `id` and `saleId` on the same object.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use torque_core::{Cart, Money, Payment, PaymentMethod, Sale, SaleId, SaleItem};

use crate::error::{RemoteError, RemoteResult};

const ID_KEYS: &[&str] = &["id", "saleId", "sale_id", "_id"];
const SALE_REF_KEYS: &[&str] = &["saleId", "sale_id"];
const TOTAL_KEYS: &[&str] = &["totalAmount", "total_amount", "total"];
const STATUS_KEYS: &[&str] = &["paymentStatus", "payment_status", "status"];
const METHOD_KEYS: &[&str] = &["paymentMethod", "payment_method", "method"];
const PAID_AT_KEYS: &[&str] = &["paidAt", "paid_at", "createdAt", "created_at"];

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST {sales_path}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(serialize_with = "as_decimal")]
    pub discount_total: Money,
    pub items: Vec<SaleLineRequest>,
}

/// One line of a sale creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: i64,
    #[serde(serialize_with = "as_decimal")]
    pub unit_price: Money,
    #[serde(serialize_with = "as_decimal")]
    pub discount: Money,
}

impl CreateSaleRequest {
    /// Builds a request carrying every cart line at its current price.
    ///
    /// Discounts are always zero; the register expresses discounts by
    /// editing the unit price.
    pub fn from_cart(cart: &Cart, customer_phone: &str, customer_name: Option<&str>) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| SaleLineRequest {
                product_id: line.product_id().to_string(),
                quantity: line.quantity(),
                unit_price: line.unit_price(),
                discount: Money::zero(),
            })
            .collect();

        CreateSaleRequest {
            customer_phone: customer_phone.to_string(),
            customer_name: customer_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            discount_total: Money::zero(),
            items,
        }
    }
}

/// Body of `POST {payments_path}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(serialize_with = "as_wire_id")]
    pub sale_id: SaleId,
    pub payment_method: PaymentMethod,
    #[serde(serialize_with = "as_decimal")]
    pub amount: Money,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn as_decimal<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(money.to_decimal())
}

/// Numeric ids go back out as numbers, everything else as strings.
fn as_wire_id<S: Serializer>(id: &SaleId, serializer: S) -> Result<S::Ok, S::Error> {
    match id.as_str().parse::<i64>() {
        Ok(n) => serializer.serialize_i64(n),
        Err(_) => serializer.serialize_str(id.as_str()),
    }
}

// =============================================================================
// Responses
// =============================================================================

/// What the register needs from a sale creation response.
///
/// Both fields are optional: the backend has been seen to return `201`
/// with an empty body, and older releases omit the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedSale {
    pub id: Option<SaleId>,
    pub total: Option<Money>,
    pub status: Option<String>,
}

impl CreatedSale {
    pub fn from_value(payload: &Value) -> Self {
        match payload.as_object() {
            Some(obj) => CreatedSale {
                id: pick(obj, ID_KEYS).and_then(as_id),
                total: pick(obj, TOTAL_KEYS).and_then(as_amount),
                status: pick(obj, STATUS_KEYS).and_then(as_text),
            },
            None => CreatedSale {
                // Some releases answer with the bare id
                id: as_id(payload),
                total: None,
                status: None,
            },
        }
    }
}

/// Decodes a sale. The id is the only hard requirement.
pub fn sale_from_value(payload: &Value) -> RemoteResult<Sale> {
    let obj = payload
        .as_object()
        .ok_or_else(|| RemoteError::Decode(format!("expected a sale object, got {}", kind(payload))))?;

    let id = pick(obj, ID_KEYS)
        .and_then(as_id)
        .ok_or(RemoteError::MissingField("sale id"))?;

    let items = obj
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(item_from_value).collect())
        .unwrap_or_default();

    Ok(Sale {
        id,
        number: pick(obj, &["saleNumber", "sale_number", "number", "receiptNumber"]).and_then(as_text),
        customer_phone: customer_field(obj, &["customerPhone", "customer_phone"], "phone")
            .unwrap_or_default(),
        customer_name: customer_field(obj, &["customerName", "customer_name"], "name"),
        total_amount: pick(obj, TOTAL_KEYS).and_then(as_amount).unwrap_or_default(),
        payment_status: pick(obj, STATUS_KEYS).and_then(as_text).unwrap_or_default(),
        items,
        created_at: pick(obj, &["createdAt", "created_at"]).and_then(as_timestamp),
    })
}

/// Decodes a payment. Entries without an amount cannot be reconciled
/// and are rejected.
pub fn payment_from_value(payload: &Value) -> RemoteResult<Payment> {
    let obj = payload
        .as_object()
        .ok_or_else(|| RemoteError::Decode(format!("expected a payment object, got {}", kind(payload))))?;

    let amount = pick(obj, &["amount"])
        .and_then(as_amount)
        .ok_or(RemoteError::MissingField("payment amount"))?;

    let sale_id = pick(obj, SALE_REF_KEYS).and_then(as_id).or_else(|| {
        obj.get("sale")
            .and_then(Value::as_object)
            .and_then(|sale| pick(sale, ID_KEYS))
            .and_then(as_id)
    });

    Ok(Payment {
        id: pick(obj, &["id", "_id", "paymentId"]).and_then(as_text),
        sale_id,
        method: pick(obj, METHOD_KEYS)
            .and_then(as_text)
            .map(PaymentMethod::from)
            .unwrap_or_else(|| PaymentMethod::Other(String::new())),
        amount,
        reference: pick(obj, &["reference", "referenceNumber", "reference_number"]).and_then(as_text),
        paid_at: pick(obj, PAID_AT_KEYS).and_then(as_timestamp),
    })
}

/// Items the payload holds as a list. A single object counts as a list of one.
pub fn list_items(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(mut obj) => {
            // Paginated lists: { "items": [...], "total": 12 }
            for key in ["items", "results", "rows"] {
                if let Some(Value::Array(items)) = obj.remove(key) {
                    return items;
                }
            }
            vec![Value::Object(obj)]
        }
        other => vec![other],
    }
}

fn item_from_value(value: &Value) -> Option<SaleItem> {
    let obj = value.as_object()?;
    let product_id = pick(obj, &["productId", "product_id"])
        .and_then(as_text)
        .or_else(|| {
            obj.get("product")
                .and_then(Value::as_object)
                .and_then(|p| pick(p, &["id", "_id"]))
                .and_then(as_text)
        })?;

    Some(SaleItem {
        product_id,
        quantity: pick(obj, &["quantity", "qty"]).and_then(as_count).unwrap_or(1),
        unit_price: pick(obj, &["unitPrice", "unit_price", "price"])
            .and_then(as_amount)
            .unwrap_or_default(),
        discount: pick(obj, &["discount"]).and_then(as_amount).unwrap_or_default(),
    })
}

/// Top-level customer field, or the same field on a nested `customer` object.
fn customer_field(obj: &Map<String, Value>, keys: &[&str], nested: &str) -> Option<String> {
    pick(obj, keys).and_then(as_text).or_else(|| {
        obj.get("customer")
            .and_then(Value::as_object)
            .and_then(|c| c.get(nested))
            .and_then(as_text)
    })
}

// =============================================================================
// Field Helpers
// =============================================================================

fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_id(value: &Value) -> Option<SaleId> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(SaleId::from)
            .or_else(|| n.as_u64().map(|u| SaleId::new(u.to_string()))),
        Value::String(_) => as_text(value).map(SaleId::new),
        _ => None,
    }
}

fn as_amount(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => n.as_f64().and_then(Money::from_decimal),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(Money::from_decimal),
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Some endpoints drop the offset; they report UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
