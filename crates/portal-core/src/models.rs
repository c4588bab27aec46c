//! Portal Models
//!
//! Data structures exchanged with the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accept ids sent either as JSON strings or numbers
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| serde::de::Error::custom("id must be a string or number"))
}

pub(crate) fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Keep a timestamp as sent; numbers become their decimal text, anything else is empty
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value).unwrap_or_default())
}

/// Timestamp formats the backend has been seen to send; zone-less values are UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    raw.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
}

// ========================
// Orders
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Received,
    Preparing,
    OnTheWay,
    Delivered,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Targets offered as buttons on every order, in display order
    pub const ACTIONS: [OrderStatus; 4] = [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Received => "Ontvangen",
            OrderStatus::Preparing => "Bereiden",
            OrderStatus::OnTheWay => "Onderweg",
            OrderStatus::Delivered => "Afgeleverd",
            OrderStatus::Unknown => "Onbekend",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::OnTheWay => "ON_THE_WAY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub qty: i64,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    /// Raw `createdAt`; see [`Order::placed_at`]
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    pub status: OrderStatus,
}

impl Order {
    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Format an amount the way the portal shows money
pub fn format_euro(amount: f64) -> String {
    format!("€{:.2}", amount)
}

// ========================
// Authentication
// ========================

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Vendor sign-up payload; optional fields are omitted when blank
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ========================
// Menu
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuCategory {
    pub id: String,
    pub name: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
    pub image_url: Option<String>,
}

impl MenuItemPayload {
    /// Same item with availability flipped
    pub fn toggled(item: &MenuItem) -> Self {
        Self {
            category_id: None,
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            available: !item.available,
            image_url: item.image_url.clone(),
        }
    }
}

// ========================
// Form validation
// ========================

/// Local checks done before a request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Voer een categorienaam in")]
    EmptyCategoryName,
    #[error("Categorie moet een naam hebben")]
    CategoryNameRequired,
    #[error("Geen wijzigingen om op te slaan")]
    Unchanged,
    #[error("Gerecht heeft een naam nodig")]
    EmptyItemName,
    #[error("Voer een geldige prijs in")]
    InvalidPrice,
    #[error("Naam is verplicht")]
    EmptyRestaurantName,
    #[error("Voer een geldig minimaal bestelbedrag in")]
    InvalidMinimumOrder,
    #[error("Voer een geldig bedrag in")]
    InvalidAmount,
}

/// Parse a euro amount typed by a user.
///
/// Comma is accepted as decimal separator, blank means zero, the result is
/// rounded to cents. Negative or non-numeric input yields `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replacen(',', ".", 1);
    let value = if normalized.is_empty() {
        0.0
    } else {
        normalized.parse::<f64>().ok()?
    };
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * 100.0).round() / 100.0)
}

/// Trimmed value, `None` when blank
pub fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_decodes_numeric_id_and_unknown_status() {
        let order: Order = serde_json::from_str(
            r#"{"id":42,"createdAt":"2024-05-01T14:30:00+02:00","items":[],"status":"CANCELLED"}"#,
        )
        .unwrap();
        assert_eq!(order.id, "42");
        assert_eq!(order.status, OrderStatus::Unknown);
        assert_eq!(order.placed_at().unwrap().to_rfc3339(), "2024-05-01T12:30:00+00:00");
        assert!(order.total.is_none());
    }

    #[test]
    fn test_order_timestamps_decode_leniently() {
        let orders: Vec<Order> = serde_json::from_str(
            r#"[
                {"id":"a","createdAt":"2024-05-01T12:31:00","status":"RECEIVED"},
                {"id":"b","createdAt":1714566600000,"status":"RECEIVED"},
                {"id":"c","createdAt":"gisteren","status":"RECEIVED"},
                {"id":"d","status":"RECEIVED"}
            ]"#,
        )
        .unwrap();

        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0].placed_at().unwrap().to_rfc3339(), "2024-05-01T12:31:00+00:00");
        assert_eq!(orders[1].placed_at().unwrap().to_rfc3339(), "2024-05-01T12:30:00+00:00");
        assert_eq!(orders[2].created_at, "gisteren");
        assert!(orders[2].placed_at().is_none());
        assert!(orders[3].placed_at().is_none());
    }

    #[test]
    fn test_status_wire_names() {
        let body = serde_json::to_value(StatusUpdate { status: OrderStatus::OnTheWay }).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ON_THE_WAY" }));
        assert_eq!(OrderStatus::ACTIONS.map(OrderStatus::label), ["Ontvangen", "Bereiden", "Onderweg", "Afgeleverd"]);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount(" 7.499 "), Some(7.5));
        assert_eq!(parse_amount(""), Some(0.0));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_register_request_omits_blank_optionals() {
        let request = RegisterRequest {
            name: "De Hapke".into(),
            email: "info@hapke.nl".into(),
            password: "geheim123".into(),
            contact_name: None,
            phone: Some("0612345678".into()),
            street: None,
            postal_code: None,
            city: None,
            description: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["phone"], "0612345678");
        assert!(value.get("contactName").is_none());
        assert!(value.get("city").is_none());
    }

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(12.5), "€12.50");
    }
}
