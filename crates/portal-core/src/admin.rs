//! Admin Panel
//!
//! Platform-admin endpoints and the form state behind the admin pages.
//! Admin requests carry the bearer token only, never cookies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::{path_segment, ApiClient, ApiError, ApiRequest, HttpTransport};
use crate::models::{flexible_id, non_blank, parse_amount, Credentials, FormError};
use crate::session::SessionStorage;

pub const RESTAURANTS_FAILED: &str = "Kon restaurants niet laden";
pub const UPDATE_FAILED: &str = "Kon restaurant niet bijwerken";
pub const ORDERS_FAILED: &str = "Kon orders niet laden";
pub const SAVED: &str = "Opgeslagen";
const LOGIN_FAILED: &str = "Login mislukt";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdminLoginError {
    #[error("Geen access token ontvangen")]
    MissingToken,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AdminLoginError {
    pub fn user_message(&self) -> String {
        match self {
            AdminLoginError::MissingToken => self.to_string(),
            AdminLoginError::Api(ApiError::Unauthorized) => LOGIN_FAILED.to_string(),
            AdminLoginError::Api(err) => err.user_message(LOGIN_FAILED),
        }
    }
}

/// Banner text for a failed admin request; HTTP failures use the fixed text.
///
/// `None` for an unauthorized result, which is handled by the login redirect
/// and never shown inline.
pub fn error_message(err: &ApiError, fallback: &str) -> Option<String> {
    match err {
        ApiError::Unauthorized => None,
        ApiError::Http { .. } => Some(fallback.to_string()),
        other => Some(other.user_message(fallback)),
    }
}

/// Amounts arrive as numbers or as decimal strings
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

// ========================
// Types
// ========================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminLoginResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderCount {
    #[serde(default)]
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRestaurant {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub min_order: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub delivery_fee: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, rename = "_count")]
    pub count: Option<OrderCount>,
}

impl AdminRestaurant {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// "city postal code" with blanks left out
    pub fn location(&self) -> String {
        [self.city.as_deref(), self.postal_code.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn order_count(&self) -> u64 {
        self.count.as_ref().map_or(0, |c| c.orders)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VendorRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vendor: Option<VendorRef>,
}

impl AdminOrder {
    pub fn number(&self) -> &str {
        self.order_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn amount_label(&self) -> String {
        self.total
            .map(|t| format!("€ {:.2}", t))
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn restaurant_label(&self) -> &str {
        self.vendor
            .as_ref()
            .and_then(|v| v.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or("-")
    }

    pub fn date_label(&self) -> String {
        self.created_at
            .map(|at| at.format("%d-%m-%Y %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

// ========================
// Forms
// ========================

/// Filters of the admin orders page; blank fields are left out of the query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub restaurant_id: String,
    pub from: String,
    pub to: String,
}

impl OrderFilter {
    pub fn query_string(&self) -> String {
        let pairs: Vec<String> = [
            ("restaurantId", &self.restaurant_id),
            ("from", &self.from),
            ("to", &self.to),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_blank(value).map(|v| format!("{}={}", key, path_segment(&v))))
        .collect();
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRestaurantUpdate {
    pub name: String,
    pub description: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<f64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantForm {
    pub name: String,
    pub description: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub min_order: String,
    pub delivery_fee: String,
    pub is_active: bool,
}

impl RestaurantForm {
    pub fn from_restaurant(restaurant: &AdminRestaurant) -> Self {
        let amount = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        Self {
            name: restaurant.name.clone().unwrap_or_default(),
            description: restaurant.description.clone().unwrap_or_default(),
            street: restaurant.street.clone().unwrap_or_default(),
            postal_code: restaurant.postal_code.clone().unwrap_or_default(),
            city: restaurant.city.clone().unwrap_or_default(),
            min_order: amount(restaurant.min_order),
            delivery_fee: amount(restaurant.delivery_fee),
            is_active: restaurant.is_active.unwrap_or(false),
        }
    }

    /// Blank amounts are omitted from the update
    pub fn to_update(&self) -> Result<AdminRestaurantUpdate, FormError> {
        let amount = |raw: &str| -> Result<Option<f64>, FormError> {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            parse_amount(raw).map(Some).ok_or(FormError::InvalidAmount)
        };
        Ok(AdminRestaurantUpdate {
            name: self.name.clone(),
            description: self.description.clone(),
            street: self.street.clone(),
            postal_code: self.postal_code.clone(),
            city: self.city.clone(),
            min_order: amount(&self.min_order)?,
            delivery_fee: amount(&self.delivery_fee)?,
            is_active: self.is_active,
        })
    }
}

/// Keep the selected restaurant across reloads, else pick the first one
pub fn resolve_selection(restaurants: &[AdminRestaurant], previous: Option<&str>) -> Option<String> {
    previous
        .filter(|id| restaurants.iter().any(|r| r.id == *id))
        .map(str::to_string)
        .or_else(|| restaurants.first().map(|r| r.id.clone()))
}

// ========================
// Endpoints
// ========================

/// Sign in as platform admin; stores the access token and the user profile
pub async fn admin_login<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    email: &str,
    password: &str,
) -> Result<(), AdminLoginError> {
    let credentials = Credentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    let request = ApiRequest::post("/auth/login").json(&credentials)?.public();
    let response: AdminLoginResponse = client.send_optional(request).await?.unwrap_or_default();
    let token = response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(AdminLoginError::MissingToken)?;
    client.establish_session(Some(&token))?;
    if let Some(user) = response.user {
        client.session().set_profile(&user).map_err(ApiError::from)?;
    }
    log::info!("Admin signed in as {}", credentials.email);
    Ok(())
}

pub fn admin_logout<T: HttpTransport, S: SessionStorage>(client: &ApiClient<T, S>) {
    client.end_session();
    log::info!("Admin signed out");
}

pub async fn list_restaurants<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
) -> Result<Vec<AdminRestaurant>, ApiError> {
    client.send_json(ApiRequest::get("/admin/restaurants")).await
}

pub async fn update_restaurant<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    restaurant_id: &str,
    update: &AdminRestaurantUpdate,
) -> Result<(), ApiError> {
    let path = format!("/admin/restaurants/{}", path_segment(restaurant_id));
    client.send_unit(ApiRequest::patch(path).json(update)?).await
}

pub async fn list_orders<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    filter: &OrderFilter,
) -> Result<Vec<AdminOrder>, ApiError> {
    let path = format!("/admin/orders{}", filter.query_string());
    client.send_json(ApiRequest::get(path)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpMethod;
    use crate::session::MemoryStorage;
    use crate::testing::{admin_client, FakeTransport};
    use serde_json::json;

    fn setup() -> (FakeTransport, MemoryStorage, ApiClient<FakeTransport, MemoryStorage>) {
        let transport = FakeTransport::new();
        let storage = MemoryStorage::new();
        let client = admin_client(&transport, &storage);
        (transport, storage, client)
    }

    #[tokio::test]
    async fn test_login_stores_token_and_user() {
        let (transport, storage, client) = setup();
        transport.respond(
            HttpMethod::Post,
            "/auth/login",
            200,
            r#"{"accessToken":"adm","user":{"email":"a@hapke.nl"}}"#,
        );

        admin_login(&client, " a@hapke.nl ", "pw").await.unwrap();

        assert_eq!(client.session().token().as_deref(), Some("adm"));
        assert_eq!(storage.get("adminUser").as_deref(), Some(r#"{"email":"a@hapke.nl"}"#));
        let call = &transport.calls()[0];
        assert!(call.bearer.is_none());
        assert!(!call.with_credentials);
        assert_eq!(call.body, Some(json!({ "email": "a@hapke.nl", "password": "pw" })));
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let (transport, storage, client) = setup();
        transport.respond(HttpMethod::Post, "/auth/login", 200, r#"{"user":{}}"#);

        let err = admin_login(&client, "a@hapke.nl", "pw").await.unwrap_err();

        assert_eq!(err, AdminLoginError::MissingToken);
        assert_eq!(err.user_message(), "Geen access token ontvangen");
        assert!(!storage.contains("adminToken"));
    }

    #[tokio::test]
    async fn test_login_failure_messages() {
        let (transport, _, client) = setup();
        transport.respond(HttpMethod::Post, "/auth/login", 401, "");
        transport.respond(HttpMethod::Post, "/auth/login", 500, "Database offline");

        let unauthorized = admin_login(&client, "a", "b").await.unwrap_err();
        let server = admin_login(&client, "a", "b").await.unwrap_err();

        assert_eq!(unauthorized.user_message(), "Login mislukt");
        assert_eq!(server.user_message(), "Database offline");
    }

    #[tokio::test]
    async fn test_guarded_requests_send_bearer_without_cookies() {
        let (transport, _, client) = setup();
        client.establish_session(Some("adm")).unwrap();
        transport.respond(
            HttpMethod::Get,
            "/admin/restaurants",
            200,
            r#"[{"id":"r1","name":"Hapke","city":"Utrecht","postalCode":"3511","minOrder":"12.50","_count":{"orders":4}}]"#,
        );

        let restaurants = list_restaurants(&client).await.unwrap();

        assert_eq!(restaurants[0].location(), "Utrecht 3511");
        assert_eq!(restaurants[0].order_count(), 4);
        assert_eq!(restaurants[0].min_order, Some(12.5));
        let call = &transport.calls()[0];
        assert_eq!(call.bearer.as_deref(), Some("adm"));
        assert!(!call.with_credentials);
    }

    #[tokio::test]
    async fn test_update_restaurant_patches_encoded_id() {
        let (transport, _, client) = setup();
        client.establish_session(Some("adm")).unwrap();
        transport.respond(HttpMethod::Patch, "/admin/restaurants/r%201", 200, "{}");
        let form = RestaurantForm {
            name: "Hapke".into(),
            min_order: "15".into(),
            is_active: true,
            ..RestaurantForm::default()
        };

        update_restaurant(&client, "r 1", &form.to_update().unwrap()).await.unwrap();

        let body = transport.calls()[0].body.clone().unwrap();
        assert_eq!(body["minOrder"], json!(15.0));
        assert!(body.get("deliveryFee").is_none());
        assert_eq!(body["isActive"], json!(true));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_admin_session() {
        let (transport, storage, client) = setup();
        client.establish_session(Some("adm")).unwrap();
        transport.respond(HttpMethod::Get, "/admin/orders", 401, "");

        let err = list_orders(&client, &OrderFilter::default()).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(error_message(&err, ORDERS_FAILED), None);
        assert!(!storage.contains("adminToken"));
    }

    #[test]
    fn test_error_message_fallbacks() {
        let http = ApiError::Http { status: 500, message: "kapot".into() };
        let network = ApiError::Network("Failed to fetch".into());

        assert_eq!(error_message(&http, UPDATE_FAILED).as_deref(), Some("Kon restaurant niet bijwerken"));
        assert_eq!(error_message(&network, ORDERS_FAILED).as_deref(), Some("Failed to fetch"));
        assert_eq!(error_message(&ApiError::Unauthorized, ORDERS_FAILED), None);
    }

    #[test]
    fn test_filter_query_string() {
        assert_eq!(OrderFilter::default().query_string(), "");
        let filter = OrderFilter {
            restaurant_id: " r 1 ".into(),
            from: "2024-05-01".into(),
            to: String::new(),
        };
        assert_eq!(filter.query_string(), "?restaurantId=r%201&from=2024-05-01");
    }

    #[test]
    fn test_order_labels() {
        let order: AdminOrder = serde_json::from_value(json!({
            "id": 12,
            "total": "23.5",
            "status": "DELIVERED",
            "createdAt": "2024-05-01T12:30:00Z",
            "vendor": { "name": "Hapke" }
        }))
        .unwrap();
        assert_eq!(order.number(), "12");
        assert_eq!(order.amount_label(), "€ 23.50");
        assert_eq!(order.restaurant_label(), "Hapke");
        assert_eq!(order.date_label(), "01-05-2024 12:30");

        let bare: AdminOrder = serde_json::from_value(json!({ "id": "x", "orderNumber": "H-7" })).unwrap();
        assert_eq!(bare.number(), "H-7");
        assert_eq!(bare.amount_label(), "-");
        assert_eq!(bare.restaurant_label(), "-");
    }

    #[test]
    fn test_restaurant_form_amounts() {
        let bad = RestaurantForm { delivery_fee: "gratis".into(), ..RestaurantForm::default() };
        assert_eq!(bad.to_update(), Err(FormError::InvalidAmount));

        let restaurant: AdminRestaurant =
            serde_json::from_value(json!({ "id": "r1", "deliveryFee": 2.5, "isActive": null })).unwrap();
        let form = RestaurantForm::from_restaurant(&restaurant);
        assert_eq!(form.delivery_fee, "2.5");
        assert_eq!(form.min_order, "");
        assert!(!form.is_active);
    }
}
