//! Vendor Endpoints
//!
//! Typed wrappers for the `/vendor` namespace of the backend.

use serde_json::Value;

use crate::api::{path_segment, ApiClient, ApiError, ApiRequest, HttpTransport};
use crate::menu::{normalize_category, normalize_item, normalize_menu};
use crate::models::{
    non_blank, CategoryPayload, Credentials, LoginResponse, MenuCategory, MenuItem, MenuItemPayload,
    Order, OrderStatus, RegisterRequest, StatusUpdate,
};
use crate::session::SessionStorage;
use crate::settings::{RestaurantSettings, RestaurantUpdate};

// ========================
// Authentication
// ========================

pub async fn login<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let credentials = Credentials {
        email: email.trim().to_string(),
        password: password.trim().to_string(),
    };
    let request = ApiRequest::post("/vendor/login").json(&credentials)?.public();
    let response: Option<LoginResponse> = client.send_optional(request).await?;
    let token = response.and_then(|r| r.token);
    client.establish_session(token.as_deref())?;
    log::info!("Vendor signed in as {}", credentials.email);
    Ok(())
}

pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Ongeldige inloggegevens".to_string(),
        ApiError::Http { .. } => err.user_message("Login mislukt"),
        other => other.user_message("Er ging iets mis"),
    }
}

/// Raw sign-up form fields as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact_name: String,
    pub phone: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub description: String,
}

impl RegisterForm {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            contact_name: non_blank(&self.contact_name),
            phone: non_blank(&self.phone),
            street: non_blank(&self.street),
            postal_code: non_blank(&self.postal_code),
            city: non_blank(&self.city),
            description: non_blank(&self.description),
        }
    }
}

pub async fn register<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    form: &RegisterForm,
) -> Result<(), ApiError> {
    let request = ApiRequest::post("/vendor/register")
        .json(&form.to_request())?
        .public();
    let response: Option<LoginResponse> = client.send_optional(request).await?;
    client.establish_session(response.and_then(|r| r.token).as_deref())?;
    log::info!("Vendor registered: {}", form.email.trim());
    Ok(())
}

pub fn register_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { status: 400, .. } => err
            .server_message()
            .unwrap_or_else(|| "Registratiegegevens zijn ongeldig".to_string()),
        other => other.user_message("Registratie mislukt"),
    }
}

/// Best-effort sign-out; the local session is cleared whatever the backend says
pub async fn logout<T: HttpTransport, S: SessionStorage>(client: &ApiClient<T, S>) {
    if let Err(err) = client.send_unit(ApiRequest::post("/vendor/logout").public()).await {
        log::warn!("Vendor logout mislukt: {}", err);
    }
    client.end_session();
    log::info!("Vendor signed out");
}

// ========================
// Orders
// ========================

pub async fn list_orders<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
) -> Result<Vec<Order>, ApiError> {
    client.send_json(ApiRequest::get("/vendor/orders")).await
}

pub async fn update_order_status<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    order_id: &str,
    status: OrderStatus,
) -> Result<(), ApiError> {
    let path = format!("/vendor/orders/{}/status", path_segment(order_id));
    let request = ApiRequest::patch(path).json(&StatusUpdate { status })?.transition();
    client.send_unit(request).await
}

// ========================
// Menu
// ========================

pub async fn list_menu<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
) -> Result<Vec<MenuCategory>, ApiError> {
    let raw: Value = client.send_json(ApiRequest::get("/vendor/menu")).await?;
    Ok(normalize_menu(&raw))
}

pub async fn create_category<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    name: &str,
) -> Result<MenuCategory, ApiError> {
    let request = ApiRequest::post("/vendor/menu/category").json(&CategoryPayload { name: name.to_string() })?;
    let raw: Value = client.send_json(request).await?;
    Ok(normalize_category(&raw))
}

/// Rename a category; returns the server's echo when it sent one
pub async fn rename_category<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    category_id: &str,
    name: &str,
) -> Result<Option<Value>, ApiError> {
    let path = format!("/vendor/menu/category/{}", path_segment(category_id));
    let request = ApiRequest::put(path).json(&CategoryPayload { name: name.to_string() })?;
    client.send_optional(request).await
}

pub async fn delete_category<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    category_id: &str,
) -> Result<(), ApiError> {
    let path = format!("/vendor/menu/category/{}", path_segment(category_id));
    client.send_unit(ApiRequest::delete(path)).await
}

/// Create (no `item_id`) or update an item
pub async fn save_item<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    item_id: Option<&str>,
    payload: &MenuItemPayload,
) -> Result<MenuItem, ApiError> {
    let request = match item_id {
        Some(id) => ApiRequest::put(format!("/vendor/menu/item/{}", path_segment(id))),
        None => ApiRequest::post("/vendor/menu/item"),
    };
    let raw: Value = client.send_json(request.json(payload)?).await?;
    Ok(normalize_item(&raw))
}

pub async fn delete_item<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    item_id: &str,
) -> Result<(), ApiError> {
    let path = format!("/vendor/menu/item/{}", path_segment(item_id));
    client.send_unit(ApiRequest::delete(path)).await
}

/// Flip availability; falls back to the local flip when the server echoes nothing
pub async fn toggle_availability<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    item: &MenuItem,
) -> Result<MenuItem, ApiError> {
    let path = format!("/vendor/menu/item/{}", path_segment(&item.id));
    let request = ApiRequest::put(path).json(&MenuItemPayload::toggled(item))?;
    let echoed: Option<Value> = client.send_optional(request).await?;
    Ok(match echoed.filter(Value::is_object) {
        Some(raw) => normalize_item(&raw),
        None => MenuItem {
            available: !item.available,
            ..item.clone()
        },
    })
}

// ========================
// Restaurant
// ========================

pub async fn get_restaurant<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
) -> Result<RestaurantSettings, ApiError> {
    client.send_json(ApiRequest::get("/vendor/restaurant")).await
}

pub async fn update_restaurant<T: HttpTransport, S: SessionStorage>(
    client: &ApiClient<T, S>,
    update: &RestaurantUpdate,
) -> Result<RestaurantSettings, ApiError> {
    let request = ApiRequest::put("/vendor/restaurant").json(update)?;
    client.send_json(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpMethod, UnauthorizedGate};
    use crate::session::MemoryStorage;
    use crate::testing::{vendor_client, FakeTransport};
    use serde_json::json;

    fn setup() -> (FakeTransport, MemoryStorage, ApiClient<FakeTransport, MemoryStorage>) {
        let transport = FakeTransport::new();
        let storage = MemoryStorage::new();
        let client = vendor_client(&transport, &storage, UnauthorizedGate::silent());
        (transport, storage, client)
    }

    #[tokio::test]
    async fn test_login_stores_token_and_marker() {
        let (transport, storage, client) = setup();
        transport.respond(HttpMethod::Post, "/vendor/login", 200, r#"{"token":"t1"}"#);

        login(&client, " chef@hapke.nl ", "geheim ").await.unwrap();

        assert_eq!(storage.get("vendor_token").as_deref(), Some("t1"));
        assert_eq!(storage.get("vendor_session").as_deref(), Some("1"));
        let body = transport.calls()[0].body.clone().unwrap();
        assert_eq!(body, json!({ "email": "chef@hapke.nl", "password": "geheim" }));
    }

    #[tokio::test]
    async fn test_login_without_token_uses_cookie_session() {
        let (transport, storage, client) = setup();
        transport.respond(HttpMethod::Post, "/vendor/login", 200, "{}");

        login(&client, "a@b.nl", "pw").await.unwrap();

        assert!(client.session().is_authenticated());
        assert!(!storage.contains("vendor_token"));
    }

    #[tokio::test]
    async fn test_login_bad_credentials_message() {
        let (transport, _, client) = setup();
        transport.respond(HttpMethod::Post, "/vendor/login", 401, "");

        let err = login(&client, "a@b.nl", "fout").await.unwrap_err();

        assert_eq!(login_error_message(&err), "Ongeldige inloggegevens");
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_validation_message() {
        let (transport, _, client) = setup();
        transport.respond(HttpMethod::Post, "/vendor/register", 400, r#"{"message":"E-mail bestaat al"}"#);
        transport.respond(HttpMethod::Post, "/vendor/register", 400, "");
        let form = RegisterForm {
            name: "Hapke".into(),
            email: "a@b.nl".into(),
            password: "geheim123".into(),
            city: " Utrecht ".into(),
            ..RegisterForm::default()
        };

        let first = register(&client, &form).await.unwrap_err();
        let second = register(&client, &form).await.unwrap_err();

        assert_eq!(register_error_message(&first), "E-mail bestaat al");
        assert_eq!(register_error_message(&second), "Registratiegegevens zijn ongeldig");
        let body = transport.calls()[0].body.clone().unwrap();
        assert_eq!(body["city"], "Utrecht");
        assert!(body.get("phone").is_none());
    }

    #[tokio::test]
    async fn test_logout_is_best_effort() {
        let (transport, storage, client) = setup();
        client.establish_session(Some("t")).unwrap();
        transport.fail(HttpMethod::Post, "/vendor/logout", "offline");

        logout(&client).await;

        assert!(!storage.contains("vendor_session"));
        assert!(!storage.contains("vendor_token"));
    }

    #[tokio::test]
    async fn test_update_status_request_shape() {
        let (transport, _, client) = setup();
        transport.respond(HttpMethod::Patch, "/vendor/orders/o%2F1/status", 200, "{}");

        update_order_status(&client, "o/1", OrderStatus::Delivered).await.unwrap();

        let call = &transport.calls()[0];
        assert_eq!(call.body, Some(json!({ "status": "DELIVERED" })));
    }

    #[tokio::test]
    async fn test_toggle_availability_without_echo() {
        let (transport, _, client) = setup();
        transport.respond(HttpMethod::Put, "/vendor/menu/item/a", 200, "");
        let item = MenuItem {
            id: "a".into(),
            name: "Friet".into(),
            description: String::new(),
            price: 3.0,
            available: true,
            image_url: None,
        };

        let updated = toggle_availability(&client, &item).await.unwrap();

        assert!(!updated.available);
        assert_eq!(transport.calls()[0].body.as_ref().unwrap()["available"], false);
    }

    #[tokio::test]
    async fn test_save_item_posts_or_puts() {
        let (transport, _, client) = setup();
        transport.respond(HttpMethod::Post, "/vendor/menu/item", 201, r#"{"id":9,"name":"Kroket","price":2.5}"#);
        transport.respond(HttpMethod::Put, "/vendor/menu/item/9", 200, r#"{"id":9,"name":"Kroket XL","price":3}"#);
        let payload = MenuItemPayload {
            category_id: Some("c".into()),
            name: "Kroket".into(),
            description: String::new(),
            price: 2.5,
            available: true,
            image_url: None,
        };

        let created = save_item(&client, None, &payload).await.unwrap();
        let updated = save_item(&client, Some("9"), &payload).await.unwrap();

        assert_eq!(created.id, "9");
        assert_eq!(updated.name, "Kroket XL");
        assert_eq!(updated.price, 3.0);
    }
}
