//! Menu Management
//!
//! Decoding of the vendor menu and the local list edits applied after
//! successful category/item requests.

use serde_json::Value;

use crate::models::{id_from_value, parse_amount, FormError, MenuCategory, MenuItem, MenuItemPayload};

const UNNAMED_CATEGORY: &str = "Naamloos";
const UNNAMED_ITEM: &str = "Onbenoemd gerecht";

fn raw_id(raw: &Value) -> String {
    raw.get("id")
        .and_then(id_from_value)
        .or_else(|| raw.get("_id").and_then(id_from_value))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn raw_str(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

// ========================
// Decoding
// ========================

/// Decode the menu list; anything other than an array is an empty menu
pub fn normalize_menu(raw: &Value) -> Vec<MenuCategory> {
    raw.as_array()
        .map(|categories| categories.iter().map(normalize_category).collect())
        .unwrap_or_default()
}

pub fn normalize_category(raw: &Value) -> MenuCategory {
    MenuCategory {
        id: raw_id(raw),
        name: raw_str(raw, "name").unwrap_or_else(|| UNNAMED_CATEGORY.to_string()),
        items: raw
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(normalize_item).collect())
            .unwrap_or_default(),
    }
}

pub fn normalize_item(raw: &Value) -> MenuItem {
    let price = match raw.get("price") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    MenuItem {
        id: raw_id(raw),
        name: raw_str(raw, "name").unwrap_or_else(|| UNNAMED_ITEM.to_string()),
        description: raw_str(raw, "description").unwrap_or_default(),
        price,
        available: raw.get("available").and_then(Value::as_bool) != Some(false),
        image_url: raw_str(raw, "imageUrl"),
    }
}

// ========================
// Selection
// ========================

/// Keep the previous selection when it still exists, else pick the first category
pub fn resolve_selection(categories: &[MenuCategory], previous: Option<&str>) -> Option<String> {
    previous
        .filter(|id| categories.iter().any(|cat| cat.id == *id))
        .map(str::to_string)
        .or_else(|| categories.first().map(|cat| cat.id.clone()))
}

// ========================
// Local edits
// ========================

/// Apply a rename; `updated` is the server's echo of the category if it sent one
pub fn apply_rename(categories: &mut [MenuCategory], category_id: &str, name: &str, updated: Option<&Value>) {
    let Some(category) = categories.iter_mut().find(|cat| cat.id == category_id) else {
        return;
    };
    match updated.filter(|value| value.is_object()) {
        Some(value) => {
            category.name = raw_str(value, "name").unwrap_or_else(|| name.to_string());
            if let Some(items) = value.get("items").and_then(Value::as_array) {
                category.items = items.iter().map(normalize_item).collect();
            }
        }
        None => category.name = name.to_string(),
    }
}

/// Remove a category and return the selection that should follow
pub fn remove_category(
    categories: &mut Vec<MenuCategory>,
    category_id: &str,
    selected: Option<&str>,
) -> Option<String> {
    categories.retain(|cat| cat.id != category_id);
    match selected {
        Some(id) if id == category_id => categories.first().map(|cat| cat.id.clone()),
        other => other.map(str::to_string),
    }
}

/// Insert or replace an item within its category
pub fn upsert_item(categories: &mut [MenuCategory], category_id: &str, item: MenuItem) {
    let Some(category) = categories.iter_mut().find(|cat| cat.id == category_id) else {
        return;
    };
    match category.items.iter_mut().find(|existing| existing.id == item.id) {
        Some(existing) => *existing = item,
        None => category.items.push(item),
    }
}

pub fn remove_item(categories: &mut [MenuCategory], category_id: &str, item_id: &str) {
    if let Some(category) = categories.iter_mut().find(|cat| cat.id == category_id) {
        category.items.retain(|item| item.id != item_id);
    }
}

// ========================
// Forms
// ========================

pub fn validate_new_category(raw: &str) -> Result<String, FormError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(FormError::EmptyCategoryName);
    }
    Ok(name.to_string())
}

pub fn validate_rename(draft: &str, current: &str) -> Result<String, FormError> {
    let name = draft.trim();
    if name.is_empty() {
        return Err(FormError::CategoryNameRequired);
    }
    if name == current {
        return Err(FormError::Unchanged);
    }
    Ok(name.to_string())
}

/// Editable state of the item form; `id` is set while editing an existing item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemForm {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub available: bool,
    pub image_url: String,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            price: String::new(),
            available: true,
            image_url: String::new(),
        }
    }
}

impl ItemForm {
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            name: item.name.clone(),
            description: item.description.clone(),
            price: format!("{:.2}", item.price),
            available: item.available,
            image_url: item.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn to_payload(&self, category_id: &str) -> Result<MenuItemPayload, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyItemName);
        }
        let price = parse_amount(&self.price).ok_or(FormError::InvalidPrice)?;
        let image_url = self.image_url.trim();
        Ok(MenuItemPayload {
            category_id: Some(category_id.to_string()),
            name: name.to_string(),
            description: self.description.trim().to_string(),
            price,
            available: self.available,
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        })
    }
}
