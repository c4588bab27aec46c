//! Menu Page State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use portal_core::menu;
use portal_core::models::{MenuCategory, MenuItem};
use reactive_stores::Store;
use serde_json::Value;

/// Menu editor state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct MenuState {
    /// All categories, in backend order
    pub categories: Vec<MenuCategory>,
    /// Category shown in the item panel
    pub selected: Option<String>,
}

/// Type alias for the store
pub type MenuStore = Store<MenuState>;

/// Get the menu store from context
pub fn use_menu_store() -> MenuStore {
    expect_context::<MenuStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the menu after a load, keeping the selection when possible
pub fn store_replace_menu(store: &MenuStore, categories: Vec<MenuCategory>) {
    let selected = menu::resolve_selection(&categories, store.selected().get_untracked().as_deref());
    store.categories().set(categories);
    store.selected().set(selected);
}

pub fn store_selected_category(store: &MenuStore) -> Option<MenuCategory> {
    let selected = store.selected().get()?;
    store
        .categories()
        .read()
        .iter()
        .find(|cat| cat.id == selected)
        .cloned()
}

/// Append a new category and select it
pub fn store_add_category(store: &MenuStore, category: MenuCategory) {
    let id = category.id.clone();
    store.categories().write().push(category);
    store.selected().set(Some(id));
}

pub fn store_rename_category(store: &MenuStore, category_id: &str, name: &str, echo: Option<&Value>) {
    menu::apply_rename(&mut store.categories().write(), category_id, name, echo);
}

pub fn store_remove_category(store: &MenuStore, category_id: &str) {
    let selected = store.selected().get_untracked();
    let next = menu::remove_category(&mut store.categories().write(), category_id, selected.as_deref());
    store.selected().set(next);
}

/// Insert or replace an item in a category
pub fn store_upsert_item(store: &MenuStore, category_id: &str, item: MenuItem) {
    menu::upsert_item(&mut store.categories().write(), category_id, item);
}

pub fn store_remove_item(store: &MenuStore, category_id: &str, item_id: &str) {
    menu::remove_item(&mut store.categories().write(), category_id, item_id);
}
