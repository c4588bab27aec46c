//! Admin Header Component
//!
//! Page title with the admin sign-out button.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use portal_core::admin;

use crate::context::use_portal;

#[component]
pub fn AdminHeader(title: &'static str) -> impl IntoView {
    let portal = use_portal();
    let client = StoredValue::new(portal.admin.clone());
    let navigate = StoredValue::new(use_navigate());

    let logout = move |_| {
        client.with_value(admin::admin_logout);
        navigate.with_value(|nav| nav("/admin/login", Default::default()));
    };

    view! {
        <div class="admin-header">
            <h2>{title}</h2>
            <button type="button" class="secondary-btn" on:click=logout>"Uitloggen"</button>
        </div>
    }
}
