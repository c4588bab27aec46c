//! Restaurant Portal Frontend App
//!
//! Router, shared context and the login redirect shell.

use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::use_navigate;
use leptos_router::{path, NavigateOptions};

use crate::components::Nav;
use crate::config;
use crate::context::{use_portal, PortalContext};
use crate::pages::{
    AdminLoginPage, AdminOrdersPage, AdminRestaurantsPage, LoginPage, MenuPage, OrdersPage,
    RegisterPage, SettingsPage,
};

#[component]
pub fn App() -> impl IntoView {
    provide_context(PortalContext::new(config::load()));

    view! {
        <Router>
            <Shell />
        </Router>
    }
}

/// Layout inside the router; follows login redirects raised by expired sessions
#[component]
fn Shell() -> impl IntoView {
    let portal = use_portal();
    let navigate = StoredValue::new(use_navigate());

    Effect::new(move |_| {
        if let Some(route) = portal.take_redirect() {
            log::info!("Redirecting to {}", route);
            let options = NavigateOptions {
                replace: true,
                ..Default::default()
            };
            navigate.with_value(|nav| nav(&route, options));
        }
    });

    view! {
        <div class="app-layout">
            <Nav />
            <main class="main-content">
                <Routes fallback=|| view! { <div class="page">"Pagina niet gevonden."</div> }>
                    <Route path=path!("/") view=OrdersPage />
                    <Route path=path!("/orders") view=OrdersPage />
                    <Route path=path!("/menu") view=MenuPage />
                    <Route path=path!("/settings") view=SettingsPage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/register") view=RegisterPage />
                    <Route path=path!("/admin/login") view=AdminLoginPage />
                    <Route path=path!("/admin/restaurants") view=AdminRestaurantsPage />
                    <Route path=path!("/admin/orders") view=AdminOrdersPage />
                </Routes>
            </main>
        </div>
    }
}
