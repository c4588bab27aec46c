//! Navigation Bar Component
//!
//! Portal header with section links and the sign-in state.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate};
use portal_core::vendor;

use crate::context::use_portal;

const NAV_LINKS: &[(&str, &str)] = &[
    ("/orders", "Dashboard"),
    ("/menu", "Menu"),
    ("/settings", "Instellingen"),
];

#[component]
pub fn Nav() -> impl IntoView {
    let portal = use_portal();
    let location = use_location();
    let navigate = StoredValue::new(use_navigate());
    let (pending, set_pending) = signal(false);
    let client = StoredValue::new(portal.vendor.clone());

    // Re-read the stored session on every route change
    let session = portal.vendor.session().clone();
    let is_authed = Memo::new(move |_| {
        let _ = location.pathname.get();
        session.is_authenticated()
    });

    let logout = move |_| {
        if pending.get_untracked() {
            return;
        }
        set_pending.set(true);
        let client = client.get_value();
        spawn_local(async move {
            vendor::logout(&client).await;
            set_pending.set(false);
            navigate.with_value(|nav| nav("/login", Default::default()));
        });
    };

    view! {
        <header class="nav-bar">
            <A href="/">
                <strong class="nav-brand">"Hapke • Restaurant Portal"</strong>
            </A>
            <div class="nav-right">
                <Show when=move || is_authed.get()>
                    <nav class="nav-links">
                        {NAV_LINKS
                            .iter()
                            .map(|(href, label)| view! { <A href=*href>{*label}</A> })
                            .collect_view()}
                    </nav>
                </Show>
                <div class="nav-actions">
                    <Show
                        when=move || is_authed.get()
                        fallback=|| view! {
                            <A href="/register">"Registreren"</A>
                            <A href="/login">"Inloggen"</A>
                        }
                    >
                        <button type="button" on:click=logout disabled=move || pending.get()>
                            {move || if pending.get() { "Uitloggen…" } else { "Uitloggen" }}
                        </button>
                    </Show>
                </div>
            </div>
        </header>
    }
}
