//! Vendor Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use portal_core::vendor;
use web_sys::SubmitEvent;

use crate::context::use_portal;

#[component]
pub fn LoginPage() -> impl IntoView {
    let portal = use_portal();
    let client = StoredValue::new(portal.vendor.clone());
    let navigate = StoredValue::new(use_navigate());

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }
        set_error.set(None);
        set_loading.set(true);

        let client = client.get_value();
        let email = email.get_untracked();
        let password = password.get_untracked();
        spawn_local(async move {
            let result = vendor::login(&client, &email, &password).await;
            set_loading.set(false);
            match result {
                Ok(()) => navigate.with_value(|nav| nav("/orders", Default::default())),
                Err(err) => set_error.set(Some(vendor::login_error_message(&err))),
            }
        });
    };

    view! {
        <div class="page auth-page">
            <h2>"Restaurant login"</h2>
            <form on:submit=on_submit>
                <input
                    type="email"
                    required
                    placeholder="E-mail"
                    prop:value=email
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    required
                    placeholder="Wachtwoord"
                    prop:value=password
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button type="submit" class="primary-btn" disabled=move || loading.get()>
                    {move || if loading.get() { "Inloggen…" } else { "Inloggen" }}
                </button>
                {move || error.get().map(|text| view! { <div class="error">{text}</div> })}
            </form>
            <p>"Nog geen account? " <A href="/register">"Registreer je bedrijf"</A> "."</p>
        </div>
    }
}
