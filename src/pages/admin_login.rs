//! Platform Admin Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use portal_core::admin;
use web_sys::SubmitEvent;

use crate::context::use_portal;

#[component]
pub fn AdminLoginPage() -> impl IntoView {
    let portal = use_portal();
    let client = StoredValue::new(portal.admin.clone());
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
            let result = admin::admin_login(&client, &email, &password).await;
            set_loading.try_set(false);
            match result {
                Ok(()) => navigate.with_value(|nav| nav("/admin/restaurants", Default::default())),
                Err(err) => {
                    log::warn!("Admin login failed: {}", err);
                    set_error.try_set(Some(err.user_message()));
                }
            }
        });
    };

    view! {
        <div class="page auth-page admin">
            <h2>"Admin login"</h2>
            <p class="muted">"Log in met je admin-account."</p>
            <form on:submit=on_submit>
                <label class="field">
                    <span class="field-label">"E-mail"</span>
                    <input
                        type="email"
                        required
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span class="field-label">"Wachtwoord"</span>
                    <input
                        type="password"
                        required
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                {move || error.get().map(|text| view! { <div class="error">{text}</div> })}
                <button type="submit" class="primary-btn" disabled=move || loading.get()>
                    {move || if loading.get() { "Inloggen…" } else { "Inloggen" }}
                </button>
            </form>
        </div>
    }
}
