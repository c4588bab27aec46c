//! Vendor Registration Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use portal_core::vendor::{self, RegisterForm};
use web_sys::SubmitEvent;

use crate::components::{text_area, text_field};
use crate::context::use_portal;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let portal = use_portal();
    let client = StoredValue::new(portal.vendor.clone());
    let navigate = StoredValue::new(use_navigate());

    let form = RwSignal::new(RegisterForm::default());
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
        let submitted = form.get_untracked();
        spawn_local(async move {
            let result = vendor::register(&client, &submitted).await;
            set_loading.set(false);
            match result {
                Ok(()) => navigate.with_value(|nav| nav("/orders", Default::default())),
                Err(err) => set_error.set(Some(vendor::register_error_message(&err))),
            }
        });
    };

    view! {
        <div class="page card register-page">
            <h2>"Meld jouw restaurant aan"</h2>
            <p class="muted">
                "Vul de gegevens van je restaurant in. Na registratie kun je meteen inloggen en je menu aanvullen."
            </p>
            <form on:submit=on_submit>
                {text_field(form, "Bedrijfsnaam*", "text", "Restaurant De Hapke", |f| &f.name, |f, v| f.name = v)}
                {text_field(form, "Contact e-mail*", "email", "contact@restaurant.nl", |f| &f.email, |f, v| f.email = v)}
                {text_field(form, "Wachtwoord*", "password", "Minimaal 8 tekens", |f| &f.password, |f, v| f.password = v)}
                {text_field(form, "Contactpersoon", "text", "", |f| &f.contact_name, |f, v| f.contact_name = v)}
                {text_field(form, "Telefoonnummer", "tel", "", |f| &f.phone, |f, v| f.phone = v)}
                {text_field(form, "Straat + nummer", "text", "", |f| &f.street, |f, v| f.street = v)}
                <div class="field-row">
                    {text_field(form, "Postcode", "text", "", |f| &f.postal_code, |f, v| f.postal_code = v)}
                    {text_field(form, "Plaats", "text", "", |f| &f.city, |f, v| f.city = v)}
                </div>
                {text_area(
                    form,
                    "Korte omschrijving",
                    "Beschrijf jouw keuken, specialiteiten of openingstijden",
                    |f| &f.description,
                    |f, v| f.description = v,
                )}

                {move || error.get().map(|text| view! { <div class="error">{text}</div> })}

                <button type="submit" class="primary-btn" disabled=move || loading.get()>
                    {move || if loading.get() { "Versturen…" } else { "Account aanmaken" }}
                </button>
            </form>
            <p>"Al een account? " <A href="/login">"Log direct in"</A> "."</p>
        </div>
    }
}
