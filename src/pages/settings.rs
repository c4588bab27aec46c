//! Restaurant Settings Page
//!
//! Edits the vendor's public restaurant profile.

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal_core::settings::SettingsForm;
use portal_core::{vendor, ApiError, SessionScope};
use web_sys::SubmitEvent;

use crate::components::{text_area, text_field, Flash, FlashBanner};
use crate::context::use_portal;

const SAVED: &str = "Gegevens opgeslagen";

#[component]
pub fn SettingsPage() -> impl IntoView {
    let portal = use_portal();
    let client = StoredValue::new(portal.vendor.clone());
    let portal = StoredValue::new(portal);

    let form = RwSignal::new(SettingsForm::default());
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let flash = Flash::new(portal.with_value(|p| p.config.flash_timeout));

    // Load on mount
    spawn_local(async move {
        let client = client.get_value();
        match vendor::get_restaurant(&client).await {
            Ok(settings) => {
                form.try_set(SettingsForm::from_settings(&settings));
            }
            Err(ApiError::Unauthorized) => {
                portal.try_with_value(|p| p.request_login(SessionScope::Vendor));
            }
            Err(err @ ApiError::Http { .. }) => {
                log::warn!("Restaurant laden mislukt: {}", err);
                set_error.try_set(Some("Kan gegevens niet ophalen".to_string()));
            }
            Err(err) => {
                set_error.try_set(Some(err.user_message("Kon restaurantgegevens niet laden")));
            }
        }
        set_loading.try_set(false);
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        set_error.set(None);
        flash.clear();
        let update = match form.with_untracked(SettingsForm::to_update) {
            Ok(update) => update,
            Err(invalid) => {
                set_error.set(Some(invalid.to_string()));
                return;
            }
        };
        set_saving.set(true);

        let client = client.get_value();
        spawn_local(async move {
            match vendor::update_restaurant(&client, &update).await {
                Ok(saved) => {
                    form.try_set(SettingsForm::after_save(&saved, &update));
                    flash.show(SAVED);
                }
                Err(ApiError::Unauthorized) => {
                    portal.try_with_value(|p| p.request_login(SessionScope::Vendor));
                }
                Err(err) => {
                    set_error.try_set(Some(err.user_message("Opslaan mislukt")));
                }
            }
            set_saving.try_set(false);
        });
    };

    view! {
        <div class="page card settings-page">
            <h2>"Instellingen"</h2>
            <p class="muted">
                "Pas hier de basisgegevens van je restaurant aan. De klant-app gebruikt deze gegevens direct."
            </p>

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="loading">"Gegevens laden…"</div> }
            >
                <form on:submit=on_submit>
                    {text_field(form, "Restaurantnaam", "text", "Restaurant naam", |f| &f.name, |f, v| f.name = v)}
                    {text_area(
                        form,
                        "Korte beschrijving",
                        "Vertel iets over jullie keuken",
                        |f| &f.description,
                        |f, v| f.description = v,
                    )}
                    {text_field(
                        form,
                        "Minimaal bestelbedrag (in euro’s)",
                        "text",
                        "25.00",
                        |f| &f.min_order_amount,
                        |f, v| f.min_order_amount = v,
                    )}

                    {move || error.get().map(|text| view! { <div class="error">{text}</div> })}
                    <FlashBanner flash=flash />

                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        {move || if saving.get() { "Opslaan…" } else { "Opslaan" }}
                    </button>
                </form>
            </Show>
        </div>
    }
}
