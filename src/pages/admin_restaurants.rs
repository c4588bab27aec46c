//! Admin Restaurants Page
//!
//! Restaurant overview with an edit form for the selected row.

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal_core::admin::{self, AdminRestaurant, RestaurantForm};
use portal_core::{ApiError, SessionScope};
use web_sys::SubmitEvent;

use crate::components::{text_area, text_field, AdminHeader};
use crate::context::use_portal;

#[component]
pub fn AdminRestaurantsPage() -> impl IntoView {
    let portal = use_portal();
    if !portal.admin.session().is_authenticated() {
        portal.request_login(SessionScope::Admin);
    }
    let client = StoredValue::new(portal.admin.clone());
    let portal = StoredValue::new(portal);

    let restaurants = RwSignal::new(Vec::<AdminRestaurant>::new());
    let selected = RwSignal::new(None::<String>);
    let form = RwSignal::new(RestaurantForm::default());
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let message = RwSignal::new(None::<String>);

    let fail = move |err: ApiError, fallback: &str| match admin::error_message(&err, fallback) {
        Some(text) => {
            log::warn!("{}: {}", fallback, err);
            message.try_set(Some(text));
        }
        None => {
            portal.try_with_value(|p| p.request_login(SessionScope::Admin));
        }
    };

    let load = move || {
        loading.set(true);
        let client = client.get_value();
        spawn_local(async move {
            let result = admin::list_restaurants(&client).await;
            if loading.is_disposed() {
                return;
            }
            match result {
                Ok(list) => {
                    let next = admin::resolve_selection(&list, selected.get_untracked().as_deref());
                    restaurants.set(list);
                    selected.set(next);
                }
                Err(err) => fail(err, admin::RESTAURANTS_FAILED),
            }
            loading.set(false);
        });
    };
    if client.with_value(|c| c.session().is_authenticated()) {
        load();
    }

    let current = Memo::new(move |_| {
        let id = selected.get()?;
        restaurants.with(|list| list.iter().find(|r| r.id == id).cloned())
    });

    // Form follows the selected restaurant
    Effect::new(move |_| {
        let next = current.with(|r| r.as_ref().map(RestaurantForm::from_restaurant));
        form.set(next.unwrap_or_default());
    });

    let on_save = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(id) = selected.get_untracked() else {
            return;
        };
        if saving.get_untracked() {
            return;
        }
        message.set(None);
        let update = match form.with_untracked(RestaurantForm::to_update) {
            Ok(update) => update,
            Err(invalid) => return message.set(Some(invalid.to_string())),
        };
        saving.set(true);

        let client = client.get_value();
        spawn_local(async move {
            match admin::update_restaurant(&client, &id, &update).await {
                Ok(()) if !saving.is_disposed() => {
                    message.set(Some(admin::SAVED.to_string()));
                    load();
                }
                Ok(()) => {}
                Err(err) => fail(err, admin::UPDATE_FAILED),
            }
            saving.try_set(false);
        });
    };

    view! {
        <div class="page admin-page">
            <AdminHeader title="Admin • Restaurants" />
            {move || message.get().map(|text| view! { <div class="banner">{text}</div> })}
            <div class="admin-layout">
                <table class="admin-table">
                    <thead>
                        <tr>
                            <th>"Naam"</th>
                            <th>"Plaats"</th>
                            <th>"Orders"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || restaurants.get()
                            key=|r| (r.id.clone(), r.display_name().to_string(), r.location(), r.order_count())
                            children=move |r| {
                                let id = StoredValue::new(r.id.clone());
                                let is_selected = move || {
                                    id.with_value(|id| selected.with(|s| s.as_deref() == Some(id.as_str())))
                                };
                                view! {
                                    <tr
                                        class=move || if is_selected() { "selected" } else { "" }
                                        on:click=move |_| selected.set(Some(id.get_value()))
                                    >
                                        <td>{r.display_name().to_string()}</td>
                                        <td>{r.location()}</td>
                                        <td>{r.order_count()}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || loading.get()>
                    <div class="loading">"Laden..."</div>
                </Show>

                <section class="admin-edit">
                    <h3>"Bewerken"</h3>
                    <Show
                        when=move || current.with(Option::is_some)
                        fallback=|| view! { <div class="muted">"Selecteer een restaurant."</div> }
                    >
                        <form on:submit=on_save>
                            {text_field(form, "Naam", "text", "", |f| &f.name, |f, v| f.name = v)}
                            {text_area(form, "Beschrijving", "", |f| &f.description, |f, v| f.description = v)}
                            {text_field(form, "Straat", "text", "", |f| &f.street, |f, v| f.street = v)}
                            {text_field(form, "Postcode", "text", "", |f| &f.postal_code, |f, v| f.postal_code = v)}
                            {text_field(form, "Plaats", "text", "", |f| &f.city, |f, v| f.city = v)}
                            {text_field(form, "Min. order (€)", "text", "", |f| &f.min_order, |f, v| f.min_order = v)}
                            {text_field(
                                form,
                                "Bezorgkosten (€)",
                                "text",
                                "",
                                |f| &f.delivery_fee,
                                |f, v| f.delivery_fee = v,
                            )}
                            <label class="checkbox">
                                <input
                                    type="checkbox"
                                    prop:checked=move || form.with(|f| f.is_active)
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        form.update(|f| f.is_active = checked);
                                    }
                                />
                                "Actief"
                            </label>
                            <button type="submit" class="primary-btn" disabled=move || saving.get()>
                                {move || if saving.get() { "Opslaan..." } else { "Opslaan" }}
                            </button>
                        </form>
                    </Show>
                </section>
            </div>
        </div>
    }
}
