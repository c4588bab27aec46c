//! Admin Orders Page
//!
//! Cross-restaurant order list with restaurant and date filters.

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal_core::admin::{self, AdminOrder, OrderFilter};
use portal_core::SessionScope;
use web_sys::SubmitEvent;

use crate::components::{text_field, AdminHeader};
use crate::context::use_portal;

#[component]
pub fn AdminOrdersPage() -> impl IntoView {
    let portal = use_portal();
    let authenticated = portal.admin.session().is_authenticated();
    if !authenticated {
        portal.request_login(SessionScope::Admin);
    }
    let client = StoredValue::new(portal.admin.clone());
    let portal = StoredValue::new(portal);

    let orders = RwSignal::new(Vec::<AdminOrder>::new());
    let filter = RwSignal::new(OrderFilter::default());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let load = move || {
        loading.set(true);
        error.set(None);
        let client = client.get_value();
        let filter = filter.get_untracked();
        spawn_local(async move {
            let result = admin::list_orders(&client, &filter).await;
            if loading.is_disposed() {
                return;
            }
            match result {
                Ok(list) => orders.set(list),
                Err(err) => match admin::error_message(&err, admin::ORDERS_FAILED) {
                    Some(text) => {
                        log::warn!("{}: {}", admin::ORDERS_FAILED, err);
                        error.set(Some(text));
                    }
                    None => portal.with_value(|p| p.request_login(SessionScope::Admin)),
                },
            }
            loading.set(false);
        });
    };
    if authenticated {
        load();
    }

    let on_apply = move |ev: SubmitEvent| {
        ev.prevent_default();
        load();
    };
    let on_reset = move |_| {
        filter.set(OrderFilter::default());
        load();
    };

    view! {
        <div class="page admin-page">
            <AdminHeader title="Admin • Orders" />
            <form class="admin-filters" on:submit=on_apply>
                {text_field(
                    filter,
                    "Restaurant ID",
                    "text",
                    "optioneel",
                    |f| &f.restaurant_id,
                    |f, v| f.restaurant_id = v,
                )}
                {text_field(filter, "Vanaf", "date", "", |f| &f.from, |f, v| f.from = v)}
                {text_field(filter, "Tot", "date", "", |f| &f.to, |f, v| f.to = v)}
                <div class="form-actions">
                    <button type="submit" class="primary-btn" disabled=move || loading.get()>
                        {move || if loading.get() { "Laden..." } else { "Toepassen" }}
                    </button>
                    <button type="button" class="secondary-btn" on:click=on_reset>"Reset"</button>
                </div>
            </form>
            {move || error.get().map(|text| view! { <div class="error">{text}</div> })}
            <table class="admin-table">
                <thead>
                    <tr>
                        <th>"Order"</th>
                        <th>"Status"</th>
                        <th>"Bedrag"</th>
                        <th>"Restaurant"</th>
                        <th>"Datum"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        orders
                            .get()
                            .into_iter()
                            .map(|o| view! {
                                <tr>
                                    <td>{o.number().to_string()}</td>
                                    <td>{o.status.clone().unwrap_or_default()}</td>
                                    <td>{o.amount_label()}</td>
                                    <td>{o.restaurant_label().to_string()}</td>
                                    <td>{o.date_label()}</td>
                                </tr>
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
        </div>
    }
}
