//! Order Card Component
//!
//! One order on the dashboard with its status buttons.

use leptos::prelude::*;
use portal_core::models::{format_euro, Order, OrderStatus};
use portal_core::DashboardState;
use wasm_bindgen::JsValue;

/// Local time of day, or the raw value when it is not a known timestamp
fn local_time(order: &Order) -> String {
    match order.placed_at() {
        Some(at) => {
            let millis = at.timestamp_millis() as f64;
            String::from(js_sys::Date::new(&JsValue::from_f64(millis)).to_locale_time_string("nl-NL"))
        }
        None => order.created_at.clone(),
    }
}

#[component]
pub fn OrderCard(
    order: Order,
    dashboard: RwSignal<DashboardState>,
    #[prop(into)] on_status: Callback<(String, OrderStatus)>,
) -> impl IntoView {
    let id = StoredValue::new(order.id.clone());
    let current = order.status;
    let loading = Memo::new(move |_| id.with_value(|id| dashboard.with(|s| s.is_loading(id))));
    let message = Memo::new(move |_| {
        id.with_value(|id| dashboard.with(|s| s.message(id).map(str::to_string)))
    });

    view! {
        <div class="order-card">
            <div class="order-head">
                <strong>"#" {order.id.clone()}</strong>
                <span>{local_time(&order)}</span>
            </div>
            <ul class="order-items">
                {order
                    .items
                    .iter()
                    .map(|item| view! { <li>{format!("{}× {}", item.qty, item.name)}</li> })
                    .collect_view()}
            </ul>
            {order.note.clone().map(|note| view! {
                <div class="order-note"><em>"Opmerking:"</em> " " {note}</div>
            })}
            {order.total.map(|total| view! {
                <div class="order-total"><strong>"Totaal:"</strong> " " {format_euro(total)}</div>
            })}
            <div class="status-actions">
                {OrderStatus::ACTIONS
                    .iter()
                    .map(|&action| {
                        let class = if current == action { "status-btn active" } else { "status-btn" };
                        view! {
                            <button
                                type="button"
                                class=class
                                disabled=move || loading.get()
                                on:click=move |_| on_status.run((id.get_value(), action))
                            >
                                {action.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            {move || message.get().map(|text| view! { <div class="status-message">{text}</div> })}
        </div>
    }
}
