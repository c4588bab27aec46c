//! Orders Dashboard Page
//!
//! Live order list with per-order status buttons. Polling runs while the page
//! is mounted and stops on unmount.

use gloo_timers::future::sleep;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use portal_core::models::OrderStatus;
use portal_core::{DashboardState, DashboardView, OrdersController};

use crate::components::OrderCard;
use crate::context::use_portal;

/// Dashboard state held in a signal
#[derive(Clone, Copy)]
struct DashboardSignal(RwSignal<DashboardState>);

impl DashboardView for DashboardSignal {
    fn update(&self, apply: &mut dyn FnMut(&mut DashboardState)) {
        // Disposed once the page is gone
        self.0.try_update(|state| apply(state));
    }
}

#[component]
pub fn OrdersPage() -> impl IntoView {
    let portal = use_portal();
    let dashboard = RwSignal::new(DashboardState::default());
    let controller = OrdersController::new(
        portal.vendor.clone(),
        DashboardSignal(dashboard),
        portal.config.poll_interval,
    );

    let token = controller.cancel_token();
    on_cleanup(move || token.cancel());

    let poller = controller.clone();
    spawn_local(async move {
        poller.run(sleep).await;
    });

    let controller = StoredValue::new(controller);
    let on_status = Callback::new(move |(order_id, target): (String, OrderStatus)| {
        let controller = controller.get_value();
        spawn_local(async move {
            controller.update_status(&order_id, target).await;
        });
    });

    // Every successful fetch rebuilds the cards from scratch
    let orders = Memo::new(move |_| dashboard.with(|s| s.orders.clone()));

    view! {
        <div class="page orders-page">
            <h2>"Dashboard — Nieuwe orders"</h2>

            <Show when=move || !dashboard.with(|s| s.authenticated)>
                <div class="banner warning">
                    <strong>"Niet ingelogd."</strong>
                    " "
                    <span>"Log in om live orders te zien."</span>
                    " "
                    <A href="/login">"Naar inloggen →"</A>
                </div>
            </Show>

            {move || dashboard.with(|s| s.error.clone()).map(|error| view! { <div class="error">{error}</div> })}

            <Show when=move || dashboard.with(DashboardState::is_empty)>
                <div class="empty">"Geen nieuwe orders…"</div>
            </Show>

            {move || {
                orders
                    .get()
                    .into_iter()
                    .map(|order| view! { <OrderCard order=order dashboard=dashboard on_status=on_status /> })
                    .collect_view()
            }}
        </div>
    }
}
