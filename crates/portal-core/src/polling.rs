//! Orders Polling Controller
//!
//! Drives the orders dashboard: an immediate fetch on mount, a refetch every
//! interval, and per-order status transitions that end in a full refetch.
//!
//! The controller is tied to the view's lifetime through a
//! [`CancellationToken`]. Cancelling it stops the timer loop, and every
//! response that resolves afterwards is dropped instead of written, so a
//! torn-down view is never touched.

use std::future::Future;
use std::time::Duration;

use futures::future::{select, Either};
use futures::pin_mut;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ApiError, HttpTransport};
use crate::dashboard::{DashboardState, DashboardView};
use crate::models::OrderStatus;
use crate::session::SessionStorage;
use crate::vendor;

const FETCH_FAILED: &str = "Kan orders niet ophalen";
const LOAD_FAILED: &str = "Fout bij laden";
const STATUS_FAILED: &str = "Status bijwerken mislukt";

/// Whether polling should go on after a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollFlow {
    Continue,
    Stop,
}

#[derive(Clone)]
pub struct OrdersController<T, S, V> {
    client: ApiClient<T, S>,
    view: V,
    interval: Duration,
    cancel: CancellationToken,
}

impl<T, S, V> OrdersController<T, S, V>
where
    T: HttpTransport,
    S: SessionStorage,
    V: DashboardView,
{
    pub fn new(client: ApiClient<T, S>, view: V, interval: Duration) -> Self {
        Self {
            client,
            view,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Token to cancel from the view's cleanup hook
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    fn write(&self, apply: impl FnOnce(&mut DashboardState)) {
        if !self.is_active() {
            return;
        }
        let mut apply = Some(apply);
        self.view.update(&mut |state| {
            if let Some(apply) = apply.take() {
                apply(state);
            }
        });
    }

    /// Poll until torn down or signed out.
    ///
    /// Without a session the view shows the signed-out banner and no request
    /// is made. `sleep` supplies the platform timer.
    pub async fn run<F, Fut>(&self, sleep: F)
    where
        F: Fn(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        if !self.client.session().is_authenticated() {
            log::info!("No vendor session, order polling not started");
            self.write(DashboardState::sign_out);
            return;
        }
        log::info!("Order polling started, every {:?}", self.interval);
        loop {
            if self.fetch_orders().await == PollFlow::Stop {
                break;
            }
            let tick = sleep(self.interval);
            let cancelled = self.cancel.cancelled();
            pin_mut!(tick, cancelled);
            if let Either::Right(_) = select(tick, cancelled).await {
                break;
            }
        }
        log::info!("Order polling stopped");
    }

    /// Fetch the order list once and apply the outcome
    pub async fn fetch_orders(&self) -> PollFlow {
        if !self.is_active() {
            return PollFlow::Stop;
        }
        let result = vendor::list_orders(&self.client).await;
        if !self.is_active() {
            return PollFlow::Stop;
        }
        match result {
            Ok(orders) => {
                log::debug!("Fetched {} orders", orders.len());
                self.write(|state| state.replace_orders(orders));
                PollFlow::Continue
            }
            Err(ApiError::Unauthorized) => {
                self.sign_out();
                PollFlow::Stop
            }
            Err(err @ ApiError::Http { .. }) => {
                log::warn!("Order fetch failed: {}", err);
                self.write(|state| state.fail(FETCH_FAILED));
                PollFlow::Continue
            }
            Err(err) => {
                log::warn!("Order fetch failed: {}", err);
                self.write(|state| state.fail(err.user_message(LOAD_FAILED)));
                PollFlow::Continue
            }
        }
    }

    /// Request a status change for one order.
    ///
    /// Only that order's activity entry is touched; success refetches the
    /// whole list instead of patching it locally.
    pub async fn update_status(&self, order_id: &str, target: OrderStatus) {
        self.write(|state| state.begin_transition(order_id));
        match vendor::update_order_status(&self.client, order_id, target).await {
            Ok(()) => {
                self.fetch_orders().await;
            }
            Err(ApiError::Unauthorized) => self.sign_out(),
            Err(ApiError::TransitionRejected) => {
                log::info!("Backend refused {} for order {}", target.as_str(), order_id);
                self.write(|state| state.reject_transition(order_id));
            }
            Err(err @ ApiError::Http { .. }) => {
                log::warn!("Status update failed: {}", err);
                self.write(|state| state.fail(STATUS_FAILED));
            }
            Err(err) => {
                log::warn!("Status update failed: {}", err);
                self.write(|state| state.fail(err.user_message(STATUS_FAILED)));
            }
        }
        self.write(|state| state.end_transition(order_id));
    }

    fn sign_out(&self) {
        self.write(DashboardState::sign_out);
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpMethod, UnauthorizedGate};
    use crate::dashboard::TRANSITION_REJECTED;
    use crate::session::MemoryStorage;
    use crate::testing::{counting_gate, orders_json, vendor_client, FakeTransport};
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    const INTERVAL: Duration = Duration::from_millis(5000);

    type Controller = OrdersController<FakeTransport, MemoryStorage, Arc<Mutex<DashboardState>>>;

    struct Harness {
        transport: FakeTransport,
        storage: MemoryStorage,
        state: Arc<Mutex<DashboardState>>,
        controller: Controller,
    }

    impl Harness {
        fn new(gate: UnauthorizedGate, signed_in: bool) -> Self {
            let transport = FakeTransport::new();
            let storage = MemoryStorage::new();
            let client = vendor_client(&transport, &storage, gate);
            if signed_in {
                client.establish_session(Some("tok")).unwrap();
            }
            let state = Arc::new(Mutex::new(DashboardState::default()));
            let controller = OrdersController::new(client, Arc::clone(&state), INTERVAL);
            Self { transport, storage, state, controller }
        }

        fn snapshot(&self) -> DashboardState {
            self.state.lock().unwrap().clone()
        }

        fn order_ids(&self) -> Vec<String> {
            self.snapshot().orders.into_iter().map(|o| o.id).collect()
        }
    }

    #[tokio::test]
    async fn test_no_session_shows_banner_without_polling() {
        let h = Harness::new(UnauthorizedGate::silent(), false);

        h.controller.run(tokio::time::sleep).await;

        assert!(!h.snapshot().authenticated);
        assert!(h.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_fully_replaced_in_server_order() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 200, "[]");
        h.transport.respond(
            HttpMethod::Get,
            "/vendor/orders",
            200,
            &orders_json(&[("b", "PREPARING"), ("a", "RECEIVED")]),
        );

        h.controller.fetch_orders().await;
        assert!(h.snapshot().is_empty());

        h.controller.fetch_orders().await;
        assert_eq!(h.order_ids(), vec!["b", "a"]);
        assert!(!h.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_refetch_carries_changes_beyond_id_and_status() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(
            HttpMethod::Get,
            "/vendor/orders",
            200,
            r#"[{"id":"a","createdAt":"2024-05-01T12:30:00Z","items":[],"note":null,"total":12.5,"status":"RECEIVED"}]"#,
        );
        h.transport.respond(
            HttpMethod::Get,
            "/vendor/orders",
            200,
            r#"[{"id":"a","createdAt":"2024-05-01T12:30:00Z","items":[{"name":"Friet","qty":2}],"note":"Zonder mayo","total":17.0,"status":"RECEIVED"}]"#,
        );

        h.controller.fetch_orders().await;
        h.controller.fetch_orders().await;

        let orders = h.snapshot().orders;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, Some(17.0));
        assert_eq!(orders[0].note.as_deref(), Some("Zonder mayo"));
        assert_eq!(orders[0].items.len(), 1);
    }

    #[tokio::test]
    async fn test_zone_less_timestamp_does_not_drop_the_list() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(
            HttpMethod::Get,
            "/vendor/orders",
            200,
            r#"[
                {"id":"a","createdAt":"2024-05-01T12:30:00Z","items":[],"status":"RECEIVED"},
                {"id":"b","createdAt":"2024-05-01T12:31:00","items":[],"status":"PREPARING"}
            ]"#,
        );

        h.controller.fetch_orders().await;

        assert_eq!(h.order_ids(), vec!["a", "b"]);
        assert!(h.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_snapshot() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 200, &orders_json(&[("a", "RECEIVED")]));
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 500, "boom");
        h.transport.fail(HttpMethod::Get, "/vendor/orders", "Failed to fetch");

        h.controller.fetch_orders().await;
        assert_eq!(h.controller.fetch_orders().await, PollFlow::Continue);
        assert_eq!(h.snapshot().error.as_deref(), Some("Kan orders niet ophalen"));
        assert_eq!(h.order_ids(), vec!["a"]);

        h.controller.fetch_orders().await;
        assert_eq!(h.snapshot().error.as_deref(), Some("Failed to fetch"));
        assert_eq!(h.order_ids(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_transition_sends_patch_and_refetches() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(HttpMethod::Patch, "/vendor/orders/a/status", 200, "{}");
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 200, &orders_json(&[("a", "ON_THE_WAY")]));

        h.controller.update_status("a", OrderStatus::OnTheWay).await;

        let patches: Vec<_> = h
            .transport
            .calls()
            .into_iter()
            .filter(|c| c.method == HttpMethod::Patch)
            .collect();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].body, Some(serde_json::json!({ "status": "ON_THE_WAY" })));
        assert_eq!(h.transport.calls_to(HttpMethod::Get, "/vendor/orders"), 1);
        let state = h.snapshot();
        assert_eq!(state.orders[0].status, OrderStatus::OnTheWay);
        assert!(state.activity("a").is_none());
    }

    /// View that records the loading flag of order "a" after every write
    #[derive(Clone, Default)]
    struct RecordingView {
        state: Arc<Mutex<DashboardState>>,
        loading: Arc<Mutex<Vec<bool>>>,
    }

    impl DashboardView for RecordingView {
        fn update(&self, apply: &mut dyn FnMut(&mut DashboardState)) {
            let mut state = self.state.lock().unwrap();
            apply(&mut *state);
            self.loading.lock().unwrap().push(state.is_loading("a"));
        }
    }

    #[tokio::test]
    async fn test_loading_spans_the_request() {
        let transport = FakeTransport::new();
        let storage = MemoryStorage::new();
        let client = vendor_client(&transport, &storage, UnauthorizedGate::silent());
        client.establish_session(Some("tok")).unwrap();
        transport.respond(HttpMethod::Patch, "/vendor/orders/a/status", 500, "");
        let view = RecordingView::default();
        let controller = OrdersController::new(client, view.clone(), INTERVAL);

        controller.update_status("a", OrderStatus::Preparing).await;

        assert_eq!(*view.loading.lock().unwrap(), vec![true, true, false]);
        let state = view.state.lock().unwrap();
        assert_eq!(state.error.as_deref(), Some("Status bijwerken mislukt"));
        assert!(state.activity("a").is_none());
    }

    #[tokio::test]
    async fn test_rejected_transition_is_scoped_to_one_order() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(
            HttpMethod::Get,
            "/vendor/orders",
            200,
            &orders_json(&[("a", "PREPARING"), ("b", "RECEIVED")]),
        );
        h.transport.respond(HttpMethod::Patch, "/vendor/orders/a/status", 409, "");
        h.controller.fetch_orders().await;

        h.controller.update_status("a", OrderStatus::Delivered).await;

        let state = h.snapshot();
        assert_eq!(state.message("a"), Some(TRANSITION_REJECTED));
        assert!(!state.is_loading("a"));
        assert!(state.activity("b").is_none());
        assert!(state.error.is_none());
        assert_eq!(state.orders[0].status, OrderStatus::Preparing);
        assert_eq!(h.transport.calls_to(HttpMethod::Get, "/vendor/orders"), 1);
    }

    #[tokio::test]
    async fn test_bad_request_transition_is_rejected_too() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 200, &orders_json(&[("a", "RECEIVED")]));
        h.transport.respond(HttpMethod::Patch, "/vendor/orders/a/status", 400, "");
        h.controller.fetch_orders().await;

        h.controller.update_status("a", OrderStatus::Delivered).await;

        let state = h.snapshot();
        assert_eq!(state.message("a"), Some(TRANSITION_REJECTED));
        assert!(!state.is_loading("a"));
        assert!(state.error.is_none());
        assert_eq!(state.orders[0].status, OrderStatus::Received);
    }

    #[tokio::test]
    async fn test_rejected_session_reported_after_outside_login() {
        let (gate, count) = counting_gate();
        let h = Harness::new(gate, true);
        h.transport.respond_always(HttpMethod::Get, "/vendor/orders", 401, "");
        h.controller.fetch_orders().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        h.storage.set("vendor_session", "1").unwrap();
        h.storage.set("vendor_token", "other-tab").unwrap();
        let state = Arc::new(Mutex::new(DashboardState::default()));
        let remounted = OrdersController::new(h.controller.client.clone(), Arc::clone(&state), INTERVAL);

        assert_eq!(remounted.fetch_orders().await, PollFlow::Stop);

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!state.lock().unwrap().authenticated);
    }

    #[tokio::test]
    async fn test_unauthorized_transition_signs_out() {
        let (gate, count) = counting_gate();
        let h = Harness::new(gate, true);
        h.transport.respond(HttpMethod::Patch, "/vendor/orders/a/status", 401, "");

        h.controller.update_status("a", OrderStatus::Received).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!h.storage.contains("vendor_session"));
        assert!(!h.storage.contains("vendor_token"));
        assert!(!h.snapshot().authenticated);
        assert!(!h.controller.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_every_interval_until_teardown() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond_always(HttpMethod::Get, "/vendor/orders", 200, "[]");
        let local = tokio::task::LocalSet::new();

        local
            .run_until(async {
                let controller = h.controller.clone();
                let handle = tokio::task::spawn_local(async move {
                    controller.run(tokio::time::sleep).await;
                });

                tokio::time::sleep(Duration::from_millis(1)).await;
                assert_eq!(h.transport.calls_to(HttpMethod::Get, "/vendor/orders"), 1);

                tokio::time::sleep(INTERVAL).await;
                assert_eq!(h.transport.calls_to(HttpMethod::Get, "/vendor/orders"), 2);

                h.controller.teardown();
                tokio::time::sleep(INTERVAL * 3).await;
                assert_eq!(h.transport.calls_to(HttpMethod::Get, "/vendor/orders"), 2);
                handle.await.unwrap();
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_survives_errors_and_stops_on_401() {
        let (gate, count) = counting_gate();
        let h = Harness::new(gate, true);
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 500, "");
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 200, "[]");
        h.transport.respond_always(HttpMethod::Get, "/vendor/orders", 401, "");

        h.controller.run(tokio::time::sleep).await;

        assert_eq!(h.transport.calls_to(HttpMethod::Get, "/vendor/orders"), 3);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!h.snapshot().authenticated);
    }

    #[tokio::test]
    async fn test_no_writes_after_teardown() {
        let h = Harness::new(UnauthorizedGate::silent(), true);
        h.transport.respond(HttpMethod::Get, "/vendor/orders", 200, &orders_json(&[("a", "RECEIVED")]));
        h.controller.teardown();

        assert_eq!(h.controller.fetch_orders().await, PollFlow::Stop);
        h.controller.update_status("a", OrderStatus::Preparing).await;

        assert!(h.snapshot().orders.is_empty());
        assert!(h.snapshot().activity("a").is_none());
    }
}
