//! Order Dashboard State
//!
//! The in-memory snapshot behind the orders page plus per-order activity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::Order;

pub const TRANSITION_REJECTED: &str = "Statusoverschakeling niet toegestaan";

/// Transient state of one order's status buttons.
///
/// An order only has an entry while a request is in flight or while its last
/// transition error is still shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemActivity {
    pub loading: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    /// Last successfully fetched list, in server order
    pub orders: Vec<Order>,
    /// Page-level banner
    pub error: Option<String>,
    pub authenticated: bool,
    activity: HashMap<String, ItemActivity>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            orders: Vec::new(),
            error: None,
            authenticated: true,
            activity: HashMap::new(),
        }
    }
}

impl DashboardState {
    /// Replace the snapshot wholesale after a successful fetch
    pub fn replace_orders(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.error = None;
        self.authenticated = true;
    }

    /// Show a banner; the previous snapshot stays visible
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn sign_out(&mut self) {
        self.orders.clear();
        self.activity.clear();
        self.authenticated = false;
    }

    pub fn begin_transition(&mut self, order_id: &str) {
        self.error = None;
        self.activity.insert(
            order_id.to_string(),
            ItemActivity {
                loading: true,
                message: None,
            },
        );
    }

    pub fn reject_transition(&mut self, order_id: &str) {
        self.activity.entry(order_id.to_string()).or_default().message =
            Some(TRANSITION_REJECTED.to_string());
    }

    pub fn end_transition(&mut self, order_id: &str) {
        let Some(activity) = self.activity.get_mut(order_id) else {
            return;
        };
        activity.loading = false;
        if activity.message.is_none() {
            self.activity.remove(order_id);
        }
    }

    pub fn activity(&self, order_id: &str) -> Option<&ItemActivity> {
        self.activity.get(order_id)
    }

    pub fn is_loading(&self, order_id: &str) -> bool {
        self.activity(order_id).is_some_and(|a| a.loading)
    }

    pub fn message(&self, order_id: &str) -> Option<&str> {
        self.activity(order_id).and_then(|a| a.message.as_deref())
    }

    /// "No orders" placeholder applies
    pub fn is_empty(&self) -> bool {
        self.authenticated && self.orders.is_empty()
    }
}

/// Where the controller writes dashboard changes (a reactive signal in the app)
pub trait DashboardView {
    fn update(&self, apply: &mut dyn FnMut(&mut DashboardState));
}

impl DashboardView for Arc<Mutex<DashboardState>> {
    fn update(&self, apply: &mut dyn FnMut(&mut DashboardState)) {
        let mut state = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        apply(&mut *state);
    }
}
