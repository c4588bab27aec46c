//! Flash Message Component
//!
//! Short-lived success banner that clears itself.

use std::time::Duration;

use gloo_timers::future::sleep;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Transient message; a newer message restarts the timer
#[derive(Clone, Copy)]
pub struct Flash {
    message: RwSignal<Option<String>>,
    generation: RwSignal<u32>,
    timeout: Duration,
}

impl Flash {
    pub fn new(timeout: Duration) -> Self {
        Self {
            message: RwSignal::new(None),
            generation: RwSignal::new(0),
            timeout,
        }
    }

    pub fn show(&self, text: impl Into<String>) {
        let Some(previous) = self.generation.try_get_untracked() else {
            return;
        };
        let generation = previous.wrapping_add(1);
        self.generation.set(generation);
        self.message.set(Some(text.into()));

        let flash = *self;
        spawn_local(async move {
            sleep(flash.timeout).await;
            // Skipped when a newer message replaced this one or the page is gone
            if flash.generation.try_get_untracked() == Some(generation) {
                flash.message.try_set(None);
            }
        });
    }

    pub fn clear(&self) {
        self.message.set(None);
    }

    pub fn get(&self) -> Option<String> {
        self.message.get()
    }
}

#[component]
pub fn FlashBanner(flash: Flash) -> impl IntoView {
    view! {
        {move || flash.get().map(|text| view! { <div class="flash success">{text}</div> })}
    }
}
