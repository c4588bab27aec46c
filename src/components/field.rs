//! Form Field Helpers
//!
//! Labelled inputs bound to one `String` field of a form signal.

use leptos::prelude::*;

/// Text-like `<input>` bound through a getter/setter pair
pub fn text_field<F>(
    form: RwSignal<F>,
    label: &'static str,
    input_type: &'static str,
    placeholder: &'static str,
    get: fn(&F) -> &String,
    set: fn(&mut F, String),
) -> impl IntoView
where
    F: Clone + Send + Sync + 'static,
{
    view! {
        <label class="field">
            <span class="field-label">{label}</span>
            <input
                type=input_type
                placeholder=placeholder
                prop:value=move || form.with(|f| get(f).clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </label>
    }
}

pub fn text_area<F>(
    form: RwSignal<F>,
    label: &'static str,
    placeholder: &'static str,
    get: fn(&F) -> &String,
    set: fn(&mut F, String),
) -> impl IntoView
where
    F: Clone + Send + Sync + 'static,
{
    view! {
        <label class="field">
            <span class="field-label">{label}</span>
            <textarea
                placeholder=placeholder
                prop:value=move || form.with(|f| get(f).clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </label>
    }
}
