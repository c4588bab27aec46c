//! Menu Management Page
//!
//! Category sidebar, item list and item editor over a shared menu store.

use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;
use portal_core::menu::{self, ItemForm};
use portal_core::models::{format_euro, FormError, MenuItem};
use portal_core::{vendor, ApiError, SessionScope};
use reactive_stores::Store;
use web_sys::SubmitEvent;

use crate::components::{text_area, text_field, DeleteConfirmButton, Flash, FlashBanner};
use crate::context::{use_portal, PortalClient, PortalContext};
use crate::store::{
    store_add_category, store_remove_category, store_remove_item, store_rename_category,
    store_replace_menu, store_selected_category, store_upsert_item, use_menu_store, MenuState,
    MenuStateStoreFields, MenuStore,
};

const LOAD_FAILED: &str = "Menu ophalen mislukt";

/// Handles shared by the menu page sections
#[derive(Clone, Copy)]
struct MenuUi {
    store: MenuStore,
    client: StoredValue<PortalClient>,
    portal: StoredValue<PortalContext>,
    action_error: RwSignal<Option<String>>,
    item_form: RwSignal<ItemForm>,
    flash: Flash,
}

impl MenuUi {
    /// Still mounted; responses arriving after unmount are dropped
    fn mounted(&self) -> bool {
        !self.action_error.is_disposed()
    }

    fn client(&self) -> PortalClient {
        self.client.get_value()
    }

    fn fail(&self, err: ApiError, fallback: &str) {
        match err {
            ApiError::Unauthorized => {
                self.portal.try_with_value(|p| p.request_login(SessionScope::Vendor));
            }
            err => {
                log::warn!("{}: {}", fallback, err);
                self.action_error.try_set(Some(err.user_message(fallback)));
            }
        }
    }

    fn reject(&self, invalid: FormError) {
        self.action_error.set(Some(invalid.to_string()));
    }

    fn load(&self, loading: RwSignal<bool>, error: RwSignal<Option<String>>) {
        loading.set(true);
        error.set(None);
        let ui = *self;
        let client = self.client();
        spawn_local(async move {
            let result = vendor::list_menu(&client).await;
            if !ui.mounted() {
                return;
            }
            match result {
                Ok(categories) => store_replace_menu(&ui.store, categories),
                Err(ApiError::Unauthorized) => ui.fail(ApiError::Unauthorized, LOAD_FAILED),
                Err(ApiError::Http { .. }) => error.set(Some(LOAD_FAILED.to_string())),
                Err(err) => error.set(Some(err.user_message(LOAD_FAILED))),
            }
            loading.set(false);
        });
    }
}

#[component]
pub fn MenuPage() -> impl IntoView {
    let portal = use_portal();
    let store = Store::new(MenuState::default());
    provide_context(store);

    let ui = MenuUi {
        store,
        client: StoredValue::new(portal.vendor.clone()),
        flash: Flash::new(portal.config.flash_timeout),
        portal: StoredValue::new(portal),
        action_error: RwSignal::new(None),
        item_form: RwSignal::new(ItemForm::default()),
    };
    provide_context(ui);

    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    ui.load(loading, error);

    // Blank item form whenever another category is selected
    Effect::new(move |_| {
        let _ = store.selected().get();
        ui.item_form.set(ItemForm::default());
    });

    let count_text = move || match store.categories().read().len() {
        0 => "Geen categorieën".to_string(),
        n => format!("{} categorieën", n),
    };

    view! {
        <div class="page menu-page">
            <h2>"Menu"</h2>
            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="loading">"Menu laden…"</div> }
            >
                <p class="muted">
                    "Beheer hier je categorieën en gerechten. Alles wat je opslaat is direct zichtbaar in de klant-app."
                </p>
                <div class="muted">{count_text}</div>

                {move || error.get().map(|text| view! {
                    <div class="error">
                        {text} " "
                        <button type="button" on:click=move |_| ui.load(loading, error)>
                            "Opnieuw laden"
                        </button>
                    </div>
                })}

                <div class="menu-layout">
                    <CategorySidebar />
                    <section class="menu-content">
                        <FlashBanner flash=ui.flash />
                        {move || ui.action_error.get().map(|text| view! { <div class="error">{text}</div> })}
                        <Show
                            when=move || store.selected().read().is_some()
                            fallback=|| view! {
                                <div class="muted">
                                    "Selecteer een categorie of maak een nieuwe aan om gerechten toe te voegen."
                                </div>
                            }
                        >
                            <CategoryEditor />
                            <ItemList />
                            <ItemEditor />
                        </Show>
                    </section>
                </div>
            </Show>
        </div>
    }
}

// ========================
// Categories
// ========================

#[component]
fn CategorySidebar() -> impl IntoView {
    let ui = expect_context::<MenuUi>();
    let store = use_menu_store();
    let new_name = RwSignal::new(String::new());
    let creating = RwSignal::new(false);

    let on_create = move |ev: SubmitEvent| {
        ev.prevent_default();
        if creating.get_untracked() {
            return;
        }
        ui.action_error.set(None);
        let name = match menu::validate_new_category(&new_name.get_untracked()) {
            Ok(name) => name,
            Err(invalid) => return ui.reject(invalid),
        };
        creating.set(true);

        let client = ui.client();
        spawn_local(async move {
            match vendor::create_category(&client, &name).await {
                Ok(category) if ui.mounted() => {
                    store_add_category(&store, category);
                    new_name.set(String::new());
                    ui.flash.show("Categorie opgeslagen");
                }
                Ok(_) => {}
                Err(err) => ui.fail(err, "Categorie opslaan mislukt"),
            }
            creating.try_set(false);
        });
    };

    view! {
        <aside class="menu-sidebar">
            <div class="sidebar-head">
                <strong>"Categorieën"</strong>
                <span class="badge">{move || format!("{}x", store.categories().read().len())}</span>
            </div>
            <div class="category-list">
                <For
                    each=move || store.categories().get()
                    key=|cat| (cat.id.clone(), cat.name.clone(), cat.items.len())
                    children=move |cat| {
                        let id = StoredValue::new(cat.id.clone());
                        let is_selected = move || {
                            id.with_value(|id| store.selected().read().as_deref() == Some(id.as_str()))
                        };
                        view! {
                            <button
                                type="button"
                                class=move || if is_selected() { "category-btn active" } else { "category-btn" }
                                on:click=move |_| store.selected().set(Some(id.get_value()))
                            >
                                <div class="category-name">{cat.name.clone()}</div>
                                <div class="muted">{format!("{} gerechten", cat.items.len())}</div>
                            </button>
                        }
                    }
                />
                <Show when=move || store.categories().read().is_empty()>
                    <div class="muted">"Nog geen categorieën. Voeg de eerste toe."</div>
                </Show>
            </div>
            <form class="new-category-form" on:submit=on_create>
                <label class="field">
                    <span class="field-label">"Nieuwe categorie"</span>
                    <input
                        placeholder="Bijv. Pizza"
                        prop:value=move || new_name.get()
                        on:input=move |ev| new_name.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" class="primary-btn" disabled=move || creating.get()>
                    {move || if creating.get() { "Toevoegen…" } else { "Toevoegen" }}
                </button>
            </form>
        </aside>
    }
}

#[component]
fn CategoryEditor() -> impl IntoView {
    let ui = expect_context::<MenuUi>();
    let store = use_menu_store();
    let selected = Memo::new(move |_| store_selected_category(&store));
    let draft = RwSignal::new(String::new());
    let renaming = RwSignal::new(false);
    let deleting = RwSignal::new(false);

    // Draft follows the selected category's stored name
    Effect::new(move |_| {
        let name = selected.with(|cat| cat.as_ref().map(|c| c.name.clone()).unwrap_or_default());
        draft.set(name);
    });

    let on_rename = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(category) = selected.get_untracked() else {
            return;
        };
        if renaming.get_untracked() {
            return;
        }
        ui.action_error.set(None);
        let name = match menu::validate_rename(&draft.get_untracked(), &category.name) {
            Ok(name) => name,
            Err(invalid) => return ui.reject(invalid),
        };
        renaming.set(true);

        let client = ui.client();
        spawn_local(async move {
            match vendor::rename_category(&client, &category.id, &name).await {
                Ok(echo) if ui.mounted() => {
                    store_rename_category(&store, &category.id, &name, echo.as_ref());
                    ui.flash.show("Categorie opgeslagen");
                }
                Ok(_) => {}
                Err(err) => ui.fail(err, "Categorie bijwerken mislukt"),
            }
            renaming.try_set(false);
        });
    };

    let on_delete = Callback::new(move |_: ()| {
        let Some(category) = selected.get_untracked() else {
            return;
        };
        if deleting.get_untracked() {
            return;
        }
        ui.action_error.set(None);
        deleting.set(true);

        let client = ui.client();
        spawn_local(async move {
            match vendor::delete_category(&client, &category.id).await {
                Ok(()) if ui.mounted() => {
                    store_remove_category(&store, &category.id);
                    ui.item_form.update(|form| {
                        if form.id.is_some() {
                            *form = ItemForm::default();
                        }
                    });
                    ui.flash.show("Categorie verwijderd");
                }
                Ok(()) => {}
                Err(err) => ui.fail(err, "Categorie verwijderen mislukt"),
            }
            deleting.try_set(false);
        });
    });

    let question = Signal::derive(move || {
        let has_items = selected.with(|cat| cat.as_ref().is_some_and(|c| !c.items.is_empty()));
        if has_items {
            "Deze categorie bevat nog gerechten. Weet je zeker dat je wilt verwijderen?".to_string()
        } else {
            "Categorie verwijderen?".to_string()
        }
    });
    let delete_label = Signal::derive(move || {
        let label = if deleting.get() { "Verwijderen…" } else { "Verwijderen" };
        label.to_string()
    });

    view! {
        <form class="category-editor" on:submit=on_rename>
            <label class="field">
                <span class="field-label">"Categorienaam"</span>
                <input
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                />
            </label>
            <div class="form-actions">
                <button type="submit" class="primary-btn" disabled=move || renaming.get()>
                    {move || if renaming.get() { "Opslaan…" } else { "Categorie opslaan" }}
                </button>
                <DeleteConfirmButton
                    label=delete_label
                    question=question
                    on_confirm=on_delete
                    disabled=deleting
                />
            </div>
        </form>
    }
}

// ========================
// Items
// ========================

#[component]
fn ItemList() -> impl IntoView {
    let ui = expect_context::<MenuUi>();
    let store = use_menu_store();
    let items = Memo::new(move |_| {
        store_selected_category(&store)
            .map(|cat| cat.items)
            .unwrap_or_default()
    });
    let toggling = RwSignal::new(HashSet::<String>::new());
    let deleting = RwSignal::new(HashSet::<String>::new());

    let toggle = move |item: MenuItem| {
        let Some(category_id) = store.selected().get_untracked() else {
            return;
        };
        ui.action_error.set(None);
        toggling.update(|busy| {
            busy.insert(item.id.clone());
        });

        let client = ui.client();
        spawn_local(async move {
            match vendor::toggle_availability(&client, &item).await {
                Ok(updated) if ui.mounted() => {
                    let text = if updated.available {
                        "Gerecht zichtbaar"
                    } else {
                        "Gerecht tijdelijk verborgen"
                    };
                    store_upsert_item(&store, &category_id, updated);
                    ui.flash.show(text);
                }
                Ok(_) => {}
                Err(err) => ui.fail(err, "Status aanpassen mislukt"),
            }
            toggling.try_update(|busy| busy.remove(&item.id));
        });
    };

    let remove = move |item: MenuItem| {
        let Some(category_id) = store.selected().get_untracked() else {
            return;
        };
        ui.action_error.set(None);
        deleting.update(|busy| {
            busy.insert(item.id.clone());
        });

        let client = ui.client();
        spawn_local(async move {
            match vendor::delete_item(&client, &item.id).await {
                Ok(()) if ui.mounted() => {
                    store_remove_item(&store, &category_id, &item.id);
                    ui.item_form.update(|form| {
                        if form.id.as_deref() == Some(item.id.as_str()) {
                            *form = ItemForm::default();
                        }
                    });
                    ui.flash.show("Gerecht verwijderd");
                }
                Ok(()) => {}
                Err(err) => ui.fail(err, "Gerecht verwijderen mislukt"),
            }
            deleting.try_update(|busy| busy.remove(&item.id));
        });
    };

    let item_row = move |item: MenuItem| {
        let stored = StoredValue::new(item.clone());
        let id = StoredValue::new(item.id.clone());
        let is_toggling = move || id.with_value(|id| toggling.with(|busy| busy.contains(id)));
        let is_deleting = Signal::derive(move || id.with_value(|id| deleting.with(|busy| busy.contains(id))));
        let available = item.available;

        view! {
            <div class="item-card">
                <div class="item-main">
                    <div class="item-title">
                        <strong>{item.name.clone()}</strong>
                        <span class="price">{format_euro(item.price)}</span>
                    </div>
                    {(!item.description.is_empty())
                        .then(|| view! { <div class="muted">{item.description.clone()}</div> })}
                    {item.image_url.clone().map(|src| view! {
                        <img class="item-image" src=src alt=item.name.clone() />
                    })}
                </div>
                <div class="item-actions">
                    <label class="checkbox">
                        <input
                            type="checkbox"
                            prop:checked=available
                            disabled=is_toggling
                            on:change=move |_| toggle(stored.get_value())
                        />
                        {move || {
                            if is_toggling() {
                                "Opslaan…"
                            } else if available {
                                "Beschikbaar"
                            } else {
                                "Niet beschikbaar"
                            }
                        }}
                    </label>
                    <button
                        type="button"
                        class="secondary-btn"
                        on:click=move |_| ui.item_form.set(ItemForm::from_item(&stored.get_value()))
                    >
                        "Bewerken"
                    </button>
                    <DeleteConfirmButton
                        label=Signal::derive(move || {
                            let label = if is_deleting.get() { "Verwijderen…" } else { "Verwijderen" };
                            label.to_string()
                        })
                        question=format!("Gerecht “{}” verwijderen?", item.name)
                        on_confirm=Callback::new(move |_: ()| remove(stored.get_value()))
                        disabled=is_deleting
                    />
                </div>
            </div>
        }
    };

    view! {
        <div class="item-list">
            <h3>"Gerechten"</h3>
            <Show
                when=move || items.with(|items| !items.is_empty())
                fallback=|| view! { <div class="muted">"Nog geen gerechten in deze categorie."</div> }
            >
                {move || items.get().into_iter().map(item_row).collect_view()}
            </Show>
        </div>
    }
}

#[component]
fn ItemEditor() -> impl IntoView {
    let ui = expect_context::<MenuUi>();
    let store = use_menu_store();
    let form = ui.item_form;
    let saving = RwSignal::new(false);
    let editing = move || form.with(|f| f.id.is_some());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(category_id) = store.selected().get_untracked() else {
            return;
        };
        if saving.get_untracked() {
            return;
        }
        ui.action_error.set(None);
        let submitted = form.get_untracked();
        let payload = match submitted.to_payload(&category_id) {
            Ok(payload) => payload,
            Err(invalid) => return ui.reject(invalid),
        };
        saving.set(true);

        let client = ui.client();
        spawn_local(async move {
            match vendor::save_item(&client, submitted.id.as_deref(), &payload).await {
                Ok(item) if ui.mounted() => {
                    store_upsert_item(&store, &category_id, item);
                    form.set(ItemForm::default());
                    ui.flash.show("Gerecht opgeslagen");
                }
                Ok(_) => {}
                Err(err) => ui.fail(err, "Gerecht opslaan mislukt"),
            }
            saving.try_set(false);
        });
    };

    view! {
        <div class="item-editor">
            <h3>{move || if editing() { "Gerecht bewerken" } else { "Nieuw gerecht" }}</h3>
            <form on:submit=on_submit>
                {text_field(
                    form,
                    "Afbeeldings-URL (optioneel)",
                    "url",
                    "https://…/foto.jpg",
                    |f| &f.image_url,
                    |f, v| f.image_url = v,
                )}
                <div class="hint">
                    "Gebruik een directe link naar een afbeelding. Uploaden in de portal wordt nog niet ondersteund."
                </div>
                {text_field(form, "Naam", "text", "Bijv. Margherita", |f| &f.name, |f, v| f.name = v)}
                {text_area(
                    form,
                    "Korte omschrijving",
                    "Ingrediënten, extra info…",
                    |f| &f.description,
                    |f, v| f.description = v,
                )}
                {text_field(form, "Prijs (in euro’s)", "text", "12.50", |f| &f.price, |f, v| f.price = v)}
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.available)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            form.update(|f| f.available = checked);
                        }
                    />
                    "Beschikbaar voor klanten"
                </label>
                <div class="form-actions">
                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        {move || {
                            if saving.get() {
                                "Opslaan…"
                            } else if editing() {
                                "Gerecht opslaan"
                            } else {
                                "Gerecht toevoegen"
                            }
                        }}
                    </button>
                    <Show when=editing>
                        <button
                            type="button"
                            class="secondary-btn"
                            on:click=move |_| form.set(ItemForm::default())
                        >
                            "Annuleren"
                        </button>
                    </Show>
                </div>
            </form>
        </div>
    }
}
