//! Todo Entry Form Component
//!
//! Single input shared by add and edit; the button switches to
//! "Update Todo" while a row is selected for editing.

use leptos::prelude::*;
use todo_sync::view::INPUT_PLACEHOLDER;

use crate::context::AppContext;
use crate::store::{store_input, store_set_input, store_submit_label};

#[component]
pub fn TodoEntryForm() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = ctx.store;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.submit();
    };

    view! {
        <form class="todo-form" on:submit=on_submit>
            <input
                type="text"
                class="todo-input"
                placeholder=INPUT_PLACEHOLDER
                prop:value=move || store_input(&store)
                on:input=move |ev| store_set_input(&store, event_target_value(&ev))
            />
            <button type="submit" class="submit-btn">
                {move || store_submit_label(&store)}
            </button>
        </form>
    }
}
