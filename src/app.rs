//! Todo Client App
//!
//! Builds the session, mirrors its query into the store and picks the screen.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_sync::view::{ERROR_MESSAGE, HEADING};
use todo_sync::{ClientConfig, TodoSession};
use tracing::error;

use crate::components::{StatusView, TodoEntryForm, TodoList};
use crate::context::AppContext;
use crate::store::{store_screen, store_set_query, AppState};

#[component]
pub fn App() -> impl IntoView {
    let session = match TodoSession::connect(ClientConfig::from_build_env()) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "invalid client configuration");
            return view! { <StatusView message=ERROR_MESSAGE /> }.into_any();
        }
    };

    let store = Store::new(AppState::default());
    store_set_query(&store, session.state());
    session
        .query()
        .subscribe(move |state| store_set_query(&store, state.clone()));

    let ctx = AppContext::new(session, store);
    provide_context(ctx);
    let limit = ctx.display_limit();

    // Fetch on mount
    Effect::new(move |_| ctx.load());

    // Only a change of screen kind swaps the page; list updates stay inside TodoList
    let message = Memo::new(move |_| store_screen(&ctx.store, limit).message());

    view! {
        <Show
            when=move || message.get().is_none()
            fallback=move || view! { <StatusView message=message.get().unwrap_or_default() /> }
        >
            <main class="todo-page">
                <h1 class="title">{HEADING}</h1>
                <TodoList />
                <TodoEntryForm />
            </main>
        </Show>
    }
    .into_any()
}
