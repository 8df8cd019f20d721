//! Global Application State Store
//!
//! Uses Leptos reactive_stores for field-level reactivity: the query state
//! mirrored from the session, and the form's ephemeral state.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_sync::{QueryState, Screen, SubmitIntent, Todo, TodoForm};

#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Latest state published by the todo query
    pub query: QueryState<Vec<Todo>>,
    /// Input text and edit selection
    pub form: TodoForm,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

pub fn store_set_query(store: &AppStore, state: QueryState<Vec<Todo>>) {
    *store.query().write() = state;
}

/// What the page should render, keeping at most `limit` rows
pub fn store_screen(store: &AppStore, limit: usize) -> Screen {
    Screen::from_state(&*store.query().read(), limit)
}

/// Rows the list shows; empty unless the query has data to show
pub fn store_rows(store: &AppStore, limit: usize) -> Vec<Todo> {
    match store_screen(store, limit) {
        Screen::List(todos) => todos,
        _ => Vec::new(),
    }
}

pub fn store_input(store: &AppStore) -> String {
    store.form().read().input().to_string()
}

pub fn store_set_input(store: &AppStore, input: String) {
    store.form().write().set_input(input);
}

pub fn store_submit_label(store: &AppStore) -> &'static str {
    store.form().read().submit_label()
}

pub fn store_begin_edit(store: &AppStore, todo: &Todo) {
    store.form().write().begin_edit(todo);
}

pub fn store_submit_intent(store: &AppStore, user_id: u32) -> Option<SubmitIntent> {
    store.form().read_untracked().submit_intent(user_id)
}

/// Reset the form after `intent` went through
pub fn store_finish_submit(store: &AppStore, intent: &SubmitIntent) {
    store.form().write().finish(intent);
}
