//! Application Context
//!
//! The todo session and the UI store, provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_sync::{Todo, TodoId, TodoSession};
use tracing::debug;

use crate::store::{store_begin_edit, store_finish_submit, store_submit_intent, AppStore};

#[derive(Clone, Copy)]
pub struct AppContext {
    /// The session is `Rc`-based, so it lives in local (non-`Send`) storage
    session: StoredValue<TodoSession, LocalStorage>,
    pub store: AppStore,
}

impl AppContext {
    pub fn new(session: TodoSession, store: AppStore) -> Self {
        Self {
            session: StoredValue::new_local(session),
            store,
        }
    }

    pub fn session(&self) -> TodoSession {
        self.session.get_value()
    }

    pub fn display_limit(&self) -> usize {
        self.session.with_value(|s| s.config().display_limit)
    }

    /// Fetch the list; the outcome reaches the store through the query subscription
    pub fn load(&self) {
        let session = self.session();
        spawn_local(async move {
            let _ = session.load().await;
        });
    }

    /// Create or update from the form. The form is reset only if the call succeeds.
    pub fn submit(&self) {
        let session = self.session();
        let Some(intent) = store_submit_intent(&self.store, session.config().user_id) else {
            return;
        };
        let store = self.store;
        spawn_local(async move {
            if session.dispatch(intent.clone()).await.is_ok() {
                store_finish_submit(&store, &intent);
            }
        });
    }

    pub fn begin_edit(&self, todo: &Todo) {
        debug!(id = todo.id, "editing todo");
        store_begin_edit(&self.store, todo);
    }

    /// Delete right away, no confirmation
    pub fn delete(&self, id: TodoId) {
        let session = self.session();
        spawn_local(async move {
            // failures are logged by the mutation and leave the list as it was
            let _ = session.delete(id).await;
        });
    }
}
