//! Todo Row Component
//!
//! One todo title with Edit and Delete buttons.

use leptos::prelude::*;
use todo_sync::Todo;

use crate::context::AppContext;

#[component]
pub fn TodoRow(todo: Todo) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let id = todo.id;
    let title = todo.title.clone();

    view! {
        <div class="todo-row">
            <h2 class="todo-title">{title}</h2>
            <button
                class="edit-btn"
                on:click=move |_| ctx.begin_edit(&todo)
            >
                "Edit"
            </button>
            <button
                class="delete-btn"
                on:click=move |_| ctx.delete(id)
            >
                "Delete"
            </button>
        </div>
    }
}
