//! Todo List Component

use leptos::prelude::*;

use crate::components::TodoRow;
use crate::context::AppContext;
use crate::store::store_rows;

/// Rows for the first `display_limit` cached todos, in cache order
#[component]
pub fn TodoList() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let limit = ctx.display_limit();

    view! {
        <div class="todo-list">
            {move || {
                store_rows(&ctx.store, limit)
                    .into_iter()
                    .map(|todo| view! { <TodoRow todo=todo /> })
                    .collect_view()
            }}
        </div>
    }
}
