use leptos::prelude::*;

/// Full-page static message (loading placeholder or error)
#[component]
pub fn StatusView(message: &'static str) -> impl IntoView {
    view! {
        <main class="todo-page status">
            {message}
        </main>
    }
}
