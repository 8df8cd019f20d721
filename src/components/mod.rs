//! UI Components
//!
//! Leptos components for the todo page.

mod status_view;
mod todo_entry_form;
mod todo_list;
mod todo_row;

pub use status_view::StatusView;
pub use todo_entry_form::TodoEntryForm;
pub use todo_list::TodoList;
pub use todo_row::TodoRow;
