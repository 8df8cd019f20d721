//! View Model
//!
//! Pure state behind the todo page: the form's ephemeral state, the intents it
//! produces and what screen a query state renders as.

use crate::models::{NewTodo, Todo};
use crate::query::QueryState;

pub const HEADING: &str = "TODOS";
pub const LOADING_MESSAGE: &str = "It is Loading...";
pub const ERROR_MESSAGE: &str = "There is an error";
pub const INPUT_PLACEHOLDER: &str = "New Todo";

/// What a submit asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitIntent {
    Create(NewTodo),
    Update(Todo),
}

/// Input text plus the todo selected for editing.
///
/// The selection is a by-value copy taken when editing began, not a live view of the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    input: String,
    editing: Option<Todo>,
}

impl TodoForm {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn editing(&self) -> Option<&Todo> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Select `todo` for editing and load its title into the input
    pub fn begin_edit(&mut self, todo: &Todo) {
        self.input = todo.title.clone();
        self.editing = Some(todo.clone());
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Todo"
        } else {
            "Add Todo"
        }
    }

    /// Intent for the current input, or `None` if it is blank after trimming
    pub fn submit_intent(&self, user_id: u32) -> Option<SubmitIntent> {
        let title = self.input.trim();
        if title.is_empty() {
            return None;
        }
        let intent = match &self.editing {
            Some(todo) => SubmitIntent::Update(todo.with_title(title)),
            None => SubmitIntent::Create(NewTodo::new(user_id, title)),
        };
        Some(intent)
    }

    /// Reset after `intent` succeeded: the input is cleared, and an update
    /// also ends the edit selection if it still points at the same todo.
    pub fn finish(&mut self, intent: &SubmitIntent) {
        self.input.clear();
        if let SubmitIntent::Update(updated) = intent {
            if self.editing.as_ref().is_some_and(|todo| todo.id == updated.id) {
                self.editing = None;
            }
        }
    }
}

/// Rendered shape of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Failed,
    /// At most `limit` todos, in cache order
    List(Vec<Todo>),
}

impl Screen {
    pub fn from_state(state: &QueryState<Vec<Todo>>, limit: usize) -> Self {
        match state {
            QueryState::Loading => Self::Loading,
            QueryState::Error(_) => Self::Failed,
            QueryState::Success(todos) => Self::List(todos.iter().take(limit).cloned().collect()),
        }
    }

    /// Static message for the non-list screens
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_MESSAGE),
            Self::Failed => Some(ERROR_MESSAGE),
            Self::List(_) => None,
        }
    }
}
