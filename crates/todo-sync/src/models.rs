//! Todo Models
//!
//! Data structures matching the remote `/todos` resource.

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a todo
pub type TodoId = u32;

/// Todo record as returned by the remote resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier, assigned by the server
    pub id: TodoId,
    /// Owning user
    pub user_id: u32,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Full copy of this todo with a replaced title
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Create payload: a todo without its server-assigned `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub user_id: u32,
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    /// New, not yet completed todo owned by `user_id`
    pub fn new(user_id: u32, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            completed: false,
        }
    }
}
