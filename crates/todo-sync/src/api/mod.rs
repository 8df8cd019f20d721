//! Remote Resource Client
//!
//! Abstract interface to the `/todos` REST resource plus its HTTP implementation.
//! Every operation is exactly one request/response cycle; nothing is retried.

mod http;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{NewTodo, Todo, TodoId};

pub use http::HttpTodoApi;

/// Operations against the remote todo collection
///
/// Futures are `?Send`: the client runs on a single-threaded event loop.
#[async_trait(?Send)]
pub trait TodoApi {
    /// List the collection in server order
    async fn fetch_todos(&self) -> ApiResult<Vec<Todo>>;

    /// Create a todo; the server assigns its id
    async fn add_todo(&self, new: &NewTodo) -> ApiResult<Todo>;

    /// Replace the full record keyed by `todo.id`
    async fn update_todo(&self, todo: &Todo) -> ApiResult<Todo>;

    /// Delete by id, returning the same id on success
    async fn delete_todo(&self, id: TodoId) -> ApiResult<TodoId>;
}
