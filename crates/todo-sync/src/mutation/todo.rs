//! Todo Mutations
//!
//! Create / update / delete strategies and the list patches they apply.

use async_trait::async_trait;

use super::MutationStrategy;
use crate::api::TodoApi;
use crate::error::ApiResult;
use crate::models::{NewTodo, Todo, TodoId};

// ========================
// Patches
// ========================

/// Append a created todo; establishes a one-element list when nothing is cached.
///
/// A cached todo with the same id is dropped first so ids stay unique.
pub fn append_todo(cached: Option<Vec<Todo>>, created: &Todo) -> Vec<Todo> {
    let mut todos = cached.unwrap_or_default();
    todos.retain(|todo| todo.id != created.id);
    todos.push(created.clone());
    todos
}

/// Replace the todo with a matching id in place.
/// `None` (no-op) if nothing is cached or the id is unknown.
pub fn replace_todo(cached: Option<Vec<Todo>>, updated: &Todo) -> Option<Vec<Todo>> {
    let mut todos = cached?;
    let slot = todos.iter_mut().find(|todo| todo.id == updated.id)?;
    *slot = updated.clone();
    Some(todos)
}

/// Remove the todo with a matching id.
/// `None` (no-op) if nothing is cached or the id is unknown.
pub fn remove_todo(cached: Option<Vec<Todo>>, id: TodoId) -> Option<Vec<Todo>> {
    let mut todos = cached?;
    let before = todos.len();
    todos.retain(|todo| todo.id != id);
    (todos.len() != before).then_some(todos)
}

// ========================
// Strategies
// ========================

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateTodo;

#[async_trait(?Send)]
impl MutationStrategy for CreateTodo {
    type Input = NewTodo;
    type Output = Todo;
    const NAME: &'static str = "create";

    async fn call(&self, api: &dyn TodoApi, input: NewTodo) -> ApiResult<Todo> {
        api.add_todo(&input).await
    }

    fn patch(&self, created: &Todo, cached: Option<Vec<Todo>>) -> Option<Vec<Todo>> {
        Some(append_todo(cached, created))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateTodo;

#[async_trait(?Send)]
impl MutationStrategy for UpdateTodo {
    type Input = Todo;
    type Output = Todo;
    const NAME: &'static str = "update";

    async fn call(&self, api: &dyn TodoApi, input: Todo) -> ApiResult<Todo> {
        api.update_todo(&input).await
    }

    fn patch(&self, updated: &Todo, cached: Option<Vec<Todo>>) -> Option<Vec<Todo>> {
        replace_todo(cached, updated)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteTodo;

#[async_trait(?Send)]
impl MutationStrategy for DeleteTodo {
    type Input = TodoId;
    type Output = TodoId;
    const NAME: &'static str = "delete";

    async fn call(&self, api: &dyn TodoApi, id: TodoId) -> ApiResult<TodoId> {
        api.delete_todo(id).await
    }

    fn patch(&self, id: &TodoId, cached: Option<Vec<Todo>>) -> Option<Vec<Todo>> {
        remove_todo(cached, *id)
    }
}
