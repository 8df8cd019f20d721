//! HTTP Todo Client
//!
//! `reqwest` bindings for the REST contract:
//! `GET /todos`, `POST /todos`, `PUT /todos/{id}`, `DELETE /todos/{id}`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::TodoApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ConfigError};
use crate::models::{NewTodo, Todo, TodoId};

/// JSON-over-HTTP implementation of [`TodoApi`]
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base: Url,
}

impl HttpTodoApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: Client::new(),
            base: config.validate()?,
        })
    }

    /// Collection URL
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{id}`
    fn item_url(&self, id: TodoId) -> Url {
        let mut url = self.base.clone();
        // validate() only admits http(s) URLs, which always have path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }
}

/// Map a non-2xx status onto the error taxonomy
fn check_status(response: &Response) -> ApiResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let err = if status == StatusCode::NOT_FOUND {
        ApiError::NotFound(response.url().path().to_string())
    } else {
        ApiError::Server { status: status.as_u16() }
    };
    Err(err)
}

/// Send and reject non-2xx responses
async fn send(request: RequestBuilder) -> ApiResult<Response> {
    let response = request.send().await.map_err(ApiError::network)?;
    check_status(&response)?;
    Ok(response)
}

/// Send and decode the JSON body
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
    let response = send(request).await?;
    let body = response.text().await.map_err(ApiError::network)?;
    serde_json::from_str(&body).map_err(ApiError::decode)
}

fn log_failure<T>(op: &'static str, result: &ApiResult<T>) {
    if let Err(e) = result {
        warn!(op, error = %e, "todo request failed");
    }
}

#[async_trait(?Send)]
impl TodoApi for HttpTodoApi {
    async fn fetch_todos(&self) -> ApiResult<Vec<Todo>> {
        debug!(url = %self.base, "GET todos");
        let result: ApiResult<Vec<Todo>> = send_json(self.client.get(self.base.clone())).await;
        match &result {
            Ok(todos) => debug!(count = todos.len(), "fetched todos"),
            Err(_) => log_failure("fetch_todos", &result),
        }
        result
    }

    async fn add_todo(&self, new: &NewTodo) -> ApiResult<Todo> {
        debug!(url = %self.base, title = %new.title, "POST todo");
        let result = send_json(self.client.post(self.base.clone()).json(new)).await;
        log_failure("add_todo", &result);
        result
    }

    async fn update_todo(&self, todo: &Todo) -> ApiResult<Todo> {
        let url = self.item_url(todo.id);
        debug!(%url, id = todo.id, "PUT todo");
        let result = send_json(self.client.put(url).json(todo)).await;
        log_failure("update_todo", &result);
        result
    }

    async fn delete_todo(&self, id: TodoId) -> ApiResult<TodoId> {
        let url = self.item_url(id);
        debug!(%url, id, "DELETE todo");
        // Body is ignored (often `{}` or empty); the id is echoed from the request
        let result = send(self.client.delete(url)).await.map(|_| id);
        log_failure("delete_todo", &result);
        result
    }
}
