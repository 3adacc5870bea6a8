//! Stateless HTTP request builder and response parser for the to-do backend.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! A `Transport` executes the actual round-trip in between.
//!
//! Any 2xx status counts as success. Update and delete responses carry no
//! body the component depends on, so their parsers only check the status.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTask, Filter, Task, TaskId, UpdateTask};

/// Bytes escaped when a task id is placed in a single URL path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Synchronous, stateless client for the to-do backend.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_tasks(&self, filter: Filter) -> HttpRequest {
        let path = match filter.completed() {
            Some(completed) => format!("{}/todos?completed={completed}", self.base_url),
            None => format!("{}/todos", self.base_url),
        };
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_task(&self, input: &CreateTask) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos/", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update_task(&self, id: &TaskId, input: &UpdateTask) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.task_url(id),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_task(&self, id: &TaskId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.task_url(id),
            headers: json_headers(),
            body: None,
        }
    }

    fn task_url(&self, id: &TaskId) -> String {
        let segment = id.to_string();
        format!("{}/todos/{}", self.base_url, utf8_percent_encode(&segment, SEGMENT_ENCODE_SET))
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
