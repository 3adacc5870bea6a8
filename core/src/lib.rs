//! Core of the to-do list component.
//!
//! # Overview
//! `ToDoList` fetches tasks from a REST backend, keeps them in local state,
//! renders them into a framework-neutral `View`, and relays user edits
//! (create, update, delete, filter) back to the backend.
//!
//! # Design
//! - `TodoClient` is stateless: `build_*` produces plain-data requests and
//!   `parse_*` interprets responses, so the I/O boundary is explicit.
//! - A `Transport` executes the round-trip; `ReqwestTransport` is the
//!   production one, tests plug in an in-memory backend.
//! - Local state is a `TaskList` keyed by task id inside a `ListState`
//!   machine (`Uninitialized` → `Loading` → `Loaded`).
//! - Edits are optimistic and pushed through a per-task `Debouncer`.
//! - Failures are returned to the caller and surfaced as a notice in the
//!   rendered view.

pub mod client;
pub mod component;
pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use component::{ToDoList, SUBMIT_KEY};
pub use config::ClientConfig;
pub use debounce::Debouncer;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{ListState, TaskList};
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTask, Filter, Task, TaskChange, TaskId, UpdateTask};
pub use view::{Body, FilterButton, InputView, ItemView, View};
