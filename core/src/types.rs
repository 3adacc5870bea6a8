//! Domain DTOs for the to-do backend.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined independently
//! of the mock-server crate. Integration tests catch any schema drift between
//! the two crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned task identity.
///
/// Backends differ in how they mint ids: auto-increment integers or opaque
/// strings such as UUIDs. Both shapes deserialize into this type and render
/// the same way they arrived when placed in a URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Int(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(n) => write!(f, "{n}"),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        TaskId::Int(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

/// A single to-do item returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
}

impl Task {
    /// Return a copy of this task with `change` applied.
    pub fn with_change(&self, change: &TaskChange) -> Task {
        let mut next = self.clone();
        match change {
            TaskChange::Name(name) => next.name.clone_from(name),
            TaskChange::Completed(completed) => next.completed = *completed,
        }
        next
    }
}

/// Request payload for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

impl CreateTask {
    /// A new, not yet completed task.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
        }
    }
}

/// Request payload for updating an existing task. The backend replaces both
/// fields, so both are always sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTask {
    pub name: String,
    pub completed: bool,
}

impl From<&Task> for UpdateTask {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            completed: task.completed,
        }
    }
}

/// A single-field edit forwarded by an item view: either the text box or the
/// checkbox changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Name(String),
    Completed(bool),
}

/// Completion filter applied to the list fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// No `completed` parameter: every task.
    #[default]
    All,
    /// `completed=false`.
    Active,
    /// `completed=true`.
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Value of the `completed` query parameter, if any.
    pub fn completed(self) -> Option<bool> {
        match self {
            Filter::All => None,
            Filter::Active => Some(false),
            Filter::Completed => Some(true),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}
