use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

impl Task {
    pub fn new(title: String, description: String, due_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            due_date,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Share of completed tasks rounded to the nearest percent. A project
    /// without tasks reports 0. Always computed from the live task list.
    pub fn progress(&self) -> u32 {
        if self.tasks.is_empty() {
            return 0;
        }
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        (completed as f64 * 100.0 / self.tasks.len() as f64).round() as u32
    }
}

/// Identity half of a session, persisted separately from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Authenticated identity plus bearer credential. Either fully present or
/// not held at all; there is no partial session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserInfo,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
}

impl CreateProjectRequest {
    /// Rejects a title that is empty after trimming, so the mutation is
    /// never attempted against any backend.
    pub fn new(title: &str, description: &str) -> Result<Self, ApiError> {
        Ok(Self {
            title: required_title(title, "Project title is required")?,
            description: description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: String,
    pub description: String,
}

impl UpdateProjectRequest {
    pub fn new(title: &str, description: &str) -> Result<Self, ApiError> {
        Ok(Self {
            title: required_title(title, "Project title is required")?,
            description: description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate", default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

impl CreateTaskRequest {
    pub fn new(title: &str, description: &str, due_date: Option<NaiveDate>) -> Result<Self, ApiError> {
        Ok(Self {
            title: required_title(title, "Task title is required")?,
            description: description.trim().to_string(),
            due_date,
            completed: false,
        })
    }
}

/// Full task replacement; completion toggling is an update with
/// `completed` inverted rather than a dedicated endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate", default)]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

impl UpdateTaskRequest {
    pub fn new(
        title: &str,
        description: &str,
        due_date: Option<NaiveDate>,
        completed: bool,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            title: required_title(title, "Task title is required")?,
            description: description.trim().to_string(),
            due_date,
            completed,
        })
    }

    pub fn toggled(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            completed: !task.completed,
        }
    }
}

fn required_title(title: &str, message: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(title.to_string())
}
