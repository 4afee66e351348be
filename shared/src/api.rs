use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{
    CreateProjectRequest, CreateTaskRequest, LoginRequest, LoginResponse, Project,
    RegisterRequest, RegisterResponse, Task, UpdateProjectRequest, UpdateTaskRequest,
};

/// Authentication operations. Registration deliberately does not
/// establish a session; a separate sign-in is required afterwards.
#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;
}

/// Persistence strategy for the project collection. The remote binding
/// round-trips every mutation and returns server-assigned entities; the
/// local variant rewrites the whole serialized collection and assigns
/// ids itself. CRUD call sites are written once against this trait.
///
/// Deleting an entity that no longer exists succeeds as a no-op.
#[async_trait(?Send)]
pub trait ProjectApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
    async fn get_project(&self, id: Uuid) -> Result<Project, ApiError>;
    async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ApiError>;
    async fn update_project(
        &self,
        id: Uuid,
        request: &UpdateProjectRequest,
    ) -> Result<Project, ApiError>;
    async fn delete_project(&self, id: Uuid) -> Result<(), ApiError>;

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ApiError>;
    async fn create_task(
        &self,
        project_id: Uuid,
        request: &CreateTaskRequest,
    ) -> Result<Task, ApiError>;
    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        request: &UpdateTaskRequest,
    ) -> Result<Task, ApiError>;
    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> Result<(), ApiError>;
}
