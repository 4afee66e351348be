use async_trait::async_trait;
use uuid::Uuid;

use crate::api::ProjectApi;
use crate::error::ApiError;
use crate::storage::{Storage, PROJECTS_KEY};
use crate::types::{
    CreateProjectRequest, CreateTaskRequest, Project, Task, UpdateProjectRequest,
    UpdateTaskRequest,
};

/// Local-only persistence: the whole project collection lives as one JSON
/// array under the `projects` key and is rewritten on every mutation.
/// Ids are client-generated v4 UUIDs.
#[derive(Debug, Clone)]
pub struct LocalApi<S: Storage> {
    storage: S,
}

impl<S: Storage> LocalApi<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn load(&self) -> Vec<Project> {
        self.storage
            .get(PROJECTS_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn save(&self, projects: &[Project]) {
        if let Ok(json) = serde_json::to_string(projects) {
            self.storage.set(PROJECTS_KEY, &json);
        }
    }
}

fn project_not_found() -> ApiError {
    ApiError::NotFound("Project not found".to_string())
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

#[async_trait(?Send)]
impl<S: Storage> ProjectApi for LocalApi<S> {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        Ok(self.load())
    }

    async fn get_project(&self, id: Uuid) -> Result<Project, ApiError> {
        self.load()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(project_not_found)
    }

    async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        let mut projects = self.load();
        let project = Project::new(request.title.clone(), request.description.clone());
        projects.push(project.clone());
        self.save(&projects);
        Ok(project)
    }

    async fn update_project(
        &self,
        id: Uuid,
        request: &UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        let mut projects = self.load();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(project_not_found)?;
        project.title = request.title.clone();
        project.description = request.description.clone();
        let updated = project.clone();
        self.save(&projects);
        Ok(updated)
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), ApiError> {
        let mut projects = self.load();
        // absent id is a successful no-op
        projects.retain(|p| p.id != id);
        self.save(&projects);
        Ok(())
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ApiError> {
        Ok(self.get_project(project_id).await?.tasks)
    }

    async fn create_task(
        &self,
        project_id: Uuid,
        request: &CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        let mut projects = self.load();
        let project = projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(project_not_found)?;
        let mut task = Task::new(
            request.title.clone(),
            request.description.clone(),
            request.due_date,
        );
        task.completed = request.completed;
        project.tasks.push(task.clone());
        self.save(&projects);
        Ok(task)
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        request: &UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        let mut projects = self.load();
        let project = projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(project_not_found)?;
        let task = project
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(task_not_found)?;
        task.title = request.title.clone();
        task.description = request.description.clone();
        task.due_date = request.due_date;
        task.completed = request.completed;
        let updated = task.clone();
        self.save(&projects);
        Ok(updated)
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        let mut projects = self.load();
        let project = projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(project_not_found)?;
        project.tasks.retain(|t| t.id != task_id);
        self.save(&projects);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn api() -> LocalApi<MemoryStorage> {
        LocalApi::new(MemoryStorage::new())
    }

    #[tokio::test]
    async fn created_project_ids_are_pairwise_unique() {
        let api = api();
        let request = CreateProjectRequest::new("Website", "").unwrap();
        let mut ids = Vec::new();
        for _ in 0..50 {
            ids.push(api.create_project(&request).await.unwrap().id);
        }
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[tokio::test]
    async fn collection_survives_reload_from_storage() {
        let storage = MemoryStorage::new();
        let first = LocalApi::new(storage.clone());
        let created = first
            .create_project(&CreateProjectRequest::new("Website", "relaunch").unwrap())
            .await
            .unwrap();

        let second = LocalApi::new(storage);
        let listed = second.list_projects().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].title, "Website");
    }

    #[tokio::test]
    async fn whitespace_title_never_reaches_the_collection() {
        let api = api();
        assert!(matches!(
            CreateProjectRequest::new("   ", ""),
            Err(ApiError::Validation(_))
        ));
        assert!(api.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_missing_project_is_not_found() {
        let api = api();
        let request = UpdateProjectRequest::new("Renamed", "").unwrap();
        let err = api.update_project(Uuid::new_v4(), &request).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_project_is_idempotent() {
        let api = api();
        let keep = api
            .create_project(&CreateProjectRequest::new("Keep", "").unwrap())
            .await
            .unwrap();
        let gone = api
            .create_project(&CreateProjectRequest::new("Gone", "").unwrap())
            .await
            .unwrap();

        api.delete_project(gone.id).await.unwrap();
        api.delete_project(gone.id).await.unwrap();
        api.delete_project(Uuid::new_v4()).await.unwrap();

        let listed = api.list_projects().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
    }

    #[tokio::test]
    async fn delete_task_is_idempotent() {
        let api = api();
        let project = api
            .create_project(&CreateProjectRequest::new("Website", "").unwrap())
            .await
            .unwrap();
        let task = api
            .create_task(project.id, &CreateTaskRequest::new("Deploy", "", None).unwrap())
            .await
            .unwrap();
        api.create_task(project.id, &CreateTaskRequest::new("Verify", "", None).unwrap())
            .await
            .unwrap();

        api.delete_task(project.id, task.id).await.unwrap();
        api.delete_task(project.id, task.id).await.unwrap();

        let remaining = api.list_tasks(project.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Verify");
    }

    #[tokio::test]
    async fn toggle_twice_restores_completion() {
        let api = api();
        let project = api
            .create_project(&CreateProjectRequest::new("Website", "").unwrap())
            .await
            .unwrap();
        let task = api
            .create_task(
                project.id,
                &CreateTaskRequest::new("Deploy", "", None).unwrap(),
            )
            .await
            .unwrap();
        assert!(!task.completed);

        let once = api
            .update_task(project.id, task.id, &UpdateTaskRequest::toggled(&task))
            .await
            .unwrap();
        assert!(once.completed);

        let twice = api
            .update_task(project.id, task.id, &UpdateTaskRequest::toggled(&once))
            .await
            .unwrap();
        assert!(!twice.completed);
    }

    #[tokio::test]
    async fn task_operations_stay_inside_their_project() {
        let api = api();
        let first = api
            .create_project(&CreateProjectRequest::new("First", "").unwrap())
            .await
            .unwrap();
        let second = api
            .create_project(&CreateProjectRequest::new("Second", "").unwrap())
            .await
            .unwrap();
        let task = api
            .create_task(first.id, &CreateTaskRequest::new("Only here", "", None).unwrap())
            .await
            .unwrap();

        let err = api
            .update_task(second.id, task.id, &UpdateTaskRequest::toggled(&task))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // deleting through the wrong project leaves the task alone
        api.delete_task(second.id, task.id).await.unwrap();
        let remaining = api.list_tasks(first.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn completing_and_deleting_tasks_moves_progress() {
        let api = api();
        let project = api
            .create_project(&CreateProjectRequest::new("Website", "").unwrap())
            .await
            .unwrap();
        let design = api
            .create_task(project.id, &CreateTaskRequest::new("Design", "", None).unwrap())
            .await
            .unwrap();
        api.create_task(project.id, &CreateTaskRequest::new("Build", "", None).unwrap())
            .await
            .unwrap();

        api.update_task(project.id, design.id, &UpdateTaskRequest::toggled(&design))
            .await
            .unwrap();
        let loaded = api.get_project(project.id).await.unwrap();
        assert_eq!(loaded.progress(), 50);

        api.delete_task(project.id, design.id).await.unwrap();
        let loaded = api.get_project(project.id).await.unwrap();
        assert_eq!(loaded.progress(), 0);
    }
}
