use async_trait::async_trait;
use shared::api::{AuthApi, ProjectApi};
use shared::local::LocalApi;
use shared::{
    ApiError, CreateProjectRequest, CreateTaskRequest, LoginRequest, LoginResponse, Project,
    RegisterRequest, RegisterResponse, Task, UpdateProjectRequest, UpdateTaskRequest,
};
use uuid::Uuid;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::storage::WebStorage;

/// Baked in at build time; empty means same-origin relative URLs, the
/// shape used when the dev server also serves the compiled frontend.
const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "",
};

/// HTTP binding to the backend. Carries a snapshot of the bearer token
/// taken when the triggering operation started; the token is attached to
/// every request and never read from anywhere else. Authorization
/// failures are only classified here, never acted on: navigation and
/// session teardown stay in the update loop.
#[derive(Debug, Clone, Default)]
pub struct RemoteApi {
    token: Option<String>,
}

impl RemoteApi {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<(u16, String), ApiError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        if let Some(body) = &body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let url = format!("{}{}", API_BASE_URL, path);
        let request =
            Request::new_with_str_and_init(&url, &opts).map_err(|_| ApiError::network())?;
        let headers = request.headers();
        headers
            .set("Content-Type", "application/json")
            .map_err(|_| ApiError::network())?;
        if let Some(token) = &self.token {
            headers
                .set("Authorization", &format!("Bearer {}", token))
                .map_err(|_| ApiError::network())?;
        }

        let window = web_sys::window().ok_or_else(ApiError::network)?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| ApiError::network())?
            .into();

        let text = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .map_err(|_| ApiError::network())?
                .as_string()
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        Ok((response.status(), text))
    }

    async fn fetch_json<T, R>(
        &self,
        method: &str,
        path: &str,
        body: Option<&T>,
        fallback: &str,
    ) -> Result<R, ApiError>
    where
        T: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let body = match body {
            Some(value) => {
                Some(serde_json::to_string(value).map_err(|_| ApiError::bad_payload())?)
            }
            None => None,
        };
        let (status, text) = self.send(method, path, body).await?;
        if (200..300).contains(&status) {
            serde_json::from_str(&text).map_err(|_| ApiError::bad_payload())
        } else {
            Err(ApiError::from_response(status, &text, fallback))
        }
    }

    /// DELETEs treat a 404 as success: the entity is already gone.
    async fn delete(&self, path: &str, fallback: &str) -> Result<(), ApiError> {
        let (status, text) = self.send("DELETE", path, None).await?;
        if (200..300).contains(&status) || status == 404 {
            Ok(())
        } else {
            Err(ApiError::from_response(status, &text, fallback))
        }
    }
}

#[async_trait(?Send)]
impl AuthApi for RemoteApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_string(request).map_err(|_| ApiError::bad_payload())?;
        let (status, text) = self.send("POST", "/auth/login", Some(body)).await?;
        if (200..300).contains(&status) {
            serde_json::from_str(&text).map_err(|_| ApiError::bad_payload())
        } else {
            Err(ApiError::from_login_response(status, &text))
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let body = serde_json::to_string(request).map_err(|_| ApiError::bad_payload())?;
        let (status, text) = self.send("POST", "/auth/register", Some(body)).await?;
        if (200..300).contains(&status) {
            serde_json::from_str(&text).map_err(|_| ApiError::bad_payload())
        } else {
            Err(ApiError::from_register_response(status, &text))
        }
    }
}

#[async_trait(?Send)]
impl ProjectApi for RemoteApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.fetch_json::<(), _>("GET", "/projects", None, "Could not load projects.")
            .await
    }

    async fn get_project(&self, id: Uuid) -> Result<Project, ApiError> {
        self.fetch_json::<(), _>(
            "GET",
            &format!("/projects/{}", id),
            None,
            "Could not load the project.",
        )
        .await
    }

    async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.fetch_json(
            "POST",
            "/projects",
            Some(request),
            "Could not create the project.",
        )
        .await
    }

    async fn update_project(
        &self,
        id: Uuid,
        request: &UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        self.fetch_json(
            "PUT",
            &format!("/projects/{}", id),
            Some(request),
            "Could not update the project.",
        )
        .await
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(
            &format!("/projects/{}", id),
            "Could not delete the project.",
        )
        .await
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ApiError> {
        self.fetch_json::<(), _>(
            "GET",
            &format!("/projects/{}/tasks", project_id),
            None,
            "Could not load tasks.",
        )
        .await
    }

    async fn create_task(
        &self,
        project_id: Uuid,
        request: &CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        self.fetch_json(
            "POST",
            &format!("/projects/{}/tasks", project_id),
            Some(request),
            "Could not create the task.",
        )
        .await
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        request: &UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        self.fetch_json(
            "PUT",
            &format!("/projects/{}/tasks/{}", project_id, task_id),
            Some(request),
            "Could not update the task.",
        )
        .await
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        self.delete(
            &format!("/projects/{}/tasks/{}", project_id, task_id),
            "Could not delete the task.",
        )
        .await
    }
}

/// The persistence variant active for this build. Remote round-trips
/// through the HTTP binding; Local keeps the whole collection in
/// `localStorage`. Both sit behind the same trait so CRUD call sites
/// are written once.
#[derive(Clone)]
pub enum ClientApi {
    Remote(RemoteApi),
    Local(LocalApi<WebStorage>),
}

#[async_trait(?Send)]
impl ProjectApi for ClientApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        match self {
            ClientApi::Remote(api) => api.list_projects().await,
            ClientApi::Local(api) => api.list_projects().await,
        }
    }

    async fn get_project(&self, id: Uuid) -> Result<Project, ApiError> {
        match self {
            ClientApi::Remote(api) => api.get_project(id).await,
            ClientApi::Local(api) => api.get_project(id).await,
        }
    }

    async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        match self {
            ClientApi::Remote(api) => api.create_project(request).await,
            ClientApi::Local(api) => api.create_project(request).await,
        }
    }

    async fn update_project(
        &self,
        id: Uuid,
        request: &UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        match self {
            ClientApi::Remote(api) => api.update_project(id, request).await,
            ClientApi::Local(api) => api.update_project(id, request).await,
        }
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), ApiError> {
        match self {
            ClientApi::Remote(api) => api.delete_project(id).await,
            ClientApi::Local(api) => api.delete_project(id).await,
        }
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ApiError> {
        match self {
            ClientApi::Remote(api) => api.list_tasks(project_id).await,
            ClientApi::Local(api) => api.list_tasks(project_id).await,
        }
    }

    async fn create_task(
        &self,
        project_id: Uuid,
        request: &CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        match self {
            ClientApi::Remote(api) => api.create_task(project_id, request).await,
            ClientApi::Local(api) => api.create_task(project_id, request).await,
        }
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        request: &UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        match self {
            ClientApi::Remote(api) => api.update_task(project_id, task_id, request).await,
            ClientApi::Local(api) => api.update_task(project_id, task_id, request).await,
        }
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> Result<(), ApiError> {
        match self {
            ClientApi::Remote(api) => api.delete_task(project_id, task_id).await,
            ClientApi::Local(api) => api.delete_task(project_id, task_id).await,
        }
    }
}
