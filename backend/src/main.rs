use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{
    CreateProjectRequest, CreateTaskRequest, LoginRequest, LoginResponse, Project,
    RegisterRequest, RegisterResponse, Task, UpdateProjectRequest, UpdateTaskRequest,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::{cors::CorsLayer, services::ServeDir};
use uuid::Uuid;

/// Development server for the client: implements the wire contract with
/// in-memory state. Every `/projects` route requires a bearer token
/// handed out by `/auth/login`, and each user only ever sees their own
/// project collection.
#[derive(Debug, Default)]
struct AppState {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    tokens: HashMap<String, i64>,
    projects: HashMap<i64, Vec<Project>>,
    next_user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: i64,
    email: String,
    password: String,
    roles: Vec<String>,
}

type SharedState = Arc<AppState>;
type ErrorResponse = (StatusCode, Json<Value>);

impl AppState {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn error(status: StatusCode, message: &str) -> ErrorResponse {
    (status, Json(json!({ "message": message })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<i64, ErrorResponse> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Authentication required"))?;
    state
        .lock()
        .tokens
        .get(token)
        .copied()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

fn app(state: SharedState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/:id/tasks", get(list_tasks).post(create_task))
        .route(
            "/projects/:id/tasks/:task_id",
            put(update_task).delete(delete_task),
        )
        .fallback_service(ServeDir::new("frontend/dist"))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=info,tower_http=info".into()),
        )
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let state = Arc::new(AppState::default());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind");
    tracing::info!("server running on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.expect("server error");
}

async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ErrorResponse> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(error(StatusCode::BAD_REQUEST, "A valid email is required"));
    }
    if payload.password.chars().count() < 6 {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters",
        ));
    }

    let mut inner = state.lock();
    if inner.users.iter().any(|u| u.email == email) {
        return Err(error(StatusCode::BAD_REQUEST, "Email is already in use"));
    }
    inner.next_user_id += 1;
    let user = User {
        id: inner.next_user_id,
        email,
        password: payload.password,
        roles: vec!["user".to_string()],
    };
    tracing::info!(user_id = user.id, "registered {}", user.email);
    inner.projects.insert(user.id, Vec::new());
    inner.users.push(user);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully".to_string(),
        }),
    ))
}

async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ErrorResponse> {
    let email = payload.email.trim().to_lowercase();
    let mut inner = state.lock();
    let user = inner
        .users
        .iter()
        .find(|u| u.email == email && u.password == payload.password)
        .cloned()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;

    let token = Uuid::new_v4().simple().to_string();
    inner.tokens.insert(token.clone(), user.id);
    tracing::info!(user_id = user.id, "signed in {}", user.email);

    Ok(Json(LoginResponse {
        token,
        id: user.id,
        email: user.email,
        roles: user.roles,
    }))
}

async fn list_projects(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Project>>, ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    let inner = state.lock();
    Ok(Json(inner.projects.get(&user_id).cloned().unwrap_or_default()))
}

async fn get_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    let inner = state.lock();
    inner
        .projects
        .get(&user_id)
        .and_then(|projects| projects.iter().find(|p| p.id == id))
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Project not found"))
}

async fn create_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    if payload.title.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Project title is required"));
    }

    let project = Project::new(
        payload.title.trim().to_string(),
        payload.description.trim().to_string(),
    );
    let mut inner = state.lock();
    inner
        .projects
        .entry(user_id)
        .or_default()
        .push(project.clone());
    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    if payload.title.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Project title is required"));
    }

    let mut inner = state.lock();
    let project = inner
        .projects
        .get_mut(&user_id)
        .and_then(|projects| projects.iter_mut().find(|p| p.id == id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Project not found"))?;
    project.title = payload.title.trim().to_string();
    project.description = payload.description.trim().to_string();
    Ok(Json(project.clone()))
}

async fn delete_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    let mut inner = state.lock();
    let projects = inner
        .projects
        .get_mut(&user_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Project not found"))?;
    let before = projects.len();
    projects.retain(|p| p.id != id);
    if projects.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Project not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tasks(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    let inner = state.lock();
    inner
        .projects
        .get(&user_id)
        .and_then(|projects| projects.iter().find(|p| p.id == id))
        .map(|p| Json(p.tasks.clone()))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Project not found"))
}

async fn create_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    if payload.title.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Task title is required"));
    }

    let mut inner = state.lock();
    let project = inner
        .projects
        .get_mut(&user_id)
        .and_then(|projects| projects.iter_mut().find(|p| p.id == id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Project not found"))?;
    let mut task = Task::new(
        payload.title.trim().to_string(),
        payload.description.trim().to_string(),
        payload.due_date,
    );
    task.completed = payload.completed;
    project.tasks.push(task.clone());
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    if payload.title.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Task title is required"));
    }

    let mut inner = state.lock();
    let task = inner
        .projects
        .get_mut(&user_id)
        .and_then(|projects| projects.iter_mut().find(|p| p.id == id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Project not found"))?
        .tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Task not found"))?;
    task.title = payload.title.trim().to_string();
    task.description = payload.description.trim().to_string();
    task.due_date = payload.due_date;
    task.completed = payload.completed;
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ErrorResponse> {
    let user_id = authorize(&state, &headers)?;
    let mut inner = state.lock();
    let project = inner
        .projects
        .get_mut(&user_id)
        .and_then(|projects| projects.iter_mut().find(|p| p.id == id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Project not found"))?;
    let before = project.tasks.len();
    project.tasks.retain(|t| t.id != task_id);
    if project.tasks.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "Task not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
