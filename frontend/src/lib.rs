use std::collections::HashMap;

use chrono::NaiveDate;
use sauron::{
    html::{attributes, attributes::*, *},
    prelude::*,
};
use shared::api::{AuthApi, ProjectApi};
use shared::local::LocalApi;
use shared::session::SessionStore;
use shared::storage::{Storage, THEME_KEY};
use shared::store::DomainStore;
use shared::{
    ApiError, CreateProjectRequest, CreateTaskRequest, LoginRequest, LoginResponse, Project,
    RegisterRequest, RegisterResponse, Task, UpdateProjectRequest, UpdateTaskRequest,
};
use uuid::Uuid;
use web_sys::{console, window};

mod api;
mod storage;

use api::{ClientApi, RemoteApi};
use storage::WebStorage;

/// Set STORAGE_MODE=local at build time to keep the whole project
/// collection in localStorage instead of round-tripping the API.
const STORAGE_MODE: Option<&str> = option_env!("STORAGE_MODE");

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageMode {
    Remote,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Page {
    Home,
    SignIn,
    SignUp,
    Project,
}

impl Page {
    fn to_path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::SignIn => "/signin",
            Page::SignUp => "/signup",
            Page::Project => "/project",
        }
    }

    fn from_path(path: &str) -> Self {
        match path {
            "/signin" => Page::SignIn,
            "/signup" => Page::SignUp,
            "/project" => Page::Project,
            _ => Page::Home,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    NavigateTo(Page),
    ToggleTheme,
    DismissBanner,

    // sign-in
    SetSignInEmail(String),
    SetSignInPassword(String),
    SubmitSignIn,
    SignedIn(LoginResponse),

    // sign-up
    SetSignUpEmail(String),
    SetSignUpPassword(String),
    SetSignUpConfirm(String),
    SubmitSignUp,
    SignedUp(RegisterResponse),

    SignOut,

    // projects
    LoadProjects,
    ProjectsLoaded(Vec<Project>),
    SetProjectTitle(String),
    SetProjectDescription(String),
    SubmitProject,
    ProjectCreated(Project),
    ProjectUpdated(Project),
    EditProject(Uuid),
    CancelProjectEdit,
    DeleteProject(Uuid),
    ProjectDeleted(Uuid),
    ProjectFailed(Uuid, ApiError),
    SelectProject(Uuid),
    CloseProject,

    // tasks of the selected project
    SetTaskTitle(String),
    SetTaskDescription(String),
    SetTaskDueDate(String),
    SubmitTask,
    TaskCreated(Uuid, Task),
    TaskUpdated(Uuid, Task),
    EditTask(Uuid),
    CancelTaskEdit,
    ToggleTask(Uuid),
    DeleteTask(Uuid),
    TaskDeleted(Uuid, Uuid),
    TaskFailed(Uuid, ApiError),

    AuthFailed(ApiError),
    ApiFailed(ApiError),
}

pub struct Model {
    page: Page,
    mode: StorageMode,
    storage: WebStorage,
    session: SessionStore<WebStorage>,
    store: DomainStore,
    dark: bool,
    error: Option<String>,
    notice: Option<String>,
    pending: bool,
    loading: bool,
    busy: HashMap<Uuid, bool>,
    sign_in_email: String,
    sign_in_password: String,
    sign_up_email: String,
    sign_up_password: String,
    sign_up_confirm: String,
    project_title: String,
    project_description: String,
    editing_project: Option<Uuid>,
    task_title: String,
    task_description: String,
    task_due_date: String,
    editing_task: Option<Uuid>,
}

impl Model {
    fn new() -> Self {
        let storage = WebStorage::new().expect("localStorage is unavailable");
        let session = SessionStore::load(storage.clone());
        let dark = !matches!(storage.get(THEME_KEY).as_deref(), Some("light"));
        let mode = match STORAGE_MODE {
            Some("local") => StorageMode::Local,
            _ => StorageMode::Remote,
        };
        Self {
            page: Page::Home,
            mode,
            storage,
            session,
            store: DomainStore::new(),
            dark,
            error: None,
            notice: None,
            pending: false,
            loading: false,
            busy: HashMap::new(),
            sign_in_email: String::new(),
            sign_in_password: String::new(),
            sign_up_email: String::new(),
            sign_up_password: String::new(),
            sign_up_confirm: String::new(),
            project_title: String::new(),
            project_description: String::new(),
            editing_project: None,
            task_title: String::new(),
            task_description: String::new(),
            task_due_date: String::new(),
            editing_task: None,
        }
    }

    fn domain_api(&self) -> ClientApi {
        match self.mode {
            StorageMode::Remote => ClientApi::Remote(RemoteApi::new(self.session.token())),
            StorageMode::Local => ClientApi::Local(LocalApi::new(self.storage.clone())),
        }
    }

    fn auth_api(&self) -> RemoteApi {
        RemoteApi::new(None)
    }

    fn go_to(&mut self, page: Page) -> Cmd<Msg> {
        // the workspace route is only reachable with a session
        let page = if page == Page::Project && !self.session.is_authenticated() {
            Page::SignIn
        } else {
            page
        };
        self.page = page;
        self.error = None;
        push_url(page.to_path());
        if page == Page::Project && self.store.projects().is_empty() {
            return self.load_projects();
        }
        Cmd::none()
    }

    fn load_projects(&mut self) -> Cmd<Msg> {
        self.loading = true;
        let api = self.domain_api();
        Cmd::new(async move {
            match api.list_projects().await {
                Ok(projects) => Msg::ProjectsLoaded(projects),
                Err(e) => Msg::ApiFailed(e),
            }
        })
    }

    /// Central failure handling: an authorization rejection on a domain
    /// request means the credential is dead, so the session is torn down
    /// and the user is sent back to sign-in. Everything else is a banner.
    fn fail(&mut self, error: ApiError) -> Cmd<Msg> {
        console::log_1(&format!("api error: {}", error).into());
        if matches!(error, ApiError::Unauthorized(_)) {
            self.session.expire();
            self.store = DomainStore::new();
            let cmd = self.go_to(Page::SignIn);
            self.error = Some("Your session has expired. Please sign in again.".to_string());
            return cmd;
        }
        self.error = Some(error.to_string());
        Cmd::none()
    }

    fn clear_project_form(&mut self) {
        self.project_title.clear();
        self.project_description.clear();
        self.editing_project = None;
    }

    fn clear_task_form(&mut self) {
        self.task_title.clear();
        self.task_description.clear();
        self.task_due_date.clear();
        self.editing_task = None;
    }

    fn parse_due_date(&self) -> Result<Option<NaiveDate>, String> {
        let raw = self.task_due_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| "Due date must be a valid date.".to_string())
    }
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        if let Some(window) = window() {
            if let Ok(pathname) = window.location().pathname() {
                self.page = Page::from_path(&pathname);
            }
        }
        if self.page == Page::Project && !self.session.is_authenticated() {
            self.page = Page::SignIn;
            replace_url(Page::SignIn.to_path());
        }
        storage::apply_theme(self.dark);
        if self.page == Page::Project {
            return self.load_projects();
        }
        Cmd::none()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::NavigateTo(page) => self.go_to(page),
            Msg::ToggleTheme => {
                self.dark = !self.dark;
                self.storage
                    .set(THEME_KEY, if self.dark { "dark" } else { "light" });
                storage::apply_theme(self.dark);
                Cmd::none()
            }
            Msg::DismissBanner => {
                self.error = None;
                self.notice = None;
                Cmd::none()
            }

            Msg::SetSignInEmail(email) => {
                self.sign_in_email = email;
                Cmd::none()
            }
            Msg::SetSignInPassword(password) => {
                self.sign_in_password = password;
                Cmd::none()
            }
            Msg::SubmitSignIn => {
                if self.pending {
                    return Cmd::none();
                }
                self.error = None;
                self.notice = None;
                let email = self.sign_in_email.trim().to_string();
                let password = self.sign_in_password.clone();
                if email.is_empty() || password.is_empty() {
                    self.error = Some("Email and password are required.".to_string());
                    return Cmd::none();
                }
                self.pending = true;
                let api = self.auth_api();
                Cmd::new(async move {
                    match api.login(&LoginRequest { email, password }).await {
                        Ok(response) => Msg::SignedIn(response),
                        Err(e) => Msg::AuthFailed(e),
                    }
                })
            }
            Msg::SignedIn(response) => {
                self.pending = false;
                self.session.establish(response);
                self.sign_in_email.clear();
                self.sign_in_password.clear();
                self.store = DomainStore::new();
                self.go_to(Page::Project)
            }

            Msg::SetSignUpEmail(email) => {
                self.sign_up_email = email;
                Cmd::none()
            }
            Msg::SetSignUpPassword(password) => {
                self.sign_up_password = password;
                Cmd::none()
            }
            Msg::SetSignUpConfirm(confirm) => {
                self.sign_up_confirm = confirm;
                Cmd::none()
            }
            Msg::SubmitSignUp => {
                if self.pending {
                    return Cmd::none();
                }
                self.error = None;
                self.notice = None;
                let email = self.sign_up_email.trim().to_string();
                let password = self.sign_up_password.clone();
                if email.is_empty() || password.is_empty() {
                    self.error = Some("Email and password are required.".to_string());
                    return Cmd::none();
                }
                if password.chars().count() < 6 {
                    self.error = Some("Password must be at least 6 characters.".to_string());
                    return Cmd::none();
                }
                if password != self.sign_up_confirm {
                    self.error = Some("Passwords do not match.".to_string());
                    return Cmd::none();
                }
                self.pending = true;
                let api = self.auth_api();
                Cmd::new(async move {
                    match api.register(&RegisterRequest { email, password }).await {
                        Ok(response) => Msg::SignedUp(response),
                        Err(e) => Msg::AuthFailed(e),
                    }
                })
            }
            Msg::SignedUp(response) => {
                self.pending = false;
                self.sign_up_email.clear();
                self.sign_up_password.clear();
                self.sign_up_confirm.clear();
                let cmd = self.go_to(Page::SignIn);
                self.notice = Some(if response.message.is_empty() {
                    "Account created. Please sign in.".to_string()
                } else {
                    response.message
                });
                cmd
            }

            Msg::SignOut => {
                self.session.sign_out();
                self.store = DomainStore::new();
                self.clear_project_form();
                self.clear_task_form();
                self.go_to(Page::Home)
            }

            Msg::LoadProjects => self.load_projects(),
            Msg::ProjectsLoaded(projects) => {
                self.loading = false;
                self.store.set_projects(projects);
                Cmd::none()
            }

            Msg::SetProjectTitle(title) => {
                self.project_title = title;
                Cmd::none()
            }
            Msg::SetProjectDescription(description) => {
                self.project_description = description;
                Cmd::none()
            }
            Msg::SubmitProject => {
                if self.pending {
                    return Cmd::none();
                }
                self.error = None;
                match self.editing_project {
                    Some(id) => {
                        let request = match UpdateProjectRequest::new(
                            &self.project_title,
                            &self.project_description,
                        ) {
                            Ok(request) => request,
                            Err(e) => {
                                self.error = Some(e.to_string());
                                return Cmd::none();
                            }
                        };
                        self.pending = true;
                        let api = self.domain_api();
                        Cmd::new(async move {
                            match api.update_project(id, &request).await {
                                Ok(project) => Msg::ProjectUpdated(project),
                                Err(e) => Msg::ApiFailed(e),
                            }
                        })
                    }
                    None => {
                        let request = match CreateProjectRequest::new(
                            &self.project_title,
                            &self.project_description,
                        ) {
                            Ok(request) => request,
                            Err(e) => {
                                self.error = Some(e.to_string());
                                return Cmd::none();
                            }
                        };
                        self.pending = true;
                        let api = self.domain_api();
                        Cmd::new(async move {
                            match api.create_project(&request).await {
                                Ok(project) => Msg::ProjectCreated(project),
                                Err(e) => Msg::ApiFailed(e),
                            }
                        })
                    }
                }
            }
            Msg::ProjectCreated(project) => {
                self.pending = false;
                self.store.insert_project(project);
                self.clear_project_form();
                Cmd::none()
            }
            Msg::ProjectUpdated(project) => {
                self.pending = false;
                self.store.apply_project(project);
                self.clear_project_form();
                Cmd::none()
            }
            Msg::EditProject(id) => {
                if let Some(project) = self.store.project(id) {
                    self.project_title = project.title.clone();
                    self.project_description = project.description.clone();
                    self.editing_project = Some(id);
                }
                Cmd::none()
            }
            Msg::CancelProjectEdit => {
                self.clear_project_form();
                Cmd::none()
            }
            Msg::DeleteProject(id) => {
                if !confirm("Are you sure you want to delete this project?") {
                    return Cmd::none();
                }
                self.busy.insert(id, true);
                let api = self.domain_api();
                Cmd::new(async move {
                    match api.delete_project(id).await {
                        Ok(()) => Msg::ProjectDeleted(id),
                        Err(e) => Msg::ProjectFailed(id, e),
                    }
                })
            }
            Msg::ProjectDeleted(id) => {
                self.busy.remove(&id);
                self.store.remove_project(id);
                if self.editing_project == Some(id) {
                    self.clear_project_form();
                }
                Cmd::none()
            }
            Msg::ProjectFailed(id, error) => {
                self.busy.remove(&id);
                self.fail(error)
            }
            Msg::SelectProject(id) => {
                self.store.select(id);
                self.clear_task_form();
                self.error = None;
                Cmd::none()
            }
            Msg::CloseProject => {
                self.store.clear_selection();
                self.clear_task_form();
                Cmd::none()
            }

            Msg::SetTaskTitle(title) => {
                self.task_title = title;
                Cmd::none()
            }
            Msg::SetTaskDescription(description) => {
                self.task_description = description;
                Cmd::none()
            }
            Msg::SetTaskDueDate(due_date) => {
                self.task_due_date = due_date;
                Cmd::none()
            }
            Msg::SubmitTask => {
                if self.pending {
                    return Cmd::none();
                }
                let Some(project_id) = self.store.selected_id() else {
                    return Cmd::none();
                };
                self.error = None;
                let due_date = match self.parse_due_date() {
                    Ok(due_date) => due_date,
                    Err(message) => {
                        self.error = Some(message);
                        return Cmd::none();
                    }
                };
                match self.editing_task {
                    Some(task_id) => {
                        let completed = self
                            .store
                            .selected()
                            .and_then(|p| p.task(task_id))
                            .map(|t| t.completed)
                            .unwrap_or(false);
                        let request = match UpdateTaskRequest::new(
                            &self.task_title,
                            &self.task_description,
                            due_date,
                            completed,
                        ) {
                            Ok(request) => request,
                            Err(e) => {
                                self.error = Some(e.to_string());
                                return Cmd::none();
                            }
                        };
                        self.pending = true;
                        let api = self.domain_api();
                        Cmd::new(async move {
                            match api.update_task(project_id, task_id, &request).await {
                                Ok(task) => Msg::TaskUpdated(project_id, task),
                                Err(e) => Msg::ApiFailed(e),
                            }
                        })
                    }
                    None => {
                        let request = match CreateTaskRequest::new(
                            &self.task_title,
                            &self.task_description,
                            due_date,
                        ) {
                            Ok(request) => request,
                            Err(e) => {
                                self.error = Some(e.to_string());
                                return Cmd::none();
                            }
                        };
                        self.pending = true;
                        let api = self.domain_api();
                        Cmd::new(async move {
                            match api.create_task(project_id, &request).await {
                                Ok(task) => Msg::TaskCreated(project_id, task),
                                Err(e) => Msg::ApiFailed(e),
                            }
                        })
                    }
                }
            }
            Msg::TaskCreated(project_id, task) => {
                self.pending = false;
                self.store.insert_task(project_id, task);
                self.clear_task_form();
                Cmd::none()
            }
            Msg::TaskUpdated(project_id, task) => {
                self.pending = false;
                self.busy.remove(&task.id);
                if self.editing_task == Some(task.id) {
                    self.clear_task_form();
                }
                self.store.apply_task(project_id, task);
                Cmd::none()
            }
            Msg::EditTask(task_id) => {
                if let Some(task) = self.store.selected().and_then(|p| p.task(task_id)) {
                    self.task_title = task.title.clone();
                    self.task_description = task.description.clone();
                    self.task_due_date = task.due_date.map(|d| d.to_string()).unwrap_or_default();
                    self.editing_task = Some(task_id);
                }
                Cmd::none()
            }
            Msg::CancelTaskEdit => {
                self.clear_task_form();
                Cmd::none()
            }
            Msg::ToggleTask(task_id) => {
                let Some(project) = self.store.selected() else {
                    return Cmd::none();
                };
                let project_id = project.id;
                let Some(task) = project.task(task_id) else {
                    return Cmd::none();
                };
                let request = UpdateTaskRequest::toggled(task);
                self.busy.insert(task_id, true);
                let api = self.domain_api();
                Cmd::new(async move {
                    match api.update_task(project_id, task_id, &request).await {
                        Ok(task) => Msg::TaskUpdated(project_id, task),
                        Err(e) => Msg::TaskFailed(task_id, e),
                    }
                })
            }
            Msg::DeleteTask(task_id) => {
                let Some(project_id) = self.store.selected_id() else {
                    return Cmd::none();
                };
                if !confirm("Are you sure you want to delete this task?") {
                    return Cmd::none();
                }
                self.busy.insert(task_id, true);
                let api = self.domain_api();
                Cmd::new(async move {
                    match api.delete_task(project_id, task_id).await {
                        Ok(()) => Msg::TaskDeleted(project_id, task_id),
                        Err(e) => Msg::TaskFailed(task_id, e),
                    }
                })
            }
            Msg::TaskDeleted(project_id, task_id) => {
                self.busy.remove(&task_id);
                self.store.remove_task(project_id, task_id);
                if self.editing_task == Some(task_id) {
                    self.clear_task_form();
                }
                Cmd::none()
            }
            Msg::TaskFailed(task_id, error) => {
                self.busy.remove(&task_id);
                self.fail(error)
            }

            Msg::AuthFailed(error) => {
                self.pending = false;
                self.error = Some(error.to_string());
                Cmd::none()
            }
            Msg::ApiFailed(error) => {
                self.pending = false;
                self.loading = false;
                self.fail(error)
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                self.view_header(),
                div(
                    [class("max-w-6xl mx-auto px-6 py-8")],
                    [match self.page {
                        Page::Home => self.view_home(),
                        Page::SignIn => self.view_sign_in(),
                        Page::SignUp => self.view_sign_up(),
                        Page::Project => self.view_workspace(),
                    }],
                ),
            ],
        )
    }
}

impl Model {
    fn view_header(&self) -> Node<Msg> {
        let email = self
            .session
            .current()
            .map(|s| s.user.email.clone())
            .unwrap_or_default();
        let links = if self.session.is_authenticated() {
            vec![
                self.nav_link("Projects", Page::Project),
                span([class("text-sm text-ctp-subtext0 px-2")], [text(&email)]),
                button(
                    [
                        on_click(|_| Msg::SignOut),
                        class("text-sm font-medium text-ctp-red hover:bg-ctp-red/10 px-3 py-2 rounded-md transition-colors duration-200"),
                    ],
                    [text("Sign out")],
                ),
                self.theme_button(),
            ]
        } else {
            vec![
                self.nav_link("Home", Page::Home),
                self.nav_link("Sign in", Page::SignIn),
                self.nav_link("Sign up", Page::SignUp),
                self.theme_button(),
            ]
        };
        header(
            [class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")],
            [div(
                [class("max-w-6xl mx-auto px-6 py-4")],
                [div(
                    [class("flex items-center justify-between")],
                    [
                        h1(
                            [class("text-2xl font-bold text-ctp-text")],
                            [text("Project Tasks")],
                        ),
                        nav([class("flex items-center space-x-4")], links),
                    ],
                )],
            )],
        )
    }

    fn nav_link(&self, label: &str, page: Page) -> Node<Msg> {
        let is_active = self.page == page;
        a(
            [
                href(page.to_path()),
                on_click(move |event| {
                    event.prevent_default();
                    Msg::NavigateTo(page)
                }),
                class(&format!(
                    "px-3 py-2 rounded-md text-sm font-medium transition-colors duration-200 {}",
                    if is_active {
                        "bg-ctp-blue text-ctp-base"
                    } else {
                        "text-ctp-subtext0 hover:text-ctp-text hover:bg-ctp-surface0"
                    }
                )),
            ],
            [text(label)],
        )
    }

    fn theme_button(&self) -> Node<Msg> {
        button(
            [
                on_click(|_| Msg::ToggleTheme),
                class("px-3 py-2 rounded-md text-sm hover:bg-ctp-surface0 transition-colors duration-200"),
            ],
            [text(if self.dark { "☀️" } else { "🌙" })],
        )
    }

    fn view_banner(&self) -> Node<Msg> {
        if let Some(error) = &self.error {
            div(
                [class("flex items-center justify-between bg-ctp-red/20 border border-ctp-red text-ctp-red rounded-lg px-4 py-3 mb-6")],
                [
                    span([class("text-sm font-medium")], [text(error)]),
                    button(
                        [on_click(|_| Msg::DismissBanner), class("text-sm ml-4")],
                        [text("✕")],
                    ),
                ],
            )
        } else if let Some(notice) = &self.notice {
            div(
                [class("flex items-center justify-between bg-ctp-green/20 border border-ctp-green text-ctp-green rounded-lg px-4 py-3 mb-6")],
                [
                    span([class("text-sm font-medium")], [text(notice)]),
                    button(
                        [on_click(|_| Msg::DismissBanner), class("text-sm ml-4")],
                        [text("✕")],
                    ),
                ],
            )
        } else {
            span([], [])
        }
    }

    fn view_home(&self) -> Node<Msg> {
        div([class("space-y-8")], [
            div([class("bg-ctp-surface0 rounded-lg shadow-lg p-8 border border-ctp-surface1")], [
                h2([class("text-3xl font-bold text-ctp-text mb-4")], [text("Transform your project management")]),
                p([class("text-lg text-ctp-subtext1 mb-6")], [text("Organize, track and complete your projects efficiently. A complete platform to manage your tasks and track progress.")]),
                div([class("grid grid-cols-1 md:grid-cols-2 gap-6 mt-8")], [
                    self.stat_card("Projects delivered", "98%", "🎯"),
                    self.stat_card("Tasks managed", "2.5k+", "✅"),
                ]),
                div([class("mt-8")], [
                    a([
                        href(Page::SignIn.to_path()),
                        on_click(|event| {
                            event.prevent_default();
                            Msg::NavigateTo(Page::SignIn)
                        }),
                        class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-3 rounded-lg transition-colors duration-200 inline-block"),
                    ], [text("Get Started →")]),
                ]),
            ]),
        ])
    }

    fn stat_card(&self, card_title: &str, value: &str, icon: &str) -> Node<Msg> {
        div(
            [class("bg-ctp-surface1 rounded-lg p-6 border border-ctp-surface2")],
            [div(
                [class("flex items-center justify-between")],
                [
                    div(
                        [],
                        [
                            p(
                                [class("text-sm font-medium text-ctp-subtext0")],
                                [text(card_title)],
                            ),
                            p(
                                [class("text-2xl font-bold text-ctp-text mt-1")],
                                [text(value)],
                            ),
                        ],
                    ),
                    span([class("text-3xl")], [text(icon)]),
                ],
            )],
        )
    }

    fn view_sign_in(&self) -> Node<Msg> {
        div([class("max-w-md mx-auto")], [
            div([class("bg-ctp-surface0 rounded-lg shadow-lg p-8 border border-ctp-surface1")], [
                h2([class("text-2xl font-bold text-ctp-text mb-1")], [text("Sign In")]),
                p([class("text-ctp-subtext0 mb-6")], [text("Enter your information to sign in")]),
                self.view_banner(),
                div([class("space-y-4")], [
                    input([
                        r#type("email"),
                        placeholder("you@example.com"),
                        value(&self.sign_in_email),
                        on_input(|event| Msg::SetSignInEmail(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                    ], []),
                    input([
                        r#type("password"),
                        placeholder("••••••••"),
                        value(&self.sign_in_password),
                        on_input(|event| Msg::SetSignInPassword(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                    ], []),
                    button([
                        on_click(|_| Msg::SubmitSignIn),
                        disabled(self.pending),
                        class("w-full bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                    ], [text(if self.pending { "Signing in..." } else { "Sign In →" })]),
                ]),
                div([class("mt-6 text-sm text-center")], [
                    span([class("text-ctp-subtext0")], [text("Don't have an account? ")]),
                    a([
                        href(Page::SignUp.to_path()),
                        on_click(|event| {
                            event.prevent_default();
                            Msg::NavigateTo(Page::SignUp)
                        }),
                        class("text-ctp-blue hover:underline"),
                    ], [text("Create an account")]),
                ]),
            ]),
        ])
    }

    fn view_sign_up(&self) -> Node<Msg> {
        div([class("max-w-md mx-auto")], [
            div([class("bg-ctp-surface0 rounded-lg shadow-lg p-8 border border-ctp-surface1")], [
                h2([class("text-2xl font-bold text-ctp-text mb-1")], [text("Create an account")]),
                p([class("text-ctp-subtext0 mb-6")], [text("Enter your information to create your account")]),
                self.view_banner(),
                div([class("space-y-4")], [
                    input([
                        r#type("email"),
                        placeholder("you@example.com"),
                        value(&self.sign_up_email),
                        on_input(|event| Msg::SetSignUpEmail(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                    ], []),
                    input([
                        r#type("password"),
                        placeholder("Password"),
                        value(&self.sign_up_password),
                        on_input(|event| Msg::SetSignUpPassword(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                    ], []),
                    input([
                        r#type("password"),
                        placeholder("Confirm password"),
                        value(&self.sign_up_confirm),
                        on_input(|event| Msg::SetSignUpConfirm(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                    ], []),
                    button([
                        on_click(|_| Msg::SubmitSignUp),
                        disabled(self.pending),
                        class("w-full bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                    ], [text(if self.pending { "Creating account..." } else { "Create my account →" })]),
                ]),
                div([class("mt-6 text-sm text-center")], [
                    span([class("text-ctp-subtext0")], [text("Already have an account? ")]),
                    a([
                        href(Page::SignIn.to_path()),
                        on_click(|event| {
                            event.prevent_default();
                            Msg::NavigateTo(Page::SignIn)
                        }),
                        class("text-ctp-blue hover:underline"),
                    ], [text("Sign in")]),
                ]),
            ]),
        ])
    }

    fn view_workspace(&self) -> Node<Msg> {
        div(
            [class("space-y-6")],
            [
                self.view_banner(),
                if self.loading {
                    div(
                        [class("text-center py-10 text-ctp-subtext0 italic")],
                        [text("Loading...")],
                    )
                } else {
                    match self.store.selected() {
                        Some(project) => self.view_project_detail(project),
                        None => self.view_project_list(),
                    }
                },
            ],
        )
    }

    fn view_project_form(&self) -> Node<Msg> {
        let editing = self.editing_project.is_some();
        div([class("mb-8 p-6 bg-ctp-surface1 rounded-lg border border-ctp-surface2")], [
            h2([class("text-xl font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [
                text(if editing { "Edit Project" } else { "Add New Project" }),
            ]),
            div([class("space-y-4")], [
                input([
                    r#type("text"),
                    placeholder("Project title"),
                    value(&self.project_title),
                    on_input(|event| Msg::SetProjectTitle(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                ], []),
                textarea([
                    placeholder("Project description"),
                    value(&self.project_description),
                    on_input(|event| Msg::SetProjectDescription(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent h-20 resize-y"),
                ], []),
                div([class("flex gap-2")], [
                    button([
                        on_click(|_| Msg::SubmitProject),
                        disabled(self.pending),
                        class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                    ], [text(if editing { "Save Changes" } else { "Add Project" })]),
                    if editing {
                        button([
                            on_click(|_| Msg::CancelProjectEdit),
                            class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                        ], [text("Cancel")])
                    } else {
                        span([], [])
                    },
                ]),
            ]),
        ])
    }

    fn view_project_list(&self) -> Node<Msg> {
        div(
            [],
            [
                self.view_project_form(),
                if self.store.projects().is_empty() {
                    div(
                        [class("text-center py-12")],
                        [
                            div([class("text-ctp-overlay0 text-6xl mb-4")], [text("📁")]),
                            h3(
                                [class("text-lg font-medium text-ctp-text mb-2")],
                                [text("No projects yet")],
                            ),
                            p(
                                [class("text-ctp-subtext0")],
                                [text("Create your first project above to get started!")],
                            ),
                        ],
                    )
                } else {
                    div(
                        [class("grid grid-cols-1 md:grid-cols-2 gap-6")],
                        self.store
                            .projects()
                            .iter()
                            .map(|project| self.view_project_card(project))
                            .collect::<Vec<_>>(),
                    )
                },
            ],
        )
    }

    fn view_project_card(&self, project: &Project) -> Node<Msg> {
        let is_busy = self.busy.contains_key(&project.id);
        let task_count = project.tasks.len();
        let project_id = project.id;
        div(
            [
                key(project.id.to_string()),
                class("bg-ctp-surface0 border border-ctp-surface1 rounded-xl p-6 shadow-sm hover:shadow-lg hover:border-ctp-blue transition-all duration-200"),
            ],
            [
                div([class("flex items-start justify-between mb-2")], [
                    h3([class("text-lg font-semibold text-ctp-text")], [text(&project.title)]),
                    div([class("flex gap-2")], [
                        button([
                            on_click(move |_| Msg::EditProject(project_id)),
                            disabled(is_busy),
                            class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30 transition-colors duration-200"),
                        ], [span([class("text-sm")], [text("✏️")])]),
                        button([
                            on_click(move |_| Msg::DeleteProject(project_id)),
                            disabled(is_busy),
                            class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 transition-colors duration-200"),
                        ], [span([class("text-sm")], [text(if is_busy { "⏳" } else { "🗑️" })])]),
                    ]),
                ]),
                p([class("text-sm text-ctp-subtext1 break-words mb-4")], [text(&project.description)]),
                self.view_progress(project.progress()),
                div([class("flex items-center justify-between mt-4")], [
                    span([class("text-sm text-ctp-subtext0")], [
                        text(&format!("{} task{}", task_count, if task_count == 1 { "" } else { "s" })),
                    ]),
                    button([
                        on_click(move |_| Msg::SelectProject(project_id)),
                        class("bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30 px-3 py-1 rounded-full text-sm font-medium transition-colors duration-200"),
                    ], [text("Open →")]),
                ]),
            ],
        )
    }

    fn view_progress(&self, percentage: u32) -> Node<Msg> {
        div(
            [class("flex items-center gap-3")],
            [
                div(
                    [class("flex-1 bg-ctp-surface2 rounded-full h-2")],
                    [div(
                        [
                            class("bg-ctp-green h-2 rounded-full transition-all duration-500"),
                            attributes::styles([("width", format!("{}%", percentage))]),
                        ],
                        [],
                    )],
                ),
                span(
                    [class("text-sm text-ctp-subtext0")],
                    [text(&format!("{}%", percentage))],
                ),
            ],
        )
    }

    fn view_project_detail(&self, project: &Project) -> Node<Msg> {
        div(
            [],
            [
                button(
                    [
                        on_click(|_| Msg::CloseProject),
                        class("text-sm text-ctp-subtext0 hover:text-ctp-text transition-colors duration-200 mb-4"),
                    ],
                    [text("← Back to projects")],
                ),
                div(
                    [class("bg-ctp-surface0 rounded-lg shadow-lg p-6 border border-ctp-surface1")],
                    [
                        h2(
                            [class("text-2xl font-bold text-ctp-text mb-1")],
                            [text(&project.title)],
                        ),
                        p(
                            [class("text-ctp-subtext1 mb-4 break-words")],
                            [text(&project.description)],
                        ),
                        self.view_progress(project.progress()),
                        div([class("mt-6")], [self.view_task_form()]),
                        if project.tasks.is_empty() {
                            div(
                                [class("text-center py-12")],
                                [
                                    div([class("text-ctp-overlay0 text-6xl mb-4")], [text("✨")]),
                                    h3(
                                        [class("text-lg font-medium text-ctp-text mb-2")],
                                        [text("No tasks yet")],
                                    ),
                                    p(
                                        [class("text-ctp-subtext0")],
                                        [text("Add a task above to start tracking progress!")],
                                    ),
                                ],
                            )
                        } else {
                            div(
                                [class("space-y-4 mt-6")],
                                project
                                    .tasks
                                    .iter()
                                    .map(|task| self.view_task(task))
                                    .collect::<Vec<_>>(),
                            )
                        },
                    ],
                ),
            ],
        )
    }

    fn view_task_form(&self) -> Node<Msg> {
        let editing = self.editing_task.is_some();
        div([class("p-6 bg-ctp-surface1 rounded-lg border border-ctp-surface2")], [
            h3([class("text-lg font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [
                text(if editing { "Edit Task" } else { "Add New Task" }),
            ]),
            div([class("space-y-4")], [
                input([
                    r#type("text"),
                    placeholder("Task title"),
                    value(&self.task_title),
                    on_input(|event| Msg::SetTaskTitle(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                ], []),
                textarea([
                    placeholder("Task description"),
                    value(&self.task_description),
                    on_input(|event| Msg::SetTaskDescription(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent h-20 resize-y"),
                ], []),
                input([
                    r#type("date"),
                    value(&self.task_due_date),
                    on_input(|event| Msg::SetTaskDueDate(event.value())),
                    class("px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
                ], []),
                div([class("flex gap-2")], [
                    button([
                        on_click(|_| Msg::SubmitTask),
                        disabled(self.pending),
                        class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                    ], [text(if editing { "Save Task" } else { "Add Task" })]),
                    if editing {
                        button([
                            on_click(|_| Msg::CancelTaskEdit),
                            class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                        ], [text("Cancel")])
                    } else {
                        span([], [])
                    },
                ]),
            ]),
        ])
    }

    fn view_task(&self, task: &Task) -> Node<Msg> {
        let is_busy = self.busy.contains_key(&task.id);
        let task_id = task.id;
        let due = task.due_date.map(|d| d.to_string());
        div(
            [
                key(task.id.to_string()),
                class(&format!(
                    "border rounded-xl p-5 bg-ctp-surface0 shadow-sm transition-all duration-300 {}",
                    if task.completed {
                        "border-ctp-green bg-ctp-green/10"
                    } else {
                        "border-ctp-surface1 hover:border-ctp-blue"
                    }
                )),
            ],
            [div([class("flex items-start gap-4")], [
                div([class("flex-shrink-0 pt-1")], [
                    input([
                        r#type("checkbox"),
                        checked(task.completed),
                        disabled(is_busy),
                        on_click(move |_| Msg::ToggleTask(task_id)),
                        class("w-5 h-5 accent-ctp-green cursor-pointer"),
                    ], []),
                ]),
                div([class("flex-1 min-w-0")], [
                    h3([class(&format!(
                        "text-lg font-semibold transition-all duration-200 {}",
                        if task.completed {
                            "line-through text-ctp-overlay1"
                        } else {
                            "text-ctp-text"
                        }
                    ))], [
                        if is_busy {
                            text(&format!("{} (updating...)", task.title))
                        } else {
                            text(&task.title)
                        },
                    ]),
                    p([class(&format!(
                        "text-sm leading-relaxed break-words {}",
                        if task.completed {
                            "text-ctp-overlay0 line-through"
                        } else {
                            "text-ctp-subtext1"
                        }
                    ))], [text(&task.description)]),
                    div([class("mt-3 flex gap-2")], [
                        if task.completed {
                            span([class("inline-flex items-center px-2 py-1 rounded-full text-xs font-medium bg-ctp-green/20 text-ctp-green")], [
                                text("Completed"),
                            ])
                        } else {
                            span([class("inline-flex items-center px-2 py-1 rounded-full text-xs font-medium bg-ctp-yellow/20 text-ctp-yellow")], [
                                text("Pending"),
                            ])
                        },
                        match &due {
                            Some(due) => span(
                                [class("inline-flex items-center px-2 py-1 rounded-full text-xs font-medium bg-ctp-mauve/20 text-ctp-mauve")],
                                [text(&format!("Due {}", due))],
                            ),
                            None => span([], []),
                        },
                    ]),
                ]),
                div([class("flex-shrink-0 flex flex-col gap-2")], [
                    if !task.completed {
                        button([
                            on_click(move |_| Msg::EditTask(task_id)),
                            disabled(is_busy),
                            class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30 transition-colors duration-200"),
                        ], [span([class("text-sm")], [text("✏️")])])
                    } else {
                        span([], [])
                    },
                    button([
                        on_click(move |_| Msg::DeleteTask(task_id)),
                        disabled(is_busy),
                        class("inline-flex items-center justify-center w-8 h-8 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 transition-colors duration-200"),
                    ], [span([class("text-sm")], [text(if is_busy { "⏳" } else { "🗑️" })])]),
                ]),
            ])],
        )
    }
}

fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn push_url(path: &str) {
    if let Some(history) = window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path));
    }
}

fn replace_url(path: &str) {
    if let Some(history) = window().and_then(|w| w.history().ok()) {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path));
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::new());
}
