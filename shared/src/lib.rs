pub mod api;
pub mod error;
pub mod local;
pub mod session;
pub mod storage;
pub mod store;
mod types;

pub use error::ApiError;
pub use types::{
    CreateProjectRequest, CreateTaskRequest, LoginRequest, LoginResponse, Project,
    RegisterRequest, RegisterResponse, Session, Task, UpdateProjectRequest, UpdateTaskRequest,
    UserInfo,
};
