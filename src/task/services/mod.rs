//! Application services for task orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, TaskService, TaskServiceError, TaskServiceResult, UpdateTaskRequest,
};
