pub mod errors;
pub mod task;
pub mod validation;

pub use errors::ValidationError;
pub use task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus, TaskUpdate, WriteOutcome};
