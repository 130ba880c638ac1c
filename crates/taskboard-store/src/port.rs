//! Async access to task persistence.
//!
//! Handlers depend on [`TaskStore`] rather than on SQLite directly so that
//! tests can swap in stores with scripted behaviour.

use async_trait::async_trait;

use taskboard_core::{NewTask, Task, TaskId, TaskUpdate, WriteOutcome};

use crate::error::StoreError;
use crate::tasks::TaskRepo;

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;
    async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError>;
    async fn create(&self, task: NewTask) -> Result<Task, StoreError>;
    async fn update(&self, id: TaskId, update: TaskUpdate) -> Result<WriteOutcome, StoreError>;
    async fn delete(&self, id: TaskId) -> Result<WriteOutcome, StoreError>;
}

impl TaskRepo {
    /// Run a repo call on the blocking pool so SQLite I/O never stalls
    /// the async workers.
    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&TaskRepo) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let repo = self.clone();
        tokio::task::spawn_blocking(move || f(&repo)).await?
    }
}

#[async_trait]
impl TaskStore for TaskRepo {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        self.blocking(TaskRepo::list_all).await
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        self.blocking(move |repo| TaskRepo::get_by_id(repo, id)).await
    }

    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        self.blocking(move |repo| TaskRepo::create(repo, task)).await
    }

    async fn update(&self, id: TaskId, update: TaskUpdate) -> Result<WriteOutcome, StoreError> {
        self.blocking(move |repo| TaskRepo::update(repo, id, update)).await
    }

    async fn delete(&self, id: TaskId) -> Result<WriteOutcome, StoreError> {
        self.blocking(move |repo| TaskRepo::delete(repo, id)).await
    }
}
