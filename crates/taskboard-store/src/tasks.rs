use chrono::Utc;
use tracing::instrument;

use taskboard_core::{NewTask, Priority, Task, TaskId, TaskStatus, TaskUpdate, WriteOutcome};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

const TASK_COLUMNS: &str = "id, title, description, status, priority, created_at, updated_at";

/// CRUD over the `tasks` table. Every operation is a single statement.
/// No business validation happens here; inputs are already typed.
#[derive(Clone)]
pub struct TaskRepo {
    db: Database,
}

impl TaskRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All tasks, newest first.
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
            ))?;
            let mut rows = stmt.query([])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(row_to_task(row)?);
            }
            Ok(tasks)
        })
    }

    /// Get a task by ID. `None` when no row matches.
    #[instrument(skip(self), fields(task_id = %id))]
    pub fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
            let mut rows = stmt.query([id.as_i64()])?;
            match rows.next()? {
                Some(row) => row_to_task(row).map(Some),
                None => Ok(None),
            }
        })
    }

    /// Insert a new pending task. Both timestamps are set to the same instant.
    #[instrument(skip(self, task), fields(title = %task.title, priority = %task.priority))]
    pub fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let stamp = row_helpers::format_timestamp(&now);
        // Round-trip through the stored precision so the returned value
        // matches what a later read produces.
        let now = row_helpers::parse_timestamp(&stamp, "tasks", "created_at")?;

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, status, priority, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    task.title,
                    task.description,
                    TaskStatus::Pending.as_str(),
                    i64::from(task.priority),
                    stamp,
                    stamp,
                ],
            )?;
            let id = TaskId::new(conn.last_insert_rowid());

            Ok(Task {
                id,
                title: task.title,
                description: task.description,
                status: TaskStatus::Pending,
                priority: task.priority,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Overwrite all mutable fields and bump `updated_at`.
    #[instrument(skip(self, update), fields(task_id = %id, status = %update.status))]
    pub fn update(&self, id: TaskId, update: TaskUpdate) -> Result<WriteOutcome, StoreError> {
        let stamp = row_helpers::format_timestamp(&Utc::now());
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tasks
                 SET title = ?1, description = ?2, status = ?3, priority = ?4, updated_at = ?5
                 WHERE id = ?6",
                rusqlite::params![
                    update.title,
                    update.description,
                    update.status.as_str(),
                    i64::from(update.priority),
                    stamp,
                    id.as_i64(),
                ],
            )?;
            Ok(WriteOutcome {
                id,
                changed: changed > 0,
            })
        })
    }

    /// Hard delete.
    #[instrument(skip(self), fields(task_id = %id))]
    pub fn delete(&self, id: TaskId) -> Result<WriteOutcome, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", [id.as_i64()])?;
            Ok(WriteOutcome {
                id,
                changed: changed > 0,
            })
        })
    }

    /// Number of stored tasks.
    pub fn count(&self) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
                .map_err(StoreError::from)
        })
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> Result<Task, StoreError> {
    let status: String = row_helpers::get(row, 3, "tasks", "status")?;
    let priority: i64 = row_helpers::get(row, 4, "tasks", "priority")?;
    let created_at: String = row_helpers::get(row, 5, "tasks", "created_at")?;
    let updated_at: String = row_helpers::get(row, 6, "tasks", "updated_at")?;

    Ok(Task {
        id: TaskId::new(row_helpers::get(row, 0, "tasks", "id")?),
        title: row_helpers::get(row, 1, "tasks", "title")?,
        description: row_helpers::get(row, 2, "tasks", "description")?,
        status: row_helpers::parse_enum(&status, "tasks", "status")?,
        priority: Priority::try_from(priority).map_err(|detail| StoreError::CorruptRow {
            table: "tasks",
            column: "priority",
            detail,
        })?,
        created_at: row_helpers::parse_timestamp(&created_at, "tasks", "created_at")?,
        updated_at: row_helpers::parse_timestamp(&updated_at, "tasks", "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_repo() -> TaskRepo {
        TaskRepo::new(Database::in_memory().unwrap())
    }

    fn priority(n: i64) -> Priority {
        Priority::try_from(n).unwrap()
    }

    #[test]
    fn create_assigns_id_and_defaults() {
        let repo = test_repo();
        let task = repo.create(NewTask::new("Buy milk")).unwrap();
        assert!(task.id.as_i64() > 0);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority.get(), 1);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn create_then_get_roundtrips() {
        let repo = test_repo();
        let created = repo
            .create(
                NewTask::new("Book dentist")
                    .with_description("before Friday")
                    .with_priority(priority(3)),
            )
            .unwrap();

        let fetched = repo.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Book dentist");
        assert_eq!(fetched.description.as_deref(), Some("before Friday"));
        assert_eq!(fetched.priority.get(), 3);
    }

    #[test]
    fn ids_are_unique() {
        let repo = test_repo();
        let a = repo.create(NewTask::new("a")).unwrap();
        let b = repo.create(NewTask::new("b")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn get_missing_is_none() {
        let repo = test_repo();
        assert!(repo.get_by_id(TaskId::new(999)).unwrap().is_none());
    }

    #[test]
    fn list_empty() {
        assert!(test_repo().list_all().unwrap().is_empty());
    }

    #[test]
    fn list_newest_first() {
        let repo = test_repo();
        let first = repo.create(NewTask::new("first")).unwrap();
        let second = repo.create(NewTask::new("second")).unwrap();
        let third = repo.create(NewTask::new("third")).unwrap();

        let ids: Vec<TaskId> = repo.list_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn list_includes_every_created_task() {
        let repo = test_repo();
        let created: Vec<Task> = (0..5)
            .map(|i| repo.create(NewTask::new(format!("task {i}"))).unwrap())
            .collect();
        let listed = repo.list_all().unwrap();
        assert_eq!(listed.len(), created.len());
        for task in &created {
            assert!(listed.iter().any(|t| t.id == task.id));
        }
        assert_eq!(repo.count().unwrap(), 5);
    }

    #[test]
    fn update_overwrites_fields_and_keeps_created_at() {
        let repo = test_repo();
        let task = repo
            .create(NewTask::new("draft").with_description("v1"))
            .unwrap();

        let outcome = repo
            .update(
                task.id,
                TaskUpdate {
                    title: "final".into(),
                    description: None,
                    status: TaskStatus::Completed,
                    priority: priority(2),
                },
            )
            .unwrap();
        assert_eq!(outcome, WriteOutcome { id: task.id, changed: true });

        let updated = repo.get_by_id(task.id).unwrap().unwrap();
        assert_eq!(updated.title, "final");
        assert_eq!(updated.description, None);
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.priority.get(), 2);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[test]
    fn update_missing_reports_unchanged() {
        let repo = test_repo();
        let outcome = repo
            .update(
                TaskId::new(42),
                TaskUpdate {
                    title: "ghost".into(),
                    description: None,
                    status: TaskStatus::Pending,
                    priority: Priority::default(),
                },
            )
            .unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.id, TaskId::new(42));
    }

    #[test]
    fn delete_then_get_is_none() {
        let repo = test_repo();
        let task = repo.create(NewTask::new("temporary")).unwrap();
        assert!(repo.delete(task.id).unwrap().changed);
        assert!(repo.get_by_id(task.id).unwrap().is_none());
        assert!(!repo.delete(task.id).unwrap().changed);
    }

    #[test]
    fn corrupt_timestamp_surfaces_as_error() {
        let db = Database::in_memory().unwrap();
        let repo = TaskRepo::new(db.clone());
        let task = repo.create(NewTask::new("ok")).unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE tasks SET created_at = 'not a date' WHERE id = ?1",
                [task.id.as_i64()],
            )?;
            Ok(())
        })
        .unwrap();

        let err = repo.get_by_id(task.id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::CorruptRow { column: "created_at", .. }
        ));
    }
}
