use tracing::info;

use taskboard_core::{NewTask, Priority, Task};

use crate::error::StoreError;
use crate::tasks::TaskRepo;

/// Sample tasks as `(title, description, priority)`.
pub const SAMPLE_TASKS: &[(&str, &str, i64)] = &[
    ("Write shopping list", "List this week's groceries", 2),
    ("Clean the flat", "Living room and bedroom", 1),
    ("Book a check-up", "Call the clinic for next month's appointment", 3),
];

/// Insert the sample tasks through the normal create path.
pub fn seed_sample_tasks(repo: &TaskRepo) -> Result<Vec<Task>, StoreError> {
    SAMPLE_TASKS
        .iter()
        .map(|&(title, description, priority)| {
            let priority = Priority::try_from(priority).unwrap_or_default();
            let task = repo.create(
                NewTask::new(title)
                    .with_description(description)
                    .with_priority(priority),
            )?;
            info!(task_id = %task.id, title = %task.title, "seeded task");
            Ok(task)
        })
        .collect()
}
