use chrono::{DateTime, TimeZone, Utc};
use std::sync::RwLock;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: String,
    title: String,
    description: String,
    completed: bool,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: String,
        title: String,
        description: String,
        completed: bool,
        user_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            completed,
            user_id,
            created_at,
            updated_at: None,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the ID of the owning user. Not checked against any user table.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the task was last updated, or `None` if it never was.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Fields accepted when creating a task.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<String>,
}

/// Fields to merge over an existing task. `None` leaves the field untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub user_id: Option<String>,
}

/// Error type for task store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskStoreError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),
    /// No task exists with the given ID.
    #[error("Task with ID '{0}' not found")]
    NotFound(String),
    /// The store could not complete the operation.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl TaskStoreError {
    fn title_required() -> Self {
        TaskStoreError::Validation("Title is required".to_string())
    }

    fn poisoned() -> Self {
        TaskStoreError::Internal("task store lock poisoned".to_string())
    }
}

/// Storage operations for tasks.
///
/// Every call is atomic with respect to the others: readers never observe a half-applied write.
pub trait TaskRepository: Send + Sync {
    /// Returns all tasks in insertion order.
    fn list(&self) -> Result<Vec<Task>, TaskStoreError>;

    /// Returns the task with the given ID.
    fn get(&self, id: &str) -> Result<Task, TaskStoreError>;

    /// Creates a task, assigning its ID and creation time.
    fn create(&self, new_task: NewTask) -> Result<Task, TaskStoreError>;

    /// Merges `changes` over an existing task and stamps `updated_at`.
    /// The ID and creation time are never changed.
    fn update(&self, id: &str, changes: TaskChanges) -> Result<Task, TaskStoreError>;

    /// Removes a task and returns it.
    fn delete(&self, id: &str) -> Result<Task, TaskStoreError>;
}

/// Process-local task store backed by a vector behind a single lock.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the three demo tasks every fresh process starts with.
    pub fn with_seed_tasks() -> Self {
        Self {
            tasks: RwLock::new(seed_tasks()),
        }
    }
}

impl TaskRepository for InMemoryTaskStore {
    #[tracing::instrument(skip(self))]
    fn list(&self) -> Result<Vec<Task>, TaskStoreError> {
        let tasks = self.tasks.read().map_err(|_| TaskStoreError::poisoned())?;
        Ok(tasks.clone())
    }

    #[tracing::instrument(skip(self))]
    fn get(&self, id: &str) -> Result<Task, TaskStoreError> {
        let tasks = self.tasks.read().map_err(|_| TaskStoreError::poisoned())?;
        tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or_else(|| TaskStoreError::NotFound(id.to_string()))
    }

    #[tracing::instrument(skip(self))]
    fn create(&self, new_task: NewTask) -> Result<Task, TaskStoreError> {
        let title = match new_task.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(TaskStoreError::title_required()),
        };

        let task = Task::new(
            uuid::Uuid::new_v4().to_string(),
            title,
            new_task.description.unwrap_or_default(),
            false,
            new_task.user_id,
            Utc::now(),
        );

        let mut tasks = self.tasks.write().map_err(|_| TaskStoreError::poisoned())?;
        tasks.push(task.clone());
        tracing::debug!("Created task {}", task.id);
        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    fn update(&self, id: &str, changes: TaskChanges) -> Result<Task, TaskStoreError> {
        let mut tasks = self.tasks.write().map_err(|_| TaskStoreError::poisoned())?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskStoreError::NotFound(id.to_string()))?;

        if changes
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(TaskStoreError::title_required());
        }

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }
        if let Some(user_id) = changes.user_id {
            task.user_id = Some(user_id);
        }

        // Clock skew must not move updated_at backwards.
        let now = Utc::now();
        task.updated_at = Some(match task.updated_at {
            Some(previous) if previous > now => previous,
            _ => now,
        });

        Ok(task.clone())
    }

    #[tracing::instrument(skip(self))]
    fn delete(&self, id: &str) -> Result<Task, TaskStoreError> {
        let mut tasks = self.tasks.write().map_err(|_| TaskStoreError::poisoned())?;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskStoreError::NotFound(id.to_string()))?;
        Ok(tasks.remove(index))
    }
}

fn seed_tasks() -> Vec<Task> {
    let at = |month: u32, day: u32, hour: u32, minute: u32| {
        Utc.with_ymd_and_hms(2023, month, day, hour, minute, 0)
            .single()
            .unwrap_or_default()
    };

    vec![
        Task::new(
            "1".to_string(),
            "Learn Next.js 15".to_string(),
            "Study the Next.js 15 documentation".to_string(),
            false,
            Some("user1".to_string()),
            at(10, 15, 10, 0),
        ),
        Task::new(
            "2".to_string(),
            "Build a project".to_string(),
            "Create a task management application".to_string(),
            true,
            Some("user1".to_string()),
            at(10, 16, 14, 30),
        ),
        Task::new(
            "3".to_string(),
            "Learn React Server Components".to_string(),
            "Understand the new paradigm in Next.js 15".to_string(),
            false,
            Some("user1".to_string()),
            at(10, 17, 9, 15),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn seeded_store_lists_three_tasks_in_insertion_order() {
        let store = InMemoryTaskStore::with_seed_tasks();

        let ids: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|task| task.id().to_string())
            .collect();

        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn can_create_task_with_defaults() {
        let store = InMemoryTaskStore::new();

        let task = store.create(new_task("Write docs")).unwrap();

        assert_eq!(task.title(), "Write docs");
        assert_eq!(task.description(), "");
        assert!(!task.completed());
        assert_eq!(task.user_id(), None);
        assert_eq!(task.updated_at(), None);
        assert!(task.created_at() <= Utc::now());
        assert_eq!(store.get(task.id()).unwrap(), task);
    }

    #[test]
    fn rejects_missing_or_blank_title_without_touching_the_store() {
        let store = InMemoryTaskStore::with_seed_tasks();

        for new_task in [NewTask::default(), new_task(""), new_task("   ")] {
            let result = store.create(new_task);
            assert_eq!(result, Err(TaskStoreError::title_required()));
        }

        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn created_ids_are_unique() {
        let store = InMemoryTaskStore::with_seed_tasks();

        for i in 0..100 {
            store.create(new_task(&format!("Task {i}"))).unwrap();
        }

        let tasks = store.list().unwrap();
        let ids: HashSet<&str> = tasks.iter().map(Task::id).collect();
        assert_eq!(ids.len(), 103);
    }

    #[test]
    fn update_merges_fields_and_preserves_identity() {
        let store = InMemoryTaskStore::with_seed_tasks();
        let before = store.get("1").unwrap();

        let updated = store
            .update(
                "1",
                TaskChanges {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(updated.completed());
        assert_eq!(updated.id(), before.id());
        assert_eq!(updated.title(), before.title());
        assert_eq!(updated.description(), before.description());
        assert_eq!(updated.created_at(), before.created_at());
        assert!(updated.updated_at().is_some());
        assert_eq!(store.get("1").unwrap(), updated);
    }

    #[test]
    fn update_never_moves_updated_at_backwards() {
        let store = InMemoryTaskStore::with_seed_tasks();

        let first = store.update("3", TaskChanges::default()).unwrap();
        let second = store
            .update(
                "3",
                TaskChanges {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(second.updated_at() >= first.updated_at());
        assert_eq!(second.title(), "Renamed");
    }

    #[test]
    fn update_of_unknown_id_is_not_found_and_changes_nothing() {
        let store = InMemoryTaskStore::with_seed_tasks();
        let before = store.list().unwrap();

        let result = store.update(
            "missing",
            TaskChanges {
                completed: Some(true),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(TaskStoreError::NotFound("missing".to_string())));
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn update_of_unknown_id_with_blank_title_is_not_found() {
        let store = InMemoryTaskStore::with_seed_tasks();

        let result = store.update(
            "missing",
            TaskChanges {
                title: Some(String::new()),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(TaskStoreError::NotFound("missing".to_string())));
    }

    #[test]
    fn update_rejects_blank_title() {
        let store = InMemoryTaskStore::with_seed_tasks();

        let result = store.update(
            "1",
            TaskChanges {
                title: Some(" ".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(TaskStoreError::title_required()));
        assert_eq!(store.get("1").unwrap().title(), "Learn Next.js 15");
    }

    #[test]
    fn delete_removes_exactly_one_task() {
        let store = InMemoryTaskStore::with_seed_tasks();

        let deleted = store.delete("2").unwrap();

        assert_eq!(deleted.title(), "Build a project");
        assert_eq!(store.list().unwrap().len(), 2);
        assert_eq!(
            store.get("2"),
            Err(TaskStoreError::NotFound("2".to_string()))
        );
        assert_eq!(
            store.delete("2"),
            Err(TaskStoreError::NotFound("2".to_string()))
        );
    }
}
