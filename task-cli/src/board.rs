use crate::task::Task;
use crate::view::{self, Filter, TaskStats};

/// Client-side copy of the task list, kept in step with server responses.
#[derive(Debug, Default, Clone)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replaces the whole list with a fresh server listing.
    pub fn refresh(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Adds a newly created task, keeping everything already on the board.
    pub fn add_created(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replaces the task with the same ID, or adds it if the board has not seen it yet.
    pub fn apply_updated(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    pub fn apply_deleted(&mut self, id: &str) {
        self.tasks.retain(|task| task.id != id);
    }

    /// Tasks matching `filter`, in display order.
    pub fn visible(&self, filter: Filter) -> Vec<Task> {
        let mut tasks = view::filter_tasks(&self.tasks, filter);
        view::sort_for_display(&mut tasks);
        tasks
    }

    /// Stats over the tasks matching `filter`.
    pub fn stats(&self, filter: Filter) -> TaskStats {
        TaskStats::from_tasks(&view::filter_tasks(&self.tasks, filter))
    }
}
