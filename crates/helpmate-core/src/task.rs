use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

/// Priority level.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A single to-do item.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub priority: TaskPriority,
    pub due: Option<NaiveDate>,
    pub completed: bool,
}

/// Selection applied by [`TaskStore::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Today,
    Pending,
    Done,
    Priority(TaskPriority),
}

impl TaskFilter {
    pub const NAMES: &'static [&'static str] =
        &["all", "today", "pending", "done", "high", "medium", "low"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "today" => Some(Self::Today),
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            other => TaskPriority::parse(other).map(Self::Priority),
        }
    }

    fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Today => task.due == Some(today),
            TaskFilter::Pending => !task.completed,
            TaskFilter::Done => task.completed,
            TaskFilter::Priority(p) => task.priority == *p,
        }
    }
}

/// Resolve a due-date phrase: `today`, `tomorrow`, `none`, or `YYYY-MM-DD`.
///
/// Returns `Err` for anything else; `Ok(None)` means "no due date".
pub fn parse_due(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    match input.trim().to_lowercase().as_str() {
        "" | "none" => Ok(None),
        "today" => Ok(Some(today)),
        "tomorrow" => Ok(today.checked_add_days(Days::new(1))),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                format!("due date '{input}' must be 'today', 'tomorrow', 'none' or YYYY-MM-DD")
            }),
    }
}

/// In-memory task list. Nothing is persisted; a fresh store is built at
/// startup and shared by reference behind a mutex.
///
/// Ids are assigned from a counter that only moves forward, so an id is
/// never reused even though tasks cannot be deleted today.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Store seeded with the starter tasks, dated relative to the local day.
    pub fn new() -> Self {
        Self::seeded(Local::now().date_naive())
    }

    pub fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn seeded(today: NaiveDate) -> Self {
        let tomorrow = today.checked_add_days(Days::new(1));
        let mut store = Self::empty();
        store.add("Review quarterly report", TaskPriority::High, Some(today));
        store.add("Team standup meeting", TaskPriority::Medium, Some(today));
        store.add("Update project documentation", TaskPriority::Low, tomorrow);
        store
    }

    pub fn add(&mut self, description: &str, priority: TaskPriority, due: Option<NaiveDate>) -> Task {
        let task = Task {
            id: self.next_id,
            description: description.to_string(),
            priority,
            due,
            completed: false,
        };
        self.next_id += 1;
        self.tasks.push(task.clone());
        task
    }

    pub fn list(&self, filter: TaskFilter, today: NaiveDate) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| filter.matches(t, today))
            .cloned()
            .collect()
    }

    /// Mark a task done. Returns `None` (and changes nothing) for unknown ids.
    pub fn complete(&mut self, id: u64) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = true;
        Some(task.clone())
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
