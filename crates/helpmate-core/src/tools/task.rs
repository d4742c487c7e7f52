use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::{ParamSpec, Tool, ToolArgs};
use crate::error::ToolError;
use crate::task::{parse_due, TaskFilter, TaskPriority, TaskStore};

const PRIORITIES: &[&str] = &["low", "medium", "high"];

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// List tasks, optionally filtered.
pub struct GetTasksTool {
    store: Arc<Mutex<TaskStore>>,
}

impl GetTasksTool {
    pub fn new(store: Arc<Mutex<TaskStore>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetTasksTool {
    fn name(&self) -> &str {
        "GetTasks"
    }

    fn description(&self) -> &str {
        "List the user's tasks. Filter by 'all', 'today', 'pending', 'done' or a priority."
    }

    fn group(&self) -> &str {
        "Tasks"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::string("filter_by", "Which tasks to show")
            .one_of(TaskFilter::NAMES)
            .default_value(json!("all"))]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let name = args.opt_str("filter_by").unwrap_or("all");
        let filter = TaskFilter::parse(name)
            .ok_or_else(|| ToolError::validation(format!("unknown filter '{name}'")))?;
        let tasks = self.store.lock().await.list(filter, today());
        Ok(json!({
            "filter": name,
            "count": tasks.len(),
            "tasks": tasks,
        }))
    }
}

pub struct AddTaskTool {
    store: Arc<Mutex<TaskStore>>,
}

impl AddTaskTool {
    pub fn new(store: Arc<Mutex<TaskStore>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for AddTaskTool {
    fn name(&self) -> &str {
        "AddTask"
    }

    fn description(&self) -> &str {
        "Add a new task to the user's list."
    }

    fn group(&self) -> &str {
        "Tasks"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("task", "What needs to be done"),
            ParamSpec::string("priority", "Task priority")
                .one_of(PRIORITIES)
                .default_value(json!("medium")),
            ParamSpec::string("due", "When it is due: 'today', 'tomorrow', 'none' or YYYY-MM-DD")
                .default_value(json!("today")),
        ]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let description = args.str("task")?;
        let priority_name = args.opt_str("priority").unwrap_or("medium");
        let priority = TaskPriority::parse(priority_name)
            .ok_or_else(|| ToolError::validation(format!("unknown priority '{priority_name}'")))?;
        let due = parse_due(args.opt_str("due").unwrap_or("today"), today())
            .map_err(ToolError::Validation)?;

        let task = self.store.lock().await.add(description, priority, due);
        Ok(json!({ "added": task }))
    }
}

pub struct CompleteTaskTool {
    store: Arc<Mutex<TaskStore>>,
}

impl CompleteTaskTool {
    pub fn new(store: Arc<Mutex<TaskStore>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CompleteTaskTool {
    fn name(&self) -> &str {
        "CompleteTask"
    }

    fn description(&self) -> &str {
        "Mark a task as done by its ID."
    }

    fn group(&self) -> &str {
        "Tasks"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::integer("task_id", "ID of the task to complete").minimum(1.0)]
    }

    async fn invoke(&self, args: &ToolArgs) -> Result<Value, ToolError> {
        let id = args.u64("task_id")?;
        let task = self
            .store
            .lock()
            .await
            .complete(id)
            .ok_or_else(|| ToolError::NotFound(format!("Task with ID {id} not found")))?;
        Ok(json!({ "completed": task }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;

    fn store() -> Arc<Mutex<TaskStore>> {
        Arc::new(Mutex::new(TaskStore::seeded(today())))
    }

    fn args(v: Value) -> ToolArgs {
        ToolArgs::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn add_then_list_shows_new_task() {
        let store = store();
        let added = AddTaskTool::new(store.clone())
            .invoke(&args(json!({"task": "Buy milk", "priority": "high", "due": "tomorrow"})))
            .await
            .unwrap();
        assert_eq!(added["added"]["id"], 4);
        assert_eq!(added["added"]["priority"], "high");

        let listed = GetTasksTool::new(store)
            .invoke(&args(json!({"filter_by": "high"})))
            .await
            .unwrap();
        assert_eq!(listed["count"], 2);
        let descriptions: Vec<&str> = listed["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["description"].as_str().unwrap())
            .collect();
        assert!(descriptions.contains(&"Buy milk"));
    }

    #[tokio::test]
    async fn complete_marks_done() {
        let store = store();
        let out = CompleteTaskTool::new(store.clone())
            .invoke(&args(json!({"task_id": 2})))
            .await
            .unwrap();
        assert_eq!(out["completed"]["completed"], true);

        let done = GetTasksTool::new(store)
            .invoke(&args(json!({"filter_by": "done"})))
            .await
            .unwrap();
        assert_eq!(done["count"], 1);
    }

    #[tokio::test]
    async fn complete_unknown_id_is_not_found() {
        let store = store();
        let err = CompleteTaskTool::new(store.clone())
            .invoke(&args(json!({"task_id": 99})))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::NotFound("Task with ID 99 not found".into()));
        assert_eq!(store.lock().await.list(TaskFilter::Done, today()).len(), 0);
    }

    #[tokio::test]
    async fn capitalised_choices_dispatch() {
        let store = store();
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(GetTasksTool::new(store.clone()))).unwrap();
        registry.register(Box::new(AddTaskTool::new(store.clone()))).unwrap();
        registry.register(Box::new(CompleteTaskTool::new(store))).unwrap();

        let added = registry
            .dispatch("AddTask", json!({"task": "Dentist", "priority": "High"}))
            .await;
        assert!(added.success, "{:?}", added.error_message);
        assert_eq!(added.payload.unwrap()["added"]["priority"], "high");

        let done = registry.dispatch("CompleteTask", json!({"task_id": 2.0})).await;
        assert!(done.success, "{:?}", done.error_message);

        let pending = registry.dispatch("GetTasks", json!({"filter_by": "Pending"})).await;
        assert!(pending.success, "{:?}", pending.error_message);
        let payload = pending.payload.unwrap();
        assert_eq!(payload["filter"], "pending");
        assert_eq!(payload["count"], 3);
    }

    #[tokio::test]
    async fn bad_due_date_rejected() {
        let store = store();
        let err = AddTaskTool::new(store.clone())
            .invoke(&args(json!({"task": "Dentist", "due": "someday"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(store.lock().await.list(TaskFilter::All, today()).len(), 3);
    }
}
