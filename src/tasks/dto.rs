use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::TaskStatus;

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    #[serde(rename = "assignedTo", alias = "assigned_to")]
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub assigned_to: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub site_name: Option<String>,
    pub due_date: Option<Date>,
}

impl CreateTaskRequest {
    /// The client often sends only a description; it doubles as the title.
    pub fn title(&self) -> Option<&str> {
        [self.title.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub assigned_to: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub site_name: Option<String>,
    pub due_date: Option<Date>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub ongoing_tasks: usize,
}
