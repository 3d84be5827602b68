use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum::{AsRefStr, Display, EnumString};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TaskStatus {
    #[default]
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub assigned_to: Uuid,
    pub assigned_by: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub site_name: Option<String>,
    pub due_date: Option<Date>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub assigned_to: Uuid,
    pub assigned_by: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub site_name: Option<String>,
    pub due_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<TaskRow> for Task {
    fn from(r: TaskRow) -> Self {
        Self {
            id: r.id,
            assigned_to: r.assigned_to,
            assigned_by: r.assigned_by,
            title: r.title,
            description: r.description,
            status: r.status.parse().unwrap_or_default(),
            site_name: r.site_name,
            due_date: r.due_date,
            created_at: r.created_at,
        }
    }
}
