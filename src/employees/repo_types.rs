use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::payroll::{EmployeeRate, LabelType};

#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hourly_rate: f64,
    pub label_type: String,
    pub workplace: Vec<String>,
    pub status: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hourly_rate: f64,
    pub label_type: LabelType,
    pub workplace: Vec<String>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn rate(&self) -> EmployeeRate {
        EmployeeRate {
            hourly_rate: self.hourly_rate,
            label_type: self.label_type,
        }
    }

    pub fn works_at(&self, site: &str) -> bool {
        self.workplace.iter().any(|w| w.trim().eq_ignore_ascii_case(site.trim()))
    }
}

impl From<EmployeeRow> for Employee {
    fn from(r: EmployeeRow) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
            hourly_rate: r.hourly_rate,
            label_type: LabelType::from_db(&r.label_type),
            workplace: r.workplace,
            status: r.status,
            created_at: r.created_at,
        }
    }
}
