use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::payroll::HoursEntry;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkHours {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub date: Date,
    pub hours: f64,
    pub site: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&WorkHours> for HoursEntry {
    fn from(w: &WorkHours) -> Self {
        HoursEntry {
            employee_id: w.employee_id,
            hours: w.hours,
            site: Some(w.site.clone()),
        }
    }
}

/// One day to write for an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct DayUpsert {
    pub employee_id: Uuid,
    pub date: Date,
    pub hours: f64,
    pub site: String,
    pub contract_id: Option<Uuid>,
}
