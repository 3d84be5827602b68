use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub contract_id: Option<Uuid>,
    pub date: Date,
    pub expense_type: String,
    pub description: Option<String>,
    pub gross: f64,
    pub net: Option<f64>,
    pub paid: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
