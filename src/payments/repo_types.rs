use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub week_label: String,
    pub gross_amount: Option<f64>,
    pub net_amount: Option<f64>,
    pub is_paid: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Payment with no gross amount yet, joined with the employee's pay terms.
#[derive(Debug, Clone, FromRow)]
pub struct MissingAmountRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub week_label: String,
    pub hourly_rate: f64,
    pub label_type: String,
}

/// Paid payment joined with the employee name, for the dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct PaidPaymentRow {
    pub employee_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gross_amount: Option<f64>,
    pub is_paid: bool,
}
