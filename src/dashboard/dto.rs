use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::{payroll::SiteHours, tasks::TaskStats};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopEmployee {
    pub id: Uuid,
    pub name: String,
    pub gross_amount: f64,
    pub is_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpaidInvoice {
    pub contract_number: String,
    pub invoice_number: String,
    pub total: f64,
    pub site_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpaidExpense {
    pub id: Uuid,
    pub date: Date,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub gross: f64,
    pub contract_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub this_week: String,
    pub total_hours_this_week: f64,
    pub total_gross_this_week: f64,
    pub total_paid: f64,
    pub total_profit: f64,
    pub work_hours_by_site: Vec<SiteHours>,
    pub top5_employees: Vec<TopEmployee>,
    pub paid_employees_count: usize,
    pub total_employees_with_hours: usize,
    pub task_stats: TaskStats,
    pub unpaid_invoices: Vec<UnpaidInvoice>,
    pub unpaid_expenses: Vec<UnpaidExpense>,
}
