use std::collections::HashMap;

use uuid::Uuid;

use super::dto::{DashboardStats, TopEmployee, UnpaidExpense, UnpaidInvoice};
use crate::{
    expenses::Expense,
    invoices::Invoice,
    payments::repo_types::PaidPaymentRow,
    payroll::{aggregate, top_n, EmployeeRate, HoursEntry},
    tasks::TaskStats,
    week::WeekRange,
};

/// Share of paid gross reported as profit.
pub const PROFIT_RATE: f64 = 0.2;
const TOP_EMPLOYEES: usize = 5;

/// The current week, unless nothing has been paid in it yet; then the most
/// recent week with paid payments.
pub fn choose_week(current: WeekRange, paid_gross: f64, latest_paid: Option<&str>) -> WeekRange {
    if paid_gross > 0.0 {
        return current;
    }
    latest_paid
        .and_then(|label| WeekRange::parse(label).ok())
        .unwrap_or(current)
}

pub struct DashboardInput<'a> {
    pub week: WeekRange,
    pub hours: &'a [HoursEntry],
    pub rates: &'a HashMap<Uuid, EmployeeRate>,
    pub paid: Vec<PaidPaymentRow>,
    pub task_stats: TaskStats,
    pub unpaid_invoices: Vec<Invoice>,
    /// Contract number to site name.
    pub sites: &'a HashMap<String, String>,
    pub unpaid_expenses: Vec<Expense>,
}

pub fn build_stats(input: DashboardInput<'_>) -> DashboardStats {
    let summary = aggregate(input.hours, input.rates);

    let total_paid: f64 = input.paid.iter().filter_map(|p| p.gross_amount).sum();
    let paid_employees_count = input.paid.len();

    let top: Vec<TopEmployee> = input
        .paid
        .into_iter()
        .map(|p| TopEmployee {
            id: p.employee_id,
            name: format!("{} {}", p.first_name, p.last_name),
            gross_amount: p.gross_amount.unwrap_or(0.0),
            is_paid: p.is_paid,
        })
        .collect();

    let unpaid_invoices = input
        .unpaid_invoices
        .into_iter()
        .filter(|inv| !inv.paid && inv.totals.total > 0.0)
        .map(|inv| UnpaidInvoice {
            site_name: input
                .sites
                .get(&inv.contract_number)
                .cloned()
                .unwrap_or_else(|| "-".to_string()),
            invoice_number: inv.invoice_number.unwrap_or_else(|| "-".to_string()),
            total: inv.totals.total,
            contract_number: inv.contract_number,
        })
        .collect();

    let unpaid_expenses = input
        .unpaid_expenses
        .into_iter()
        .filter(|e| !e.paid)
        .map(|e| UnpaidExpense {
            id: e.id,
            date: e.date,
            expense_type: e.expense_type,
            gross: e.gross,
            contract_id: e.contract_id,
            description: e.description,
        })
        .collect();

    DashboardStats {
        this_week: input.week.label(),
        total_hours_this_week: summary.totals.hours,
        total_gross_this_week: summary.totals.gross,
        total_paid,
        total_profit: total_paid * PROFIT_RATE,
        work_hours_by_site: summary.by_site,
        top5_employees: top_n(top, TOP_EMPLOYEES, |t| t.gross_amount),
        paid_employees_count,
        total_employees_with_hours: summary.by_employee.len(),
        task_stats: input.task_stats,
        unpaid_invoices,
        unpaid_expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{invoices::repo_types::InvoiceItem, invoices::services::InvoiceTotals, payroll::LabelType};
    use time::{macros::date, OffsetDateTime};

    fn paid(id: Uuid, name: &str, gross: f64) -> PaidPaymentRow {
        PaidPaymentRow {
            employee_id: id,
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            gross_amount: Some(gross),
            is_paid: true,
        }
    }

    fn invoice(contract: &str, amount: f64, paid: bool) -> Invoice {
        let items = vec![InvoiceItem {
            description: "Labour".into(),
            shifts: None,
            rate: None,
            amount,
        }];
        Invoice {
            id: Uuid::new_v4(),
            contract_number: contract.to_string(),
            invoice_number: None,
            date: None,
            description: None,
            totals: InvoiceTotals::compute(&items, 0.0),
            items,
            other: 0.0,
            paid,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn current_week_kept_when_it_has_paid_gross() {
        let current = WeekRange::containing(date!(2025 - 03 - 12));
        let chosen = choose_week(current, 150.0, Some("2025-02-24 - 2025-03-02"));
        assert_eq!(chosen, current);
    }

    #[test]
    fn falls_back_to_latest_paid_week() {
        let current = WeekRange::containing(date!(2025 - 03 - 12));
        let chosen = choose_week(current, 0.0, Some("2025-02-24 - 2025-03-02"));
        assert_eq!(chosen.label(), "2025-02-24 - 2025-03-02");
        assert_eq!(choose_week(current, 0.0, None), current);
        assert_eq!(choose_week(current, 0.0, Some("garbage")), current);
    }

    #[test]
    fn builds_full_stats() {
        let week = WeekRange::containing(date!(2025 - 03 - 10));
        let ids: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
        let rates: HashMap<Uuid, EmployeeRate> = ids
            .iter()
            .map(|id| (*id, EmployeeRate { hourly_rate: 10.0, label_type: LabelType::Utr }))
            .collect();
        let hours = vec![
            HoursEntry { employee_id: ids[0], hours: 8.0, site: Some("Camden".into()) },
            HoursEntry { employee_id: ids[1], hours: 4.0, site: Some("Barnet".into()) },
            HoursEntry { employee_id: ids[0], hours: 6.0, site: Some("Camden".into()) },
        ];
        let paid_rows = vec![
            paid(ids[0], "A", 140.0),
            paid(ids[1], "B", 40.0),
            paid(ids[2], "C", 300.0),
            paid(ids[3], "D", 20.0),
            paid(ids[4], "E", 90.0),
            paid(ids[5], "F", 10.0),
        ];
        let sites = HashMap::from([("1".to_string(), "Camden".to_string())]);

        let stats = build_stats(DashboardInput {
            week,
            hours: &hours,
            rates: &rates,
            paid: paid_rows,
            task_stats: TaskStats { total_tasks: 3, completed_tasks: 1, ongoing_tasks: 2 },
            unpaid_invoices: vec![invoice("1", 100.0, false), invoice("2", 0.0, false)],
            sites: &sites,
            unpaid_expenses: vec![],
        });

        assert_eq!(stats.this_week, "2025-03-10 - 2025-03-16");
        assert_eq!(stats.total_hours_this_week, 18.0);
        assert_eq!(stats.total_gross_this_week, 180.0);
        assert_eq!(stats.total_paid, 600.0);
        assert!((stats.total_profit - 120.0).abs() < 1e-9);
        assert_eq!(stats.paid_employees_count, 6);
        assert_eq!(stats.total_employees_with_hours, 2);
        assert_eq!(stats.work_hours_by_site.len(), 2);
        assert_eq!(stats.work_hours_by_site[0].site, "Barnet");

        let top: Vec<f64> = stats.top5_employees.iter().map(|t| t.gross_amount).collect();
        assert_eq!(top, vec![300.0, 140.0, 90.0, 40.0, 20.0]);
        assert_eq!(stats.top5_employees[0].name, "C Test");

        assert_eq!(stats.unpaid_invoices.len(), 1);
        assert_eq!(stats.unpaid_invoices[0].site_name, "Camden");
        assert!((stats.unpaid_invoices[0].total - 120.0).abs() < 1e-9);
        assert_eq!(stats.unpaid_invoices[0].invoice_number, "-");
    }

    #[test]
    fn serializes_client_field_names() {
        let stats = build_stats(DashboardInput {
            week: WeekRange::containing(date!(2025 - 03 - 10)),
            hours: &[],
            rates: &HashMap::new(),
            paid: vec![],
            task_stats: TaskStats::default(),
            unpaid_invoices: vec![],
            sites: &HashMap::new(),
            unpaid_expenses: vec![Expense {
                id: Uuid::new_v4(),
                contract_id: None,
                date: date!(2025 - 03 - 11),
                expense_type: "Fuel".into(),
                description: None,
                gross: 55.0,
                net: None,
                paid: false,
                created_at: OffsetDateTime::UNIX_EPOCH,
            }],
        });
        let json = serde_json::to_value(&stats).unwrap();
        for key in [
            "thisWeek",
            "totalHoursThisWeek",
            "totalGrossThisWeek",
            "totalPaid",
            "totalProfit",
            "workHoursBySite",
            "top5Employees",
            "paidEmployeesCount",
            "totalEmployeesWithHours",
            "taskStats",
            "unpaidInvoices",
            "unpaidExpenses",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["unpaidExpenses"][0]["type"], "Fuel");
        assert_eq!(json["unpaidExpenses"][0]["date"], "2025-03-11");
        assert_eq!(json["taskStats"]["totalTasks"], 0);
    }
}
