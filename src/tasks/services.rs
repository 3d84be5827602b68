use uuid::Uuid;

use super::{
    dto::TaskStats,
    repo_types::{Task, TaskStatus},
};
use crate::{employees::Employee, error::ApiError};

/// Who gets a new task: the named employee, or everyone working at the site.
pub fn receivers(
    assigned_to: Option<Uuid>,
    site_name: Option<&str>,
    employees: &[Employee],
) -> Result<Vec<Uuid>, ApiError> {
    if let Some(id) = assigned_to {
        return Ok(vec![id]);
    }
    let site = site_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Choose an employee or a site"))?;
    let ids: Vec<Uuid> = employees
        .iter()
        .filter(|e| e.works_at(site))
        .map(|e| e.id)
        .collect();
    if ids.is_empty() {
        return Err(ApiError::bad_request(format!("No employees work at {site}")));
    }
    Ok(ids)
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    TaskStats {
        total_tasks: tasks.len(),
        completed_tasks: completed,
        ongoing_tasks: tasks.len() - completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::LabelType;
    use time::OffsetDateTime;

    fn employee(sites: &[&str]) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            first_name: "Ilir".into(),
            last_name: "Krasniqi".into(),
            email: None,
            phone: None,
            hourly_rate: 15.0,
            label_type: LabelType::Utr,
            workplace: sites.iter().map(|s| s.to_string()).collect(),
            status: "active".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            assigned_to: Uuid::new_v4(),
            assigned_by: None,
            title: "t".into(),
            description: None,
            status,
            site_name: None,
            due_date: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn explicit_assignee_wins() {
        let id = Uuid::new_v4();
        assert_eq!(receivers(Some(id), Some("Camden"), &[]).unwrap(), vec![id]);
    }

    #[test]
    fn site_fans_out_to_its_workers() {
        let a = employee(&["Camden", "Barnet"]);
        let b = employee(&["Barnet"]);
        let c = employee(&["Camden"]);
        let got = receivers(None, Some("Camden"), &[a.clone(), b, c.clone()]).unwrap();
        assert_eq!(got, vec![a.id, c.id]);
    }

    #[test]
    fn nobody_to_assign() {
        assert!(receivers(None, None, &[]).is_err());
        assert!(receivers(None, Some("Nowhere"), &[employee(&["Camden"])]).is_err());
    }

    #[test]
    fn counts_tasks() {
        let tasks = vec![
            task(TaskStatus::Completed),
            task(TaskStatus::Ongoing),
            task(TaskStatus::Ongoing),
        ];
        assert_eq!(
            stats(&tasks),
            TaskStats { total_tasks: 3, completed_tasks: 1, ongoing_tasks: 2 }
        );
    }
}
