use time::Date;
use uuid::Uuid;

use super::{
    dto::{DayHours, HourData, StructuredHours},
    repo_types::{DayUpsert, WorkHours},
};
use crate::{
    error::ApiError,
    week::{day_key, weekday_from_key, WeekRange},
};

pub const MAX_HOURS_PER_DAY: f64 = 24.0;

/// Groups stored rows into the `employee -> week -> day` map the week grid reads.
pub fn structure(rows: &[WorkHours]) -> StructuredHours {
    let mut out = StructuredHours::new();
    for row in rows {
        out.entry(row.employee_id)
            .or_default()
            .entry(WeekRange::containing(row.date).label())
            .or_default()
            .insert(
                day_key(row.date.weekday()).to_string(),
                DayHours {
                    hours: row.hours,
                    site: row.site.clone(),
                    contract_id: row.contract_id,
                },
            );
    }
    out
}

/// Writes derived from a submitted week grid.
#[derive(Debug, Default, PartialEq)]
pub struct WeekPlan {
    pub upserts: Vec<DayUpsert>,
    pub clears: Vec<(Uuid, Date)>,
}

/// Validates the submitted grid for `week` and turns it into row writes.
/// Only the submitted week is touched. A day with hours needs a site, and a
/// day without hours is cleared.
pub fn plan_week(week: WeekRange, hour_data: &HourData) -> Result<WeekPlan, ApiError> {
    let label = week.label();
    let mut plan = WeekPlan::default();

    for (employee_id, weeks) in hour_data {
        let Some(days) = weeks.get(&label) else {
            continue;
        };
        for (key, entry) in days {
            let weekday = weekday_from_key(key)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown day: {key}")))?;
            let date = week
                .days()
                .find(|d| d.weekday() == weekday)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown day: {key}")))?;

            let hours = entry.hours.unwrap_or(0.0);
            if !hours.is_finite() || !(0.0..=MAX_HOURS_PER_DAY).contains(&hours) {
                return Err(ApiError::bad_request(format!(
                    "Hours must be between 0 and {MAX_HOURS_PER_DAY} (employee {employee_id}, {key})"
                )));
            }
            if hours == 0.0 {
                plan.clears.push((*employee_id, date));
                continue;
            }

            let site = entry
                .site
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ApiError::bad_request(format!(
                        "Choose a site for every day with hours (employee {employee_id}, {key})"
                    ))
                })?;
            plan.upserts.push(DayUpsert {
                employee_id: *employee_id,
                date,
                hours,
                site: site.to_string(),
                contract_id: entry.contract_id,
            });
        }
    }
    Ok(plan)
}
