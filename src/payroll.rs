use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Worker tax classification. Decides which share of gross pay the worker keeps.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
pub enum LabelType {
    #[serde(rename = "NI", alias = "ni")]
    #[strum(serialize = "NI", ascii_case_insensitive)]
    Ni,
    #[default]
    #[serde(rename = "UTR", alias = "utr")]
    #[strum(serialize = "UTR", ascii_case_insensitive)]
    Utr,
}

impl LabelType {
    pub fn net_ratio(self) -> f64 {
        match self {
            LabelType::Utr => 0.8,
            LabelType::Ni => 0.7,
        }
    }

    /// Unknown stored values fall back to UTR, the classification new
    /// employees get.
    pub fn from_db(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayBreakdown {
    pub hours: f64,
    pub gross: f64,
    pub deduction: f64,
    pub net: f64,
}

impl PayBreakdown {
    pub fn compute(hours: f64, hourly_rate: f64, label_type: LabelType) -> Self {
        Self::from_gross(hours, hours * hourly_rate, label_type)
    }

    pub fn from_gross(hours: f64, gross: f64, label_type: LabelType) -> Self {
        let net = gross * label_type.net_ratio();
        Self {
            hours,
            gross,
            deduction: gross - net,
            net,
        }
    }

    fn add(&mut self, other: PayBreakdown) {
        self.hours += other.hours;
        self.gross += other.gross;
        self.deduction += other.deduction;
        self.net += other.net;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmployeeRate {
    pub hourly_rate: f64,
    pub label_type: LabelType,
}

#[derive(Debug, Clone)]
pub struct HoursEntry {
    pub employee_id: Uuid,
    pub hours: f64,
    pub site: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePay {
    pub employee_id: Uuid,
    #[serde(flatten)]
    pub pay: PayBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteHours {
    pub site: String,
    pub hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub totals: PayBreakdown,
    pub by_employee: Vec<EmployeePay>,
    pub by_site: Vec<SiteHours>,
}

/// Sums hours and pay over `entries`. Employees without a known rate still
/// contribute hours, at a rate of zero. `by_employee` keeps first-seen order,
/// `by_site` is ordered by site name.
pub fn aggregate(entries: &[HoursEntry], rates: &HashMap<Uuid, EmployeeRate>) -> PayrollSummary {
    let mut totals = PayBreakdown::default();
    let mut by_employee: Vec<EmployeePay> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut by_site: BTreeMap<String, f64> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.hours > 0.0) {
        let rate = rates.get(&entry.employee_id).copied().unwrap_or(EmployeeRate {
            hourly_rate: 0.0,
            label_type: LabelType::default(),
        });
        let pay = PayBreakdown::compute(entry.hours, rate.hourly_rate, rate.label_type);
        totals.add(pay);

        let slot = *index.entry(entry.employee_id).or_insert_with(|| {
            by_employee.push(EmployeePay {
                employee_id: entry.employee_id,
                pay: PayBreakdown::default(),
            });
            by_employee.len() - 1
        });
        by_employee[slot].pay.add(pay);

        if let Some(site) = entry.site.as_deref().filter(|s| !s.trim().is_empty()) {
            *by_site.entry(site.to_string()).or_default() += entry.hours;
        }
    }

    PayrollSummary {
        totals,
        by_employee,
        by_site: by_site
            .into_iter()
            .map(|(site, hours)| SiteHours { site, hours })
            .collect(),
    }
}

/// The `n` items with the highest `key`, highest first. Ties keep input order.
pub fn top_n<T, F>(mut items: Vec<T>, n: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| key(b).total_cmp(&key(a)));
    items.truncate(n);
    items
}
