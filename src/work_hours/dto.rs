use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week: Option<String>,
}

/// One day's cell in the week grid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayEntry {
    #[serde(default, deserialize_with = "number_or_string")]
    pub hours: Option<f64>,
    pub site: Option<String>,
    #[serde(alias = "contractId")]
    pub contract_id: Option<Uuid>,
}

/// `employee id -> week label -> day key -> entry`.
pub type HourData = BTreeMap<Uuid, BTreeMap<String, BTreeMap<String, DayEntry>>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWeekRequest {
    pub hour_data: HourData,
    pub week_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWeekResponse {
    pub week: String,
    pub saved: usize,
    pub cleared: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayHours {
    pub hours: f64,
    pub site: String,
    pub contract_id: Option<Uuid>,
}

/// Same shape as [`HourData`], as stored.
pub type StructuredHours = BTreeMap<Uuid, BTreeMap<String, BTreeMap<String, DayHours>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidStatus {
    pub week: String,
    pub employee_id: Uuid,
    pub paid: bool,
}

/// Accepts `8`, `7.5`, `"8"`, `""` and `null`. Blank strings mean no value.
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_accept_numbers_and_strings() {
        let parse = |s: &str| serde_json::from_str::<DayEntry>(s).unwrap().hours;
        assert_eq!(parse(r#"{"hours":8}"#), Some(8.0));
        assert_eq!(parse(r#"{"hours":"7,5"}"#), Some(7.5));
        assert_eq!(parse(r#"{"hours":""}"#), None);
        assert_eq!(parse(r#"{"hours":null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
        assert!(serde_json::from_str::<DayEntry>(r#"{"hours":"lots"}"#).is_err());
    }

    #[test]
    fn submit_body_uses_client_field_names() {
        let id = Uuid::new_v4();
        let body = format!(
            r#"{{"weekLabel":"2025-08-04 - 2025-08-10",
                "hourData":{{"{id}":{{"2025-08-04 - 2025-08-10":{{"E hënë":{{"hours":"8","site":"Camden"}}}}}}}}}}"#
        );
        let req: SubmitWeekRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.week_label, "2025-08-04 - 2025-08-10");
        let day = &req.hour_data[&id]["2025-08-04 - 2025-08-10"]["E hënë"];
        assert_eq!(day.hours, Some(8.0));
        assert_eq!(day.site.as_deref(), Some("Camden"));
    }

    #[test]
    fn paid_status_is_camel_case() {
        let s = PaidStatus { week: "w".into(), employee_id: Uuid::nil(), paid: true };
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("employeeId").is_some());
    }
}
