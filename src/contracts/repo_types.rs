use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum::{AsRefStr, Display, EnumString};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Contract lifecycle states, stored and sent as the literal strings the web
/// client shows.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
pub enum ContractStatus {
    #[serde(rename = "Draft")]
    #[strum(serialize = "Draft")]
    Draft,
    #[serde(rename = "Anulluar")]
    #[strum(serialize = "Anulluar")]
    Cancelled,
    #[default]
    #[serde(rename = "Ne progres")]
    #[strum(serialize = "Ne progres")]
    InProgress,
    #[serde(rename = "Pezulluar")]
    #[strum(serialize = "Pezulluar")]
    Suspended,
    #[serde(rename = "Mbyllur")]
    #[strum(serialize = "Mbyllur")]
    Closed,
    #[serde(rename = "Mbyllur me vonese")]
    #[strum(serialize = "Mbyllur me vonese")]
    ClosedLate,
}

#[derive(Debug, Clone, FromRow)]
pub struct ContractRow {
    pub id: Uuid,
    pub contract_number: String,
    pub company: String,
    pub company_email: Option<String>,
    pub site_name: String,
    pub contract_value: f64,
    pub start_date: Date,
    pub finish_date: Date,
    pub status: String,
    pub closed_manually: bool,
    pub closed_date: Option<OffsetDateTime>,
    pub documents: serde_json::Value,
    pub comments: serde_json::Value,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contract {
    pub id: Uuid,
    pub contract_number: String,
    pub company: String,
    pub company_email: Option<String>,
    pub site_name: String,
    pub contract_value: f64,
    pub start_date: Date,
    pub finish_date: Date,
    pub status: ContractStatus,
    pub closed_manually: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub closed_date: Option<OffsetDateTime>,
    pub documents: serde_json::Value,
    pub comments: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ContractRow> for Contract {
    fn from(r: ContractRow) -> Self {
        Self {
            id: r.id,
            contract_number: r.contract_number,
            company: r.company,
            company_email: r.company_email,
            site_name: r.site_name,
            contract_value: r.contract_value,
            start_date: r.start_date,
            finish_date: r.finish_date,
            status: r.status.parse().unwrap_or_default(),
            closed_manually: r.closed_manually,
            closed_date: r.closed_date,
            documents: r.documents,
            comments: r.comments,
            created_at: r.created_at,
        }
    }
}

/// Result of opening or closing a contract by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closure {
    pub closed_manually: bool,
    pub status: ContractStatus,
    pub closed_date: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_client_literals() {
        assert_eq!(ContractStatus::ClosedLate.as_ref(), "Mbyllur me vonese");
        assert_eq!("Pezulluar".parse::<ContractStatus>().unwrap(), ContractStatus::Suspended);
        assert_eq!(
            serde_json::to_string(&ContractStatus::InProgress).unwrap(),
            "\"Ne progres\""
        );
        let parsed: ContractStatus = serde_json::from_str("\"Anulluar\"").unwrap();
        assert_eq!(parsed, ContractStatus::Cancelled);
        assert!("Open".parse::<ContractStatus>().is_err());
    }
}
