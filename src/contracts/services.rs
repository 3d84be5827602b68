use time::{Date, OffsetDateTime};

use super::repo_types::{Closure, ContractStatus};

/// Next free contract number: one past the highest numeric number in use.
/// Non-numeric numbers are ignored.
pub fn next_contract_number<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let max = existing
        .into_iter()
        .filter_map(|n| n.trim().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    max.saturating_add(1).to_string()
}

/// Flips the manual-close flag. A contract closed after its finish date is
/// marked as closed late.
pub fn toggle_closure(closed_manually: bool, finish_date: Date, now: OffsetDateTime) -> Closure {
    if closed_manually {
        Closure {
            closed_manually: false,
            status: ContractStatus::InProgress,
            closed_date: None,
        }
    } else {
        let status = if now.date() > finish_date {
            ContractStatus::ClosedLate
        } else {
            ContractStatus::Closed
        };
        Closure {
            closed_manually: true,
            status,
            closed_date: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn next_number_starts_at_one() {
        assert_eq!(next_contract_number(Vec::<&str>::new()), "1");
    }

    #[test]
    fn next_number_skips_non_numeric() {
        assert_eq!(next_contract_number(["3", "12", "draft-7", " 9 "]), "13");
    }

    #[test]
    fn next_number_does_not_overflow() {
        assert_eq!(
            next_contract_number(["18446744073709551615", "4"]),
            "18446744073709551615"
        );
    }

    #[test]
    fn closing_on_time() {
        let now = datetime!(2025-03-01 10:00 UTC);
        let c = toggle_closure(false, date!(2025 - 03 - 01), now);
        assert!(c.closed_manually);
        assert_eq!(c.status, ContractStatus::Closed);
        assert_eq!(c.closed_date, Some(now));
    }

    #[test]
    fn closing_late() {
        let c = toggle_closure(false, date!(2025 - 02 - 28), datetime!(2025-03-01 0:00 UTC));
        assert_eq!(c.status, ContractStatus::ClosedLate);
    }

    #[test]
    fn reopening_clears_close_date() {
        let c = toggle_closure(true, date!(2025 - 02 - 28), datetime!(2025-03-01 0:00 UTC));
        assert!(!c.closed_manually);
        assert_eq!(c.status, ContractStatus::InProgress);
        assert_eq!(c.closed_date, None);
    }
}
