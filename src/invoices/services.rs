use serde::Serialize;

use super::repo_types::InvoiceItem;

pub const VAT_RATE: f64 = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub net: f64,
    pub vat: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// Net is the item sum; VAT applies to the items only and `other` is
    /// added on top.
    pub fn compute(items: &[InvoiceItem], other: f64) -> Self {
        let net: f64 = items.iter().map(|i| i.amount).sum();
        let vat = net * VAT_RATE;
        Self {
            net,
            vat,
            total: net + vat + other,
        }
    }
}

/// Fills in `amount` from shifts and rate where the client left it at zero.
pub fn normalize_items(items: Vec<InvoiceItem>) -> Vec<InvoiceItem> {
    items
        .into_iter()
        .map(|mut item| {
            if item.amount == 0.0 {
                if let (Some(shifts), Some(rate)) = (item.shifts, item.rate) {
                    item.amount = shifts * rate;
                }
            }
            item
        })
        .collect()
}

/// Default invoice number: `<site> - #<n>` where n counts the contract's invoices.
pub fn next_invoice_number(site_name: &str, existing: usize) -> String {
    format!("{} - #{}", site_name.trim(), existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(amount: f64) -> InvoiceItem {
        InvoiceItem {
            description: "Labour".into(),
            shifts: None,
            rate: None,
            amount,
        }
    }

    #[test]
    fn vat_on_items_then_other() {
        let t = InvoiceTotals::compute(&[item(100.0), item(50.0)], 10.0);
        assert!((t.net - 150.0).abs() < 1e-9);
        assert!((t.vat - 30.0).abs() < 1e-9);
        assert!((t.total - 190.0).abs() < 1e-9);
    }

    #[test]
    fn empty_invoice_totals_other_only() {
        let t = InvoiceTotals::compute(&[], 25.0);
        assert_eq!(t.net, 0.0);
        assert_eq!(t.total, 25.0);
    }

    #[test]
    fn amount_from_shifts_and_rate() {
        let items = normalize_items(vec![
            InvoiceItem { description: "Shift".into(), shifts: Some(3.0), rate: Some(120.0), amount: 0.0 },
            InvoiceItem { description: "Fixed".into(), shifts: Some(1.0), rate: Some(5.0), amount: 99.0 },
        ]);
        assert_eq!(items[0].amount, 360.0);
        assert_eq!(items[1].amount, 99.0);
    }

    #[test]
    fn invoice_numbers_count_up() {
        assert_eq!(next_invoice_number("Camden ", 0), "Camden - #1");
        assert_eq!(next_invoice_number("Camden", 4), "Camden - #5");
    }
}
