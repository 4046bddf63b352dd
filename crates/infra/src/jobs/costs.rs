//! `migrate-costs`: cost sheet rows → invoices with vendor bills.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use tripdesk_common::Clock;
use tripdesk_domain::{
    Invoice, Result as DomainResult, ServiceKind, VendorBill, VendorPaymentStatus, Vocabulary,
};
use uuid::Uuid;

use super::{JobOptions, JobSummary};
use crate::database::{LegacyCostRow, SqliteBillingRepository, SqliteLeadRepository};

const JOB: &str = "migrate-costs";

pub struct MigrateCostsJob {
    billing: Arc<SqliteBillingRepository>,
    leads: Arc<SqliteLeadRepository>,
    clock: Arc<dyn Clock>,
}

impl MigrateCostsJob {
    pub fn new(
        billing: Arc<SqliteBillingRepository>,
        leads: Arc<SqliteLeadRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { billing, leads, clock }
    }

    /// Rows sharing an invoice number become one invoice; each row with a
    /// vendor and a cost becomes a vendor bill on it.
    #[instrument(skip(self))]
    pub async fn run(&self, options: JobOptions) -> DomainResult<JobSummary> {
        let rows = self.billing.legacy_costs().await?;
        let mut summary = JobSummary::default();

        for group in group_by_invoice(rows) {
            summary.processed += 1;
            let number = group[0].invoice_number.clone();
            if let Err(err) = self.migrate_invoice(&group, options, &mut summary).await {
                summary.record_error(JOB, &number, err);
            }
        }

        summary.log(JOB, options);
        Ok(summary)
    }

    async fn migrate_invoice(
        &self,
        group: &[LegacyCostRow],
        options: JobOptions,
        summary: &mut JobSummary,
    ) -> DomainResult<()> {
        let first = &group[0];
        if self.billing.find_invoice_by_number(&first.invoice_number).await?.is_some() {
            warn!(job = JOB, invoice_number = %first.invoice_number, "Invoice already migrated, skipping");
            summary.skipped += 1;
            return Ok(());
        }

        let Some(lead) = self.leads.find_by_reference(&first.lead_reference).await? else {
            warn!(
                job = JOB,
                invoice_number = %first.invoice_number,
                lead_reference = %first.lead_reference,
                "No lead for cost rows, skipping"
            );
            summary.missing_relation += 1;
            return Ok(());
        };

        let mut invoice =
            Invoice::new(lead.id, &first.invoice_number, first.invoice_date, first.selling_price);
        invoice.created_at = self.clock.now();
        let bills: Vec<VendorBill> =
            group.iter().filter_map(|row| vendor_bill(invoice.id, row)).collect();

        if options.dry_run {
            info!(
                job = JOB,
                invoice_number = %invoice.invoice_number,
                vendor_bills = bills.len(),
                "Would migrate invoice"
            );
            summary.migrated += 1;
            return Ok(());
        }

        self.billing.insert_invoice_with_bills(&invoice, &bills).await?;
        summary.migrated += 1;
        Ok(())
    }
}

/// Group rows by invoice number, keeping first-seen order.
fn group_by_invoice(rows: Vec<LegacyCostRow>) -> Vec<Vec<LegacyCostRow>> {
    let mut groups: Vec<Vec<LegacyCostRow>> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|group| group[0].invoice_number == row.invoice_number) {
            Some(group) => group.push(row),
            None => groups.push(vec![row]),
        }
    }
    groups
}

fn vendor_bill(invoice_id: Uuid, row: &LegacyCostRow) -> Option<VendorBill> {
    let vendor_name = row.vendor_name.as_deref().map(str::trim).filter(|name| !name.is_empty())?;
    let amount = row.cost_amount?;
    let (payment_status, payment_date) = if row.vendor_paid {
        (VendorPaymentStatus::Paid, Some(row.invoice_date))
    } else {
        (VendorPaymentStatus::Pending, None)
    };

    Some(VendorBill {
        id: Uuid::new_v4(),
        invoice_id,
        vendor_name: vendor_name.to_string(),
        service: row.service.as_deref().and_then(ServiceKind::from_key),
        amount,
        payment_status,
        payment_date,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    fn row(number: &str, vendor: Option<&str>, cost: Option<rust_decimal::Decimal>) -> LegacyCostRow {
        LegacyCostRow {
            lead_reference: "LD-20240501-AAAA".into(),
            invoice_number: number.into(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            selling_price: dec!(1200),
            vendor_name: vendor.map(str::to_string),
            service: Some("hotel".into()),
            cost_amount: cost,
            vendor_paid: false,
        }
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let groups = group_by_invoice(vec![
            row("INV-2", None, None),
            row("INV-1", None, None),
            row("INV-2", None, None),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].invoice_number, "INV-2");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1][0].invoice_number, "INV-1");
    }

    #[test]
    fn rows_without_vendor_or_cost_yield_no_bill() {
        let invoice_id = Uuid::new_v4();
        assert!(vendor_bill(invoice_id, &row("INV-1", None, Some(dec!(10)))).is_none());
        assert!(vendor_bill(invoice_id, &row("INV-1", Some("  "), Some(dec!(10)))).is_none());
        assert!(vendor_bill(invoice_id, &row("INV-1", Some("Hotel Sea"), None)).is_none());

        let bill = vendor_bill(invoice_id, &row("INV-1", Some("Hotel Sea"), Some(dec!(800)))).unwrap();
        assert_eq!(bill.service, Some(ServiceKind::Hotel));
        assert_eq!(bill.payment_status, VendorPaymentStatus::Pending);
        assert_eq!(bill.payment_date, None);
    }

    #[test]
    fn paid_rows_carry_the_invoice_date() {
        let mut paid = row("INV-1", Some("Air Co"), Some(dec!(300)));
        paid.vendor_paid = true;
        paid.service = Some("cruise".into());

        let bill = vendor_bill(Uuid::new_v4(), &paid).unwrap();
        assert_eq!(bill.payment_status, VendorPaymentStatus::Paid);
        assert_eq!(bill.payment_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(bill.service, None);
    }
}
