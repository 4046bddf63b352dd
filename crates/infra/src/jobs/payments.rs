//! `migrate-payments`: flat payment columns on invoices → customer payments.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use tripdesk_common::Clock;
use tripdesk_core::BillingRepository;
use tripdesk_domain::{CustomerPayment, Result as DomainResult, TripDeskError};
use uuid::Uuid;

use super::{JobOptions, JobSummary};
use crate::database::{LegacyPayment, SqliteBillingRepository};

const JOB: &str = "migrate-payments";

pub struct MigratePaymentsJob {
    billing: Arc<SqliteBillingRepository>,
    clock: Arc<dyn Clock>,
}

impl MigratePaymentsJob {
    pub fn new(billing: Arc<SqliteBillingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { billing, clock }
    }

    #[instrument(skip(self))]
    pub async fn run(&self, options: JobOptions) -> DomainResult<JobSummary> {
        let legacy = self.billing.legacy_payments().await?;
        let mut summary = JobSummary::default();

        for payment in legacy {
            summary.processed += 1;
            let record = payment.invoice_id.to_string();
            if let Err(err) = self.migrate_payment(&payment, options, &mut summary).await {
                summary.record_error(JOB, &record, err);
            }
        }

        summary.log(JOB, options);
        Ok(summary)
    }

    async fn migrate_payment(
        &self,
        legacy: &LegacyPayment,
        options: JobOptions,
        summary: &mut JobSummary,
    ) -> DomainResult<()> {
        let Some(mut invoice) = self.billing.find_invoice(legacy.invoice_id).await? else {
            summary.missing_relation += 1;
            return Ok(());
        };
        let mut payments = self.billing.payments_for(invoice.id).await?;

        let already_migrated = match legacy.receipt_number.as_deref() {
            Some(receipt) => self.billing.receipt_exists(receipt).await?,
            // Without a receipt the natural key is "invoice already has payments".
            None => !payments.is_empty(),
        };
        if already_migrated {
            warn!(job = JOB, invoice_number = %invoice.invoice_number, "Payment already migrated, skipping");
            summary.skipped += 1;
            return Ok(());
        }

        let payment = CustomerPayment {
            id: Uuid::new_v4(),
            invoice_id: invoice.id,
            amount: legacy.amount,
            receipt_number: legacy.receipt_number.clone(),
            payment_date: invoice.invoice_date,
            created_at: self.clock.now(),
        };
        payments.push(payment.clone());
        invoice.apply_payments(&payments);
        if invoice.customer_balance_amount < Decimal::ZERO {
            return Err(TripDeskError::Validation(format!(
                "Payment of {} exceeds invoice {} total of {}.",
                legacy.amount, invoice.invoice_number, invoice.total_amount
            )));
        }

        if options.dry_run {
            info!(job = JOB, invoice_number = %invoice.invoice_number, amount = %legacy.amount, "Would migrate payment");
            summary.migrated += 1;
            return Ok(());
        }

        self.billing.record_payment(&payment, &invoice).await?;
        summary.migrated += 1;
        Ok(())
    }
}
