//! Billing service

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;
use tripdesk_common::Clock;
use tripdesk_domain::{CustomerPayment, Invoice, Result, TripDeskError, VendorBill};
use uuid::Uuid;

use super::ports::BillingRepository;

pub struct BillingService {
    billing: Arc<dyn BillingRepository>,
    clock: Arc<dyn Clock>,
}

impl BillingService {
    pub fn new(billing: Arc<dyn BillingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { billing, clock }
    }

    /// Record a customer payment against an invoice.
    ///
    /// The amount must be positive and may not exceed the remaining balance.
    /// Returns the invoice with its recomputed balance and payment status.
    pub async fn record_customer_payment(
        &self,
        invoice_id: Uuid,
        amount: Decimal,
        receipt_number: Option<String>,
        payment_date: NaiveDate,
    ) -> Result<Invoice> {
        if amount <= Decimal::ZERO {
            return Err(TripDeskError::Validation(
                "Payment amount must be greater than zero.".to_string(),
            ));
        }

        let mut invoice = self
            .billing
            .find_invoice(invoice_id)
            .await?
            .ok_or_else(|| TripDeskError::not_found("invoice", invoice_id))?;
        let mut payments = self.billing.payments_for(invoice_id).await?;

        invoice.apply_payments(&payments);
        if amount > invoice.customer_balance_amount {
            return Err(TripDeskError::Validation(format!(
                "Payment of {} exceeds the remaining balance of {}.",
                amount, invoice.customer_balance_amount
            )));
        }

        let payment = CustomerPayment {
            id: Uuid::new_v4(),
            invoice_id,
            amount,
            receipt_number,
            payment_date,
            created_at: self.clock.now(),
        };
        payments.push(payment.clone());
        invoice.apply_payments(&payments);

        self.billing.record_payment(&payment, &invoice).await?;
        info!(
            invoice_id = %invoice_id,
            amount = %amount,
            balance = %invoice.customer_balance_amount,
            status = invoice.customer_payment_status.as_str(),
            "Customer payment recorded"
        );
        Ok(invoice)
    }

    /// Bulk action: mark bills paid on `payment_date`.
    pub async fn mark_vendor_bills_paid(
        &self,
        ids: &[Uuid],
        payment_date: NaiveDate,
    ) -> Result<Vec<VendorBill>> {
        self.toggle_bills(ids, |bill| bill.mark_paid(payment_date)).await
    }

    /// Bulk action: revert bills to pending and clear their payment date.
    pub async fn mark_vendor_bills_pending(&self, ids: &[Uuid]) -> Result<Vec<VendorBill>> {
        self.toggle_bills(ids, VendorBill::mark_pending).await
    }

    async fn toggle_bills<F>(&self, ids: &[Uuid], apply: F) -> Result<Vec<VendorBill>>
    where
        F: Fn(&mut VendorBill),
    {
        let mut bills = self.billing.vendor_bills(ids).await?;
        for bill in &mut bills {
            apply(bill);
            self.billing.update_vendor_bill(bill).await?;
        }
        info!(requested = ids.len(), updated = bills.len(), "Vendor bills updated");
        Ok(bills)
    }
}
