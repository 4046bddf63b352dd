//! Billing persistence port

use async_trait::async_trait;
use tripdesk_domain::{CustomerPayment, Invoice, Result, VendorBill};
use uuid::Uuid;

#[async_trait]
pub trait BillingRepository: Send + Sync {
    async fn find_invoice(&self, id: Uuid) -> Result<Option<Invoice>>;

    async fn payments_for(&self, invoice_id: Uuid) -> Result<Vec<CustomerPayment>>;

    /// Insert the payment and persist the invoice's recomputed balance and
    /// payment status together.
    async fn record_payment(&self, payment: &CustomerPayment, invoice: &Invoice) -> Result<()>;

    /// Bills with the given ids; unknown ids are skipped.
    async fn vendor_bills(&self, ids: &[Uuid]) -> Result<Vec<VendorBill>>;

    async fn update_vendor_bill(&self, bill: &VendorBill) -> Result<()>;
}
