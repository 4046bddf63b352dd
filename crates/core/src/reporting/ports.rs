//! Reporting read port
//!
//! Aggregates are scoped to an inclusive day range: leads and calls by
//! creation date, invoices by invoice date. Soft-deleted leads never count.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tripdesk_domain::{CallStatus, DateSpan, ReportFilters, Result};

#[async_trait]
pub trait ReportingRepository: Send + Sync {
    /// Lead counts keyed by stored status text.
    async fn lead_status_counts(
        &self,
        range: DateSpan,
        filters: &ReportFilters,
    ) -> Result<BTreeMap<String, u64>>;

    /// Sum of `total_amount` over `paid` invoices of matching leads.
    async fn paid_revenue(&self, range: DateSpan, filters: &ReportFilters) -> Result<Decimal>;

    async fn call_status_counts(
        &self,
        range: DateSpan,
        filters: &ReportFilters,
    ) -> Result<BTreeMap<CallStatus, u64>>;
}
