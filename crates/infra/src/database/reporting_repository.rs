//! SQLite-backed dashboard aggregates.
//!
//! Leads and calls are scoped by the UTC date of `created_at`, invoices by
//! `invoice_date`. Filters always apply to the owning lead.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::ToSql;
use rust_decimal::Decimal;
use tripdesk_core::ReportingRepository;
use tripdesk_domain::{
    CallStatus, DateSpan, ReportFilters, Result as DomainResult, TripDeskError, Vocabulary,
};

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

pub struct SqliteReportingRepository {
    db: Arc<DbManager>,
}

impl SqliteReportingRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Run a two-column `(key, value)` query with the range bound to `?1`/`?2`
    /// and the lead filters bound after them.
    async fn pairs(
        &self,
        sql: String,
        range: DateSpan,
        filters: LeadFilter,
    ) -> DomainResult<Vec<(String, String)>> {
        self.db
            .with_connection(move |conn| {
                let mut bound: Vec<String> =
                    vec![codec::date_text(range.start), codec::date_text(range.end)];
                bound.extend(filters.values);
                let params: Vec<&dyn ToSql> = bound.iter().map(|v| v as &dyn ToSql).collect();

                let mut stmt = conn.prepare(&sql).map_err(to_domain)?;
                stmt.query_map(&params, |row| {
                    let key: String = row.get(0)?;
                    let value: rusqlite::types::Value = row.get(1)?;
                    Ok((key, value_text(value)))
                })
                .map_err(to_domain)
            })
            .await
    }
}

#[async_trait]
impl ReportingRepository for SqliteReportingRepository {
    async fn lead_status_counts(
        &self,
        range: DateSpan,
        filters: &ReportFilters,
    ) -> DomainResult<BTreeMap<String, u64>> {
        let filter = LeadFilter::new(filters, 3);
        let sql = format!(
            "SELECT l.status, COUNT(*) FROM leads l
             WHERE l.deleted_at IS NULL
               AND substr(l.created_at, 1, 10) BETWEEN ?1 AND ?2{}
             GROUP BY l.status",
            filter.clause
        );
        self.pairs(sql, range, filter).await?.into_iter().map(|(k, v)| Ok((k, count(&v)?))).collect()
    }

    async fn paid_revenue(&self, range: DateSpan, filters: &ReportFilters) -> DomainResult<Decimal> {
        let filter = LeadFilter::new(filters, 3);
        let sql = format!(
            "SELECT i.id, i.total_amount FROM invoices i
             JOIN leads l ON l.id = i.lead_id
             WHERE i.status = 'paid'
               AND l.deleted_at IS NULL
               AND i.invoice_date BETWEEN ?1 AND ?2{}",
            filter.clause
        );
        let rows = self.pairs(sql, range, filter).await?;
        rows.into_iter().try_fold(Decimal::ZERO, |sum, (id, amount)| {
            Decimal::from_str(&amount).map(|amount| sum + amount).map_err(|err| {
                TripDeskError::Database(format!("invoice {id} has an invalid total_amount: {err}"))
            })
        })
    }

    async fn call_status_counts(
        &self,
        range: DateSpan,
        filters: &ReportFilters,
    ) -> DomainResult<BTreeMap<CallStatus, u64>> {
        let filter = LeadFilter::new(filters, 3);
        let sql = format!(
            "SELECT c.status, COUNT(*) FROM call_center_calls c
             JOIN leads l ON l.id = c.lead_id
             WHERE l.deleted_at IS NULL
               AND substr(c.created_at, 1, 10) BETWEEN ?1 AND ?2{}
             GROUP BY c.status",
            filter.clause
        );
        let mut counts = BTreeMap::new();
        for (key, value) in self.pairs(sql, range, filter).await? {
            if let Some(status) = CallStatus::from_key(&key) {
                counts.insert(status, count(&value)?);
            }
        }
        Ok(counts)
    }
}

/// `AND ...` conditions on alias `l` plus their bound values.
struct LeadFilter {
    clause: String,
    values: Vec<String>,
}

impl LeadFilter {
    fn new(filters: &ReportFilters, first_param: usize) -> Self {
        let mut clause = String::new();
        let mut values = Vec::new();
        let mut push = |column: &str, value: String| {
            clause.push_str(&format!("\n               AND l.{column} = ?{}", first_param + values.len()));
            values.push(value);
        };

        if let Some(id) = filters.sales_user {
            push("assigned_to", id.to_string());
        }
        if let Some(id) = filters.operation_user {
            push("assigned_operator", id.to_string());
        }
        if let Some(source) = filters.source {
            push("platform", source.as_str().to_string());
        }
        if let Some(stage) = filters.stage {
            push("status", stage.as_str().to_string());
        }

        Self { clause, values }
    }
}

fn value_text(value: rusqlite::types::Value) -> String {
    use rusqlite::types::Value;
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Null | Value::Blob(_) => String::new(),
    }
}

fn count(raw: &str) -> DomainResult<u64> {
    raw.parse().map_err(|_| TripDeskError::Database(format!("invalid count: {raw}")))
}

#[cfg(test)]
mod tests {
    use tripdesk_domain::{LeadStatus, Platform};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn filters_number_parameters_after_the_range() {
        let filters = ReportFilters {
            sales_user: Some(Uuid::nil()),
            source: Some(Platform::Website),
            stage: Some(LeadStatus::Confirmed),
            ..ReportFilters::default()
        };
        let filter = LeadFilter::new(&filters, 3);

        assert!(filter.clause.contains("l.assigned_to = ?3"));
        assert!(filter.clause.contains("l.platform = ?4"));
        assert!(filter.clause.contains("l.status = ?5"));
        assert_eq!(filter.values, vec![Uuid::nil().to_string(), "website".into(), "confirmed".into()]);
    }

    #[test]
    fn no_filters_add_nothing() {
        let filter = LeadFilter::new(&ReportFilters::default(), 3);
        assert!(filter.clause.is_empty());
        assert!(filter.values.is_empty());
    }
}
