//! Reporting service with a coarse in-memory cache
//!
//! Summaries are cached per (resolved range, filters). Changing the active
//! filters forgets every cached entry.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::Mutex;
use tracing::debug;
use tripdesk_common::Clock;
use tripdesk_domain::constants::CONVERSION_RATE_SCALE;
use tripdesk_domain::{
    DashboardSummary, DateRangePreset, DateSpan, LeadStatus, Recorded, ReportFilters, Result,
};

use super::ports::ReportingRepository;

type SummaryCache = Arc<Mutex<HashMap<(DateSpan, ReportFilters), DashboardSummary>>>;

pub struct ReportingService {
    repository: Arc<dyn ReportingRepository>,
    clock: Arc<dyn Clock>,
    filters: Mutex<ReportFilters>,
    cache: SummaryCache,
    cache_enabled: bool,
}

impl ReportingService {
    pub fn new(repository: Arc<dyn ReportingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            filters: Mutex::new(ReportFilters::default()),
            cache: Arc::new(Mutex::new(HashMap::new())),
            cache_enabled: true,
        }
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Summary for `preset` under explicit `filters`.
    pub async fn summary(
        &self,
        preset: DateRangePreset,
        filters: &ReportFilters,
    ) -> Result<DashboardSummary> {
        let range = preset.resolve(self.clock.today());
        let key = (range, filters.clone());

        if self.cache_enabled {
            let cache = self.cache.lock().await;
            if let Some(summary) = cache.get(&key) {
                return Ok(summary.clone());
            }
        }

        let summary = self.compute(range, filters).await?;

        if self.cache_enabled {
            let mut cache = self.cache.lock().await;
            cache.insert(key, summary.clone());
        }

        Ok(summary)
    }

    /// Summary for `preset` under the currently selected filters.
    pub async fn dashboard(&self, preset: DateRangePreset) -> Result<DashboardSummary> {
        let filters = self.filters.lock().await.clone();
        self.summary(preset, &filters).await
    }

    pub async fn current_filters(&self) -> ReportFilters {
        self.filters.lock().await.clone()
    }

    /// Replace the active filters and drop every cached summary.
    pub async fn set_filters(&self, filters: ReportFilters) {
        *self.filters.lock().await = filters;
        self.forget().await;
    }

    pub async fn forget(&self) {
        self.cache.lock().await.clear();
    }

    async fn compute(&self, range: DateSpan, filters: &ReportFilters) -> Result<DashboardSummary> {
        let leads_by_status = self.repository.lead_status_counts(range, filters).await?;
        let revenue = self.repository.paid_revenue(range, filters).await?;
        let calls_by_status = self.repository.call_status_counts(range, filters).await?;

        let total_leads: u64 = leads_by_status.values().sum();
        let converted_leads: u64 = leads_by_status
            .iter()
            .filter(|(status, _)| {
                Recorded::<LeadStatus>::from_raw(status).known().is_some_and(|s| s.is_converted())
            })
            .map(|(_, count)| count)
            .sum();

        debug!(
            start = %range.start,
            end = %range.end,
            total_leads,
            converted_leads,
            "Computed dashboard summary"
        );

        Ok(DashboardSummary {
            range,
            total_leads,
            leads_by_status,
            converted_leads,
            conversion_rate: conversion_rate(converted_leads, total_leads),
            revenue,
            calls_by_status,
        })
    }
}

/// `converted / total * 100`, two decimals, zero when there are no leads.
pub fn conversion_rate(converted: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    let rate = Decimal::from(converted) * Decimal::ONE_HUNDRED / Decimal::from(total);
    rate.round_dp_with_strategy(CONVERSION_RATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
